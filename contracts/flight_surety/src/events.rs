//! Events emitted by the flight surety contract.
//!
//! Every event is published under the topic pair `("FSURETY", <name>)`.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, IntoVal, String, Symbol, Val};

use crate::airline::AdmissionStatus;
use crate::config::EngineConfig;
use crate::flight::FlightStatus;

const TOPIC: Symbol = symbol_short!("FSURETY");

fn emit<D: IntoVal<Env, Val>>(env: &Env, name: Symbol, data: D) {
    #[allow(deprecated)]
    env.events().publish((TOPIC, name), data);
}

// ── Event payloads ───────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperationalChangedEvent {
    pub caller: Address,
    pub operational: bool,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AirlineFundedEvent {
    pub airline: Address,
    pub amount: i128,
    pub activated: bool,
    pub funded_airlines: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AirlineVoteEvent {
    pub candidate: Address,
    pub voter: Address,
    pub votes: u32,
    pub quorum: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AirlineRegisteredEvent {
    pub airline: Address,
    pub by_vote: bool,
    pub registered_airlines: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlightRegisteredEvent {
    pub flight_key: BytesN<32>,
    pub airline: Address,
    pub designator: String,
    pub scheduled_time: String,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlightStatusEvent {
    pub flight_key: BytesN<32>,
    pub previous: FlightStatus,
    pub status: FlightStatus,
    pub policies_credited: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyPurchasedEvent {
    pub flight_key: BytesN<32>,
    pub passenger: Address,
    pub payer: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyCreditedEvent {
    pub flight_key: BytesN<32>,
    pub passenger: Address,
    pub credit: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InsurancePaidEvent {
    pub flight_key: BytesN<32>,
    pub passenger: Address,
    pub caller: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ───────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: &Address, token: &Address) {
    emit(env, symbol_short!("INIT"), (owner.clone(), token.clone()));
}

pub fn publish_operational_changed(env: &Env, caller: &Address, operational: bool) {
    emit(
        env,
        symbol_short!("OPER"),
        OperationalChangedEvent {
            caller: caller.clone(),
            operational,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_caller_authorized(env: &Env, caller: &Address) {
    emit(env, symbol_short!("AUTH_ADD"), caller.clone());
}

pub fn publish_caller_revoked(env: &Env, caller: &Address) {
    emit(env, symbol_short!("AUTH_REV"), caller.clone());
}

pub fn publish_config_updated(env: &Env, config: &EngineConfig) {
    emit(env, symbol_short!("CFG_UPD"), config.clone());
}

pub fn publish_airline_funded(
    env: &Env,
    airline: &Address,
    amount: i128,
    activated: bool,
    funded_airlines: u32,
) {
    emit(
        env,
        symbol_short!("AL_FUND"),
        AirlineFundedEvent {
            airline: airline.clone(),
            amount,
            activated,
            funded_airlines,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_airline_vote(env: &Env, candidate: &Address, voter: &Address, votes: u32, quorum: u32) {
    emit(
        env,
        symbol_short!("AL_VOTE"),
        AirlineVoteEvent {
            candidate: candidate.clone(),
            voter: voter.clone(),
            votes,
            quorum,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_airline_registered(
    env: &Env,
    airline: &Address,
    by_vote: bool,
    registered_airlines: u32,
) {
    emit(
        env,
        symbol_short!("AL_REG"),
        AirlineRegisteredEvent {
            airline: airline.clone(),
            by_vote,
            registered_airlines,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admission_pending(env: &Env, candidate: &Address, status: AdmissionStatus) {
    emit(env, symbol_short!("AL_PEND"), (candidate.clone(), status));
}

pub fn publish_flight_registered(
    env: &Env,
    flight_key: &BytesN<32>,
    airline: &Address,
    designator: &String,
    scheduled_time: &String,
) {
    emit(
        env,
        symbol_short!("FL_REG"),
        FlightRegisteredEvent {
            flight_key: flight_key.clone(),
            airline: airline.clone(),
            designator: designator.clone(),
            scheduled_time: scheduled_time.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_flight_status(
    env: &Env,
    flight_key: &BytesN<32>,
    previous: FlightStatus,
    status: FlightStatus,
    policies_credited: u32,
) {
    emit(
        env,
        symbol_short!("FL_STAT"),
        FlightStatusEvent {
            flight_key: flight_key.clone(),
            previous,
            status,
            policies_credited,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_policy_purchased(
    env: &Env,
    flight_key: &BytesN<32>,
    passenger: &Address,
    payer: &Address,
    amount: i128,
) {
    emit(
        env,
        symbol_short!("INS_BUY"),
        PolicyPurchasedEvent {
            flight_key: flight_key.clone(),
            passenger: passenger.clone(),
            payer: payer.clone(),
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_policy_credited(env: &Env, flight_key: &BytesN<32>, passenger: &Address, credit: i128) {
    emit(
        env,
        symbol_short!("INS_CRED"),
        PolicyCreditedEvent {
            flight_key: flight_key.clone(),
            passenger: passenger.clone(),
            credit,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_insurance_paid(
    env: &Env,
    flight_key: &BytesN<32>,
    passenger: &Address,
    caller: &Address,
    amount: i128,
) {
    emit(
        env,
        symbol_short!("INS_PAID"),
        InsurancePaidEvent {
            flight_key: flight_key.clone(),
            passenger: passenger.clone(),
            caller: caller.clone(),
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
