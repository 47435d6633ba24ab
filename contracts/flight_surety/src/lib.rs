//! # Flight Surety
//!
//! Flight-delay insurance run by a consortium of airlines.
//!
//! - **Gateway**: owner-controlled circuit breaker plus an allow-list of
//!   callers trusted to act for the engine (status oracles, agents).
//! - **Airline admission**: the first four airlines (deployer included) are
//!   seated automatically; later candidates need votes from half the funded
//!   airlines, rounded up.
//! - **Flights**: registered by funded airlines, keyed by
//!   `sha256(airline, designator, scheduled time)`.
//! - **Insurance**: passengers pay a premium of at most 1 unit per flight.
//!   A delay caused by the airline credits 1.5x the premium, which the
//!   passenger withdraws later. Credits are never pushed.
//!
//! ## Custody
//! Premiums and airline deposits are held by the contract in the settlement
//! token configured at initialisation. An internal escrow ledger mirrors
//! that balance; withdrawals settle the policy and debit the ledger before
//! the token transfer is made.
#![no_std]
#![allow(clippy::too_many_arguments)]

pub mod airline;
pub mod config;
pub mod custody;
pub mod events;
pub mod flight;
pub mod gateway;
pub mod insurance;

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Address, BytesN, Env, String, Symbol, Vec,
};

use airline::{AdmissionStatus, Airline};
use config::EngineConfig;
use flight::{Flight, FlightStatus};
use insurance::InsurancePolicy;

// ── Storage keys ──────────────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Error codes ───────────────────────────────────────────────────────────────

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum FlightSuretyError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// The circuit breaker is open.
    NotOperational = 3,
    /// Caller is not the owner, not funded, or not on the allow-list.
    Unauthorized = 4,
    AlreadyRegistered = 5,
    DuplicateFlight = 6,
    /// Unknown flight or policy.
    NotFound = 7,
    PremiumExceedsCap = 8,
    DuplicatePolicy = 9,
    /// Funding below the configured minimum.
    InsufficientFunds = 10,
    NothingOwed = 11,
    /// The escrow ledger cannot cover a payout. Indicates a bookkeeping bug
    /// or an under-funded pool and should be alerted on.
    InsufficientEscrow = 12,
    InvalidInput = 13,
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct FlightSuretyContract;

#[contractimpl]
impl FlightSuretyContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Bootstrap the engine.
    ///
    /// * `owner`            - deployer; becomes the genesis airline (registered
    ///                        and funded) and the only identity allowed to
    ///                        toggle the circuit breaker.
    /// * `settlement_token` - token in which premiums, deposits and payouts
    ///                        are denominated.
    pub fn initialize(
        env: Env,
        owner: Address,
        settlement_token: Address,
    ) -> Result<(), FlightSuretyError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(FlightSuretyError::AlreadyInitialized);
        }
        owner.require_auth();

        gateway::set_owner(&env, &owner);
        gateway::set_operational(&env, true);
        custody::set_token(&env, &settlement_token);
        config::store(&env, &EngineConfig::default_config());
        airline::create_genesis(&env, &owner);

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);

        events::publish_initialized(&env, &owner, &settlement_token);
        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Gateway ───────────────────────────────────────────────────────────────

    /// Open or close the circuit breaker. Owner only, and the one mutating
    /// call that works while the engine is not operational.
    pub fn set_operational(
        env: Env,
        caller: Address,
        operational: bool,
    ) -> Result<(), FlightSuretyError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        gateway::require_owner(&env, &caller)?;

        gateway::set_operational(&env, operational);
        events::publish_operational_changed(&env, &caller, operational);
        Ok(())
    }

    pub fn is_operational(env: Env) -> bool {
        gateway::is_operational(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, FlightSuretyError> {
        gateway::owner(&env)
    }

    /// Add `target` to the allow-list of callers trusted to act for the engine.
    pub fn authorize_caller(
        env: Env,
        caller: Address,
        target: Address,
    ) -> Result<(), FlightSuretyError> {
        Self::require_active(&env)?;
        caller.require_auth();
        gateway::require_owner(&env, &caller)?;

        gateway::authorize(&env, &target);
        events::publish_caller_authorized(&env, &target);
        Ok(())
    }

    pub fn revoke_caller(
        env: Env,
        caller: Address,
        target: Address,
    ) -> Result<(), FlightSuretyError> {
        Self::require_active(&env)?;
        caller.require_auth();
        gateway::require_owner(&env, &caller)?;

        gateway::revoke(&env, &target);
        events::publish_caller_revoked(&env, &target);
        Ok(())
    }

    pub fn is_authorized_caller(env: Env, id: Address) -> bool {
        gateway::is_authorized(&env, &id)
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    pub fn get_config(env: Env) -> Result<EngineConfig, FlightSuretyError> {
        config::load(&env)
    }

    /// Replace the engine parameters. Credits computed before the change are
    /// left untouched.
    pub fn update_config(
        env: Env,
        caller: Address,
        new_config: EngineConfig,
    ) -> Result<(), FlightSuretyError> {
        Self::require_active(&env)?;
        caller.require_auth();
        gateway::require_owner(&env, &caller)?;
        new_config.validate()?;

        config::store(&env, &new_config);
        events::publish_config_updated(&env, &new_config);
        Ok(())
    }

    // ── Airlines ──────────────────────────────────────────────────────────────

    /// Deposit `amount` of the settlement token and activate the airline.
    ///
    /// The first deposit of at least `min_funding` activates the airline and
    /// raises the funded count used for quorum; later deposits are top-ups.
    pub fn fund_airline(env: Env, airline: Address, amount: i128) -> Result<(), FlightSuretyError> {
        Self::require_active(&env)?;
        airline.require_auth();
        let cfg = config::load(&env)?;

        let activated = airline::fund(&env, &airline, amount, cfg.min_funding)?;
        custody::deposit(&env, &airline, amount)?;

        events::publish_airline_funded(
            &env,
            &airline,
            amount,
            activated,
            airline::funded_count(&env),
        );
        Ok(())
    }

    /// Propose `candidate` (automatic seat) or vote for it (quorum phase).
    ///
    /// `caller` must be a funded airline. Returns the candidate's status
    /// after the call; a repeated vote changes nothing and still returns
    /// `Candidate`.
    pub fn register_airline(
        env: Env,
        caller: Address,
        candidate: Address,
    ) -> Result<AdmissionStatus, FlightSuretyError> {
        Self::require_active(&env)?;
        caller.require_auth();
        let cfg = config::load(&env)?;

        let admission = airline::register(&env, &caller, &candidate, cfg.auto_admit_limit)?;

        if admission.by_vote && admission.vote_counted {
            events::publish_airline_vote(
                &env,
                &candidate,
                &caller,
                admission.votes,
                admission.quorum,
            );
        }
        match admission.status {
            AdmissionStatus::Registered => events::publish_airline_registered(
                &env,
                &candidate,
                admission.by_vote,
                airline::registered_count(&env),
            ),
            status => events::publish_admission_pending(&env, &candidate, status),
        }
        Ok(admission.status)
    }

    /// Whether `id` is a funded airline, i.e. may vote and register flights.
    pub fn is_airline(env: Env, id: Address) -> bool {
        airline::is_funded(&env, &id)
    }

    /// Whether `id` has been admitted to the registry.
    pub fn is_registered_airline(env: Env, id: Address) -> bool {
        airline::is_registered(&env, &id)
    }

    pub fn get_airline(env: Env, id: Address) -> Option<Airline> {
        airline::load(&env, &id)
    }

    pub fn get_admission_status(env: Env, id: Address) -> AdmissionStatus {
        airline::status_of(&env, &id)
    }

    pub fn get_airline_count(env: Env) -> u32 {
        airline::registered_count(&env)
    }

    pub fn get_funded_airline_count(env: Env) -> u32 {
        airline::funded_count(&env)
    }

    pub fn get_votes(env: Env, candidate: Address) -> u32 {
        airline::vote_count(&env, &candidate)
    }

    // ── Flights ───────────────────────────────────────────────────────────────

    /// Register a flight for `airline`.
    ///
    /// `caller` must be funded; registering for a different airline also
    /// requires `caller` to be on the allow-list.
    pub fn register_flight(
        env: Env,
        caller: Address,
        airline: Address,
        designator: String,
        scheduled_time: String,
    ) -> Result<BytesN<32>, FlightSuretyError> {
        Self::require_active(&env)?;
        caller.require_auth();

        if !airline::is_funded(&env, &caller) {
            return Err(FlightSuretyError::Unauthorized);
        }
        if caller != airline {
            gateway::require_authorized(&env, &caller)?;
        }

        let flight = flight::register(&env, &airline, &designator, &scheduled_time)?;
        events::publish_flight_registered(&env, &flight.key, &airline, &designator, &scheduled_time);
        Ok(flight.key)
    }

    pub fn get_flight_key(
        env: Env,
        airline: Address,
        designator: String,
        scheduled_time: String,
    ) -> BytesN<32> {
        flight::flight_key(&env, &airline, &designator, &scheduled_time)
    }

    pub fn is_registered_flight(env: Env, flight_key: BytesN<32>) -> bool {
        flight::is_registered(&env, &flight_key)
    }

    pub fn get_flight(env: Env, flight_key: BytesN<32>) -> Result<Flight, FlightSuretyError> {
        flight::load(&env, &flight_key).ok_or(FlightSuretyError::NotFound)
    }

    pub fn get_flight_passengers(env: Env, flight_key: BytesN<32>) -> Vec<Address> {
        insurance::passengers(&env, &flight_key)
    }

    /// Insured passengers in purchase order, `limit` at a time (at most 50).
    pub fn get_flight_passengers_page(
        env: Env,
        flight_key: BytesN<32>,
        start: u32,
        limit: u32,
    ) -> Vec<Address> {
        insurance::passengers_page(&env, &flight_key, start, limit)
    }

    /// Apply a status report from an authorized reporter.
    ///
    /// `status_code` uses the oracle codes (0, 10, 20, 30, 40, 50). On a
    /// late-airline report every policy sold so far and not yet credited
    /// becomes owed its credit. Returns how many policies this report
    /// brought under credit.
    pub fn process_flight_status(
        env: Env,
        reporter: Address,
        airline: Address,
        designator: String,
        scheduled_time: String,
        status_code: u32,
    ) -> Result<u32, FlightSuretyError> {
        let key = flight::flight_key(&env, &airline, &designator, &scheduled_time);
        Self::process_flight_status_by_key(env, reporter, key, status_code)
    }

    pub fn process_flight_status_by_key(
        env: Env,
        reporter: Address,
        flight_key: BytesN<32>,
        status_code: u32,
    ) -> Result<u32, FlightSuretyError> {
        Self::require_active(&env)?;
        reporter.require_auth();
        gateway::require_authorized(&env, &reporter)?;

        let status = FlightStatus::from_code(status_code)?;
        let cfg = config::load(&env)?;
        let change = flight::set_status(&env, &flight_key, status, &cfg)?;

        events::publish_flight_status(&env, &flight_key, change.previous, status, change.credited);
        Ok(change.credited)
    }

    // ── Insurance ─────────────────────────────────────────────────────────────

    /// Buy a policy for `passenger` on a registered flight. `caller` pays the
    /// premium; the policy and any payout belong to `passenger`.
    pub fn buy_insurance(
        env: Env,
        caller: Address,
        airline: Address,
        passenger: Address,
        designator: String,
        scheduled_time: String,
        amount: i128,
    ) -> Result<(), FlightSuretyError> {
        Self::require_active(&env)?;
        caller.require_auth();

        let key = flight::flight_key(&env, &airline, &designator, &scheduled_time);
        if !flight::is_registered(&env, &key) {
            return Err(FlightSuretyError::NotFound);
        }

        let cfg = config::load(&env)?;
        insurance::purchase(&env, &key, &passenger, amount, cfg.max_premium)?;
        custody::deposit(&env, &caller, amount)?;

        events::publish_policy_purchased(&env, &key, &passenger, &caller, amount);
        Ok(())
    }

    /// Outstanding credit for a policy (0 before a late-airline report).
    pub fn get_insurance_amount(
        env: Env,
        flight_key: BytesN<32>,
        passenger: Address,
    ) -> Result<i128, FlightSuretyError> {
        insurance::load(&env, &flight_key, &passenger)?
            .map(|p| p.credit_owed)
            .ok_or(FlightSuretyError::NotFound)
    }

    pub fn get_insurance(
        env: Env,
        flight_key: BytesN<32>,
        passenger: Address,
    ) -> Result<InsurancePolicy, FlightSuretyError> {
        insurance::load(&env, &flight_key, &passenger)?.ok_or(FlightSuretyError::NotFound)
    }

    /// Withdraw the credit owed to `passenger`. Returns the amount paid.
    pub fn pay_insurance(
        env: Env,
        caller: Address,
        airline: Address,
        passenger: Address,
        designator: String,
        scheduled_time: String,
    ) -> Result<i128, FlightSuretyError> {
        let key = flight::flight_key(&env, &airline, &designator, &scheduled_time);
        Self::pay_insurance_by_key(env, caller, key, passenger)
    }

    /// Withdraw by flight key. `caller` is the passenger or an authorized
    /// agent; the funds always go to the passenger.
    pub fn pay_insurance_by_key(
        env: Env,
        caller: Address,
        flight_key: BytesN<32>,
        passenger: Address,
    ) -> Result<i128, FlightSuretyError> {
        Self::require_active(&env)?;
        caller.require_auth();
        if caller != passenger {
            gateway::require_authorized(&env, &caller)?;
        }

        // Checks.
        let owed = insurance::amount_owed(&env, &flight_key, &passenger)?;
        custody::ensure_covers(&env, owed)?;

        // Effects: the policy is settled before any token moves.
        let amount = insurance::settle(&env, &flight_key, &passenger)?;

        // Interaction.
        custody::withdraw(&env, &passenger, amount)?;

        events::publish_insurance_paid(&env, &flight_key, &passenger, &caller, amount);
        Ok(amount)
    }

    /// Balance held in escrow according to the internal ledger.
    pub fn get_escrow_balance(env: Env) -> i128 {
        custody::balance(&env)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), FlightSuretyError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(FlightSuretyError::NotInitialized);
        }
        Ok(())
    }

    /// Initialised and operational; every mutating entry point except
    /// `set_operational` goes through here first.
    fn require_active(env: &Env) -> Result<(), FlightSuretyError> {
        Self::require_initialized(env)?;
        gateway::require_operational(env)?;
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
