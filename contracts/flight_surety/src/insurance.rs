//! Insurance ledger: one policy per (flight, passenger).
//!
//! Policies move through three stages and never go back:
//!
//! ```text
//! purchased ──► credited (flight late, airline fault) ──► paid (passenger withdrew)
//! ```
//!
//! Each policy carries its purchase sequence number on the flight. A
//! late-airline report only moves the flight's credit cutoff; a policy below
//! the cutoff is credited when it is next read, and the credit is written
//! back when the passenger withdraws. A policy is credited at most once.
//! Payout is always pulled by the passenger.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, Symbol, Vec};

use crate::flight::{self, Flight};
use crate::{events, FlightSuretyError};

const POLICY: Symbol = symbol_short!("POLICY");
const INSUREE: Symbol = symbol_short!("INSUREE");

/// Largest page returned by `passengers_page`.
pub const MAX_PAGE: u32 = 50;

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InsurancePolicy {
    pub flight_key: BytesN<32>,
    pub passenger: Address,
    /// Position in the flight's purchase order.
    pub seq: u32,
    /// Premium held in escrow.
    pub amount_paid: i128,
    /// Outstanding credit; zero before a late report and after withdrawal.
    pub credit_owed: i128,
    pub credited: bool,
    pub paid: bool,
    pub purchased_at: u64,
}

impl InsurancePolicy {
    /// The policy as of the flight's latest late-airline report.
    fn resolve(mut self, flight: &Flight) -> Result<Self, FlightSuretyError> {
        if !self.credited && flight.covers(self.seq) {
            self.credit_owed = flight.payout_for(self.amount_paid)?;
            self.credited = true;
        }
        Ok(self)
    }
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn policy_key(flight_key: &BytesN<32>, passenger: &Address) -> (Symbol, BytesN<32>, Address) {
    (POLICY, flight_key.clone(), passenger.clone())
}

fn insuree_key(flight_key: &BytesN<32>, seq: u32) -> (Symbol, BytesN<32>, u32) {
    (INSUREE, flight_key.clone(), seq)
}

fn load_stored(
    env: &Env,
    flight_key: &BytesN<32>,
    passenger: &Address,
) -> Option<InsurancePolicy> {
    env.storage()
        .persistent()
        .get(&policy_key(flight_key, passenger))
}

/// Current view of a policy, with any credit from a late-airline report
/// applied.
pub fn load(
    env: &Env,
    flight_key: &BytesN<32>,
    passenger: &Address,
) -> Result<Option<InsurancePolicy>, FlightSuretyError> {
    let Some(policy) = load_stored(env, flight_key, passenger) else {
        return Ok(None);
    };
    let flight = flight::load(env, flight_key).ok_or(FlightSuretyError::NotFound)?;
    policy.resolve(&flight).map(Some)
}

fn store(env: &Env, policy: &InsurancePolicy) {
    let key = policy_key(&policy.flight_key, &policy.passenger);
    env.storage().persistent().set(&key, policy);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn store_insuree(env: &Env, flight_key: &BytesN<32>, seq: u32, passenger: &Address) {
    let key = insuree_key(flight_key, seq);
    env.storage().persistent().set(&key, passenger);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Up to `limit` insured passengers (capped at [`MAX_PAGE`]) starting at
/// purchase position `start`.
pub fn passengers_page(env: &Env, flight_key: &BytesN<32>, start: u32, limit: u32) -> Vec<Address> {
    let mut page = Vec::new(env);
    let Some(flight) = flight::load(env, flight_key) else {
        return page;
    };
    let end = start
        .saturating_add(limit.min(MAX_PAGE))
        .min(flight.policy_count);
    for seq in start..end {
        if let Some(passenger) = env.storage().persistent().get(&insuree_key(flight_key, seq)) {
            page.push_back(passenger);
        }
    }
    page
}

/// Every insured passenger of a flight, in purchase order.
///
/// Reads one entry per policy; large flights should be walked with
/// [`passengers_page`].
pub fn passengers(env: &Env, flight_key: &BytesN<32>) -> Vec<Address> {
    let mut all = Vec::new(env);
    let Some(flight) = flight::load(env, flight_key) else {
        return all;
    };
    for seq in 0..flight.policy_count {
        if let Some(passenger) = env.storage().persistent().get(&insuree_key(flight_key, seq)) {
            all.push_back(passenger);
        }
    }
    all
}

// ── Ledger operations ────────────────────────────────────────────────────────

/// Opens a policy for `passenger` on a registered flight.
///
/// The premium itself is moved into custody by the caller of this function.
pub(crate) fn purchase(
    env: &Env,
    flight_key: &BytesN<32>,
    passenger: &Address,
    amount: i128,
    max_premium: i128,
) -> Result<InsurancePolicy, FlightSuretyError> {
    if amount <= 0 {
        return Err(FlightSuretyError::InvalidInput);
    }
    if amount > max_premium {
        return Err(FlightSuretyError::PremiumExceedsCap);
    }
    if load_stored(env, flight_key, passenger).is_some() {
        return Err(FlightSuretyError::DuplicatePolicy);
    }

    let seq = flight::add_policy(env, flight_key)?;
    let policy = InsurancePolicy {
        flight_key: flight_key.clone(),
        passenger: passenger.clone(),
        seq,
        amount_paid: amount,
        credit_owed: 0,
        credited: false,
        paid: false,
        purchased_at: env.ledger().timestamp(),
    };
    store(env, &policy);
    store_insuree(env, flight_key, seq, passenger);
    Ok(policy)
}

/// Outstanding credit for a policy, failing with `NothingOwed` when there is
/// none to withdraw.
pub fn amount_owed(
    env: &Env,
    flight_key: &BytesN<32>,
    passenger: &Address,
) -> Result<i128, FlightSuretyError> {
    let policy = load(env, flight_key, passenger)?.ok_or(FlightSuretyError::NotFound)?;
    if policy.paid || policy.credit_owed <= 0 {
        return Err(FlightSuretyError::NothingOwed);
    }
    Ok(policy.credit_owed)
}

/// Zeroes the credit and marks the policy paid, returning the amount to
/// transfer. No currency moves here.
pub(crate) fn settle(
    env: &Env,
    flight_key: &BytesN<32>,
    passenger: &Address,
) -> Result<i128, FlightSuretyError> {
    let stored = load_stored(env, flight_key, passenger).ok_or(FlightSuretyError::NotFound)?;
    let newly_credited = !stored.credited;
    let amount = amount_owed(env, flight_key, passenger)?;

    let mut policy = load(env, flight_key, passenger)?.ok_or(FlightSuretyError::NotFound)?;
    if newly_credited {
        events::publish_policy_credited(env, flight_key, passenger, policy.credit_owed);
    }
    policy.credit_owed = 0;
    policy.paid = true;
    store(env, &policy);
    Ok(amount)
}
