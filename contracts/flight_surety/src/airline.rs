//! Airline admission: automatic seats for the first cohort, then quorum
//! voting among funded airlines.
//!
//! ```text
//! Unknown ──► Candidate ──► Registered
//!    │                          ▲
//!    └──────── auto seat ───────┘   (while registered count < auto_admit_limit)
//! ```
//!
//! `funded` is orthogonal to admission. It is what grants the right to vote
//! and to register flights, and it never reverts.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::FlightSuretyError;

const AIRLINE: Symbol = symbol_short!("AIRLINE");
const REG_COUNT: Symbol = symbol_short!("REG_CNT");
const FUND_COUNT: Symbol = symbol_short!("FUND_CNT");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdmissionStatus {
    Unknown = 0,
    Candidate = 1,
    Registered = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Airline {
    pub id: Address,
    pub registered: bool,
    pub funded: bool,
    /// Sum of every deposit made by this airline.
    pub deposited: i128,
    /// Distinct funded airlines that voted to admit this one.
    pub votes: Vec<Address>,
}

impl Airline {
    fn new(env: &Env, id: Address) -> Self {
        Airline {
            id,
            registered: false,
            funded: false,
            deposited: 0,
            votes: Vec::new(env),
        }
    }

    /// A record created only by funding has no votes and is not a candidate.
    pub fn status(&self) -> AdmissionStatus {
        if self.registered {
            AdmissionStatus::Registered
        } else if !self.votes.is_empty() {
            AdmissionStatus::Candidate
        } else {
            AdmissionStatus::Unknown
        }
    }
}

/// Result of one `register` call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Admission {
    pub status: AdmissionStatus,
    pub votes: u32,
    pub quorum: u32,
    /// False when the voter had already voted for this candidate.
    pub vote_counted: bool,
    pub by_vote: bool,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn airline_key(id: &Address) -> (Symbol, Address) {
    (AIRLINE, id.clone())
}

pub fn load(env: &Env, id: &Address) -> Option<Airline> {
    env.storage().persistent().get(&airline_key(id))
}

fn store(env: &Env, airline: &Airline) {
    let key = airline_key(&airline.id);
    env.storage().persistent().set(&key, airline);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn registered_count(env: &Env) -> u32 {
    env.storage().instance().get(&REG_COUNT).unwrap_or(0)
}

pub fn funded_count(env: &Env) -> u32 {
    env.storage().instance().get(&FUND_COUNT).unwrap_or(0)
}

fn bump_counter(env: &Env, counter: &Symbol) {
    let current: u32 = env.storage().instance().get(counter).unwrap_or(0);
    env.storage()
        .instance()
        .set(counter, &current.saturating_add(1));
}

pub fn is_funded(env: &Env, id: &Address) -> bool {
    load(env, id).map(|a| a.funded).unwrap_or(false)
}

pub fn is_registered(env: &Env, id: &Address) -> bool {
    load(env, id).map(|a| a.registered).unwrap_or(false)
}

pub fn status_of(env: &Env, id: &Address) -> AdmissionStatus {
    load(env, id)
        .map(|a| a.status())
        .unwrap_or(AdmissionStatus::Unknown)
}

pub fn vote_count(env: &Env, id: &Address) -> u32 {
    load(env, id).map(|a| a.votes.len()).unwrap_or(0)
}

/// Votes needed for admission: half the funded airlines, rounded up.
pub fn quorum(funded_airlines: u32) -> u32 {
    funded_airlines.div_ceil(2)
}

// ── Transitions ──────────────────────────────────────────────────────────────

/// The deployer's airline starts registered and funded without a deposit.
pub(crate) fn create_genesis(env: &Env, owner: &Address) {
    let mut genesis = Airline::new(env, owner.clone());
    genesis.registered = true;
    genesis.funded = true;
    store(env, &genesis);
    bump_counter(env, &REG_COUNT);
    bump_counter(env, &FUND_COUNT);
}

/// Records a deposit of `amount` for `id`, creating the record if needed.
///
/// Returns `true` when this deposit activated the airline.
pub(crate) fn fund(
    env: &Env,
    id: &Address,
    amount: i128,
    min_funding: i128,
) -> Result<bool, FlightSuretyError> {
    if amount < min_funding {
        return Err(FlightSuretyError::InsufficientFunds);
    }

    let mut airline = load(env, id).unwrap_or_else(|| Airline::new(env, id.clone()));
    let activated = !airline.funded;
    airline.funded = true;
    airline.deposited = airline
        .deposited
        .checked_add(amount)
        .ok_or(FlightSuretyError::InvalidInput)?;
    store(env, &airline);

    if activated {
        bump_counter(env, &FUND_COUNT);
    }
    Ok(activated)
}

/// Registers `candidate` directly while automatic seats remain, otherwise
/// records `voter`'s vote and admits once the quorum is met.
pub(crate) fn register(
    env: &Env,
    voter: &Address,
    candidate: &Address,
    auto_admit_limit: u32,
) -> Result<Admission, FlightSuretyError> {
    if !is_funded(env, voter) {
        return Err(FlightSuretyError::Unauthorized);
    }

    let mut airline =
        load(env, candidate).unwrap_or_else(|| Airline::new(env, candidate.clone()));
    if airline.registered {
        return Err(FlightSuretyError::AlreadyRegistered);
    }

    if registered_count(env) < auto_admit_limit {
        airline.registered = true;
        store(env, &airline);
        bump_counter(env, &REG_COUNT);
        return Ok(Admission {
            status: AdmissionStatus::Registered,
            votes: airline.votes.len(),
            quorum: 0,
            vote_counted: false,
            by_vote: false,
        });
    }

    // Set semantics: a repeated vote from the same airline is a no-op.
    let vote_counted = !airline.votes.contains(voter);
    if vote_counted {
        airline.votes.push_back(voter.clone());
    }

    let votes = airline.votes.len();
    let needed = quorum(funded_count(env));
    if votes >= needed {
        airline.registered = true;
        bump_counter(env, &REG_COUNT);
    }
    store(env, &airline);

    Ok(Admission {
        status: airline.status(),
        votes,
        quorum: needed,
        vote_counted,
        by_vote: true,
    })
}
