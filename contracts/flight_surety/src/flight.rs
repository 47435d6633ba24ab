//! Flight records keyed by SHA-256 of (airline, designator, scheduled time).

use soroban_sdk::{contracttype, symbol_short, xdr::ToXdr, Address, Bytes, BytesN, Env, String, Symbol};

use crate::config::EngineConfig;
use crate::FlightSuretyError;

const FLIGHT: Symbol = symbol_short!("FLIGHT");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

/// Status codes as reported by the status oracle.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum FlightStatus {
    Unknown = 0,
    OnTime = 10,
    LateAirline = 20,
    LateWeather = 30,
    LateTechnical = 40,
    LateOther = 50,
}

impl FlightStatus {
    pub fn from_code(code: u32) -> Result<Self, FlightSuretyError> {
        match code {
            0 => Ok(FlightStatus::Unknown),
            10 => Ok(FlightStatus::OnTime),
            20 => Ok(FlightStatus::LateAirline),
            30 => Ok(FlightStatus::LateWeather),
            40 => Ok(FlightStatus::LateTechnical),
            50 => Ok(FlightStatus::LateOther),
            _ => Err(FlightSuretyError::InvalidInput),
        }
    }

    /// Only a delay caused by the airline triggers policy credits.
    pub fn triggers_payout(&self) -> bool {
        matches!(self, FlightStatus::LateAirline)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Flight {
    pub key: BytesN<32>,
    pub airline: Address,
    pub designator: String,
    pub scheduled_time: String,
    pub status: FlightStatus,
    pub registered: bool,
    /// Ledger timestamp of registration or of the last status report.
    pub updated_at: u64,
    /// Policies sold on this flight; also the next policy's sequence number.
    pub policy_count: u32,
    /// Policies with a sequence number below this are owed a credit.
    pub credit_cutoff: u32,
    /// Payout ratio frozen at the first late-airline report; 0/0 before.
    pub payout_numerator: i128,
    pub payout_denominator: i128,
}

impl Flight {
    /// Whether the policy with sequence number `seq` has been brought under
    /// a late-airline report.
    pub fn covers(&self, seq: u32) -> bool {
        seq < self.credit_cutoff
    }

    /// Credit owed for `premium` at the frozen ratio. Rounds down.
    pub fn payout_for(&self, premium: i128) -> Result<i128, FlightSuretyError> {
        premium
            .checked_mul(self.payout_numerator)
            .and_then(|scaled| scaled.checked_div(self.payout_denominator))
            .ok_or(FlightSuretyError::InvalidInput)
    }
}

/// Result of applying one status report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusChange {
    pub previous: FlightStatus,
    /// Policies newly owed a credit because of this report.
    pub credited: u32,
}

/// Derives the flight key.
///
/// Each component is XDR-encoded before hashing; the encodings are
/// length-prefixed, so distinct triples never concatenate to the same bytes.
pub fn flight_key(
    env: &Env,
    airline: &Address,
    designator: &String,
    scheduled_time: &String,
) -> BytesN<32> {
    let mut data = Bytes::new(env);
    data.append(&airline.clone().to_xdr(env));
    data.append(&designator.clone().to_xdr(env));
    data.append(&scheduled_time.clone().to_xdr(env));
    env.crypto().sha256(&data).into()
}

fn storage_key(key: &BytesN<32>) -> (Symbol, BytesN<32>) {
    (FLIGHT, key.clone())
}

pub fn load(env: &Env, key: &BytesN<32>) -> Option<Flight> {
    env.storage().persistent().get(&storage_key(key))
}

fn store(env: &Env, flight: &Flight) {
    let key = storage_key(&flight.key);
    env.storage().persistent().set(&key, flight);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn is_registered(env: &Env, key: &BytesN<32>) -> bool {
    load(env, key).map(|f| f.registered).unwrap_or(false)
}

/// Creates the flight record. Fails with `DuplicateFlight` if the key exists.
pub(crate) fn register(
    env: &Env,
    airline: &Address,
    designator: &String,
    scheduled_time: &String,
) -> Result<Flight, FlightSuretyError> {
    let key = flight_key(env, airline, designator, scheduled_time);
    if env.storage().persistent().has(&storage_key(&key)) {
        return Err(FlightSuretyError::DuplicateFlight);
    }

    let flight = Flight {
        key,
        airline: airline.clone(),
        designator: designator.clone(),
        scheduled_time: scheduled_time.clone(),
        status: FlightStatus::Unknown,
        registered: true,
        updated_at: env.ledger().timestamp(),
        policy_count: 0,
        credit_cutoff: 0,
        payout_numerator: 0,
        payout_denominator: 0,
    };
    store(env, &flight);
    Ok(flight)
}

/// Reserves the next policy sequence number on the flight.
pub(crate) fn add_policy(env: &Env, key: &BytesN<32>) -> Result<u32, FlightSuretyError> {
    let mut flight = load(env, key).ok_or(FlightSuretyError::NotFound)?;
    let seq = flight.policy_count;
    flight.policy_count = seq.checked_add(1).ok_or(FlightSuretyError::InvalidInput)?;
    store(env, &flight);
    Ok(seq)
}

/// Records the reported status.
///
/// A late-airline report moves the credit cutoff up to every policy sold so
/// far. Individual policies are not touched here; they pick up their credit
/// when read or withdrawn, so the cost of a report does not depend on how
/// many policies the flight holds.
pub(crate) fn set_status(
    env: &Env,
    key: &BytesN<32>,
    status: FlightStatus,
    config: &EngineConfig,
) -> Result<StatusChange, FlightSuretyError> {
    let mut flight = load(env, key).ok_or(FlightSuretyError::NotFound)?;
    let previous = flight.status;

    let mut credited = 0;
    if status.triggers_payout() {
        if flight.payout_denominator == 0 {
            flight.payout_numerator = config.payout_numerator;
            flight.payout_denominator = config.payout_denominator;
        }
        credited = flight.policy_count.saturating_sub(flight.credit_cutoff);
        flight.credit_cutoff = flight.policy_count;
    }

    flight.status = status;
    flight.updated_at = env.ledger().timestamp();
    store(env, &flight);
    Ok(StatusChange { previous, credited })
}
