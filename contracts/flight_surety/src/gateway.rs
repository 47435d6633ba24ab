//! Circuit breaker and caller allow-list consulted by every mutating entry point.
//!
//! The owner recorded at initialisation is the only identity allowed to flip
//! the operational flag or edit the allow-list, and is implicitly authorized
//! for every call that requires an authorized caller.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::FlightSuretyError;

const OWNER: Symbol = symbol_short!("OWNER");
const OPERATIONAL: Symbol = symbol_short!("OPER");
const AUTH_CALLER: Symbol = symbol_short!("AUTH_CLR");

const AUTH_TTL_THRESHOLD: u32 = 5_184_000; // ~300 days (@ ~5s/ledger)
const AUTH_TTL_EXTEND_TO: u32 = 10_368_000; // ~600 days (@ ~5s/ledger)

fn caller_key(caller: &Address) -> (Symbol, Address) {
    (AUTH_CALLER, caller.clone())
}

pub(crate) fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
}

pub fn owner(env: &Env) -> Result<Address, FlightSuretyError> {
    env.storage()
        .instance()
        .get(&OWNER)
        .ok_or(FlightSuretyError::NotInitialized)
}

/// Guard: only the owner may proceed.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), FlightSuretyError> {
    if *caller != owner(env)? {
        return Err(FlightSuretyError::Unauthorized);
    }
    Ok(())
}

/// Sets the circuit breaker.
///
/// Callers enforce the owner check before invoking this.
pub(crate) fn set_operational(env: &Env, operational: bool) {
    env.storage().instance().set(&OPERATIONAL, &operational);
}

pub fn is_operational(env: &Env) -> bool {
    env.storage().instance().get(&OPERATIONAL).unwrap_or(false)
}

/// Guard: returns `NotOperational` while the circuit breaker is open.
///
/// View functions never call this.
pub fn require_operational(env: &Env) -> Result<(), FlightSuretyError> {
    if !is_operational(env) {
        return Err(FlightSuretyError::NotOperational);
    }
    Ok(())
}

pub(crate) fn authorize(env: &Env, caller: &Address) {
    let key = caller_key(caller);
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, AUTH_TTL_THRESHOLD, AUTH_TTL_EXTEND_TO);
}

pub(crate) fn revoke(env: &Env, caller: &Address) {
    env.storage().persistent().remove(&caller_key(caller));
}

/// Whether `caller` may act on behalf of the engine (status reports, agent
/// withdrawals, flight registration for another airline).
pub fn is_authorized(env: &Env, caller: &Address) -> bool {
    if let Ok(owner) = owner(env) {
        if owner == *caller {
            return true;
        }
    }
    env.storage()
        .persistent()
        .get(&caller_key(caller))
        .unwrap_or(false)
}

pub fn require_authorized(env: &Env, caller: &Address) -> Result<(), FlightSuretyError> {
    if !is_authorized(env, caller) {
        return Err(FlightSuretyError::Unauthorized);
    }
    Ok(())
}
