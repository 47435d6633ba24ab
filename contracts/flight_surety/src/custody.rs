//! Custody of the settlement token.
//!
//! The contract holds every premium and every airline deposit in its own
//! token balance. The escrow ledger mirrors that balance so payouts can be
//! checked against it before any token moves.
//!
//! ## Ordering
//! `withdraw` debits the ledger before calling the token contract, so a
//! nested invocation during the transfer sees the already-reduced balance.

use soroban_sdk::{symbol_short, token, Address, Env, Symbol};

use crate::FlightSuretyError;

const TOKEN: Symbol = symbol_short!("TOKEN");
const ESCROW: Symbol = symbol_short!("ESCROW");

pub(crate) fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&TOKEN, token);
}

pub fn token(env: &Env) -> Result<Address, FlightSuretyError> {
    env.storage()
        .instance()
        .get(&TOKEN)
        .ok_or(FlightSuretyError::NotInitialized)
}

/// Escrowed balance according to the internal ledger.
pub fn balance(env: &Env) -> i128 {
    env.storage().instance().get(&ESCROW).unwrap_or(0)
}

fn set_balance(env: &Env, amount: i128) {
    env.storage().instance().set(&ESCROW, &amount);
}

/// Pulls `amount` from `from` into the contract and credits the ledger.
pub(crate) fn deposit(env: &Env, from: &Address, amount: i128) -> Result<(), FlightSuretyError> {
    if amount <= 0 {
        return Err(FlightSuretyError::InvalidInput);
    }
    let token = token(env)?;
    let updated = balance(env)
        .checked_add(amount)
        .ok_or(FlightSuretyError::InvalidInput)?;
    set_balance(env, updated);

    token::Client::new(env, &token).transfer(from, &env.current_contract_address(), &amount);
    Ok(())
}

/// Guard: the ledger can cover a payout of `amount`.
pub(crate) fn ensure_covers(env: &Env, amount: i128) -> Result<(), FlightSuretyError> {
    if balance(env) < amount {
        return Err(FlightSuretyError::InsufficientEscrow);
    }
    Ok(())
}

/// Debits the ledger, then transfers `amount` out to `to`.
pub(crate) fn withdraw(env: &Env, to: &Address, amount: i128) -> Result<(), FlightSuretyError> {
    if amount <= 0 {
        return Err(FlightSuretyError::InvalidInput);
    }
    let token = token(env)?;
    let remaining = balance(env)
        .checked_sub(amount)
        .filter(|remaining| *remaining >= 0)
        .ok_or(FlightSuretyError::InsufficientEscrow)?;
    set_balance(env, remaining);

    token::Client::new(env, &token).transfer(&env.current_contract_address(), to, &amount);
    Ok(())
}
