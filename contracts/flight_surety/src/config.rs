//! Engine parameters: funding floor, premium cap, automatic-admission seats
//! and the payout ratio.

use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::FlightSuretyError;

const CONFIG: Symbol = symbol_short!("CONFIG");

/// One whole unit of the settlement token (7 decimals, as for Stellar assets).
pub const UNIT: i128 = 10_000_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    /// Minimum single deposit that activates an airline.
    pub min_funding: i128,
    /// Largest premium a passenger may pay for one policy.
    pub max_premium: i128,
    /// Registered airlines (genesis included) admitted without a vote.
    pub auto_admit_limit: u32,
    pub payout_numerator: i128,
    pub payout_denominator: i128,
}

impl EngineConfig {
    /// 10 units to fund, 1 unit premium cap, 4 automatic seats, 3/2 payout.
    pub fn default_config() -> Self {
        EngineConfig {
            min_funding: 10 * UNIT,
            max_premium: UNIT,
            auto_admit_limit: 4,
            payout_numerator: 3,
            payout_denominator: 2,
        }
    }

    pub fn validate(&self) -> Result<(), FlightSuretyError> {
        if self.min_funding <= 0
            || self.max_premium <= 0
            || self.auto_admit_limit == 0
            || self.payout_denominator <= 0
            || self.payout_numerator < self.payout_denominator
        {
            return Err(FlightSuretyError::InvalidInput);
        }
        Ok(())
    }

    /// Credit owed for `premium` once its flight is late through the
    /// airline's fault. Rounds down to the nearest stroop.
    pub fn payout_for(&self, premium: i128) -> Result<i128, FlightSuretyError> {
        premium
            .checked_mul(self.payout_numerator)
            .and_then(|scaled| scaled.checked_div(self.payout_denominator))
            .ok_or(FlightSuretyError::InvalidInput)
    }
}

pub(crate) fn store(env: &Env, config: &EngineConfig) {
    env.storage().instance().set(&CONFIG, config);
}

pub fn load(env: &Env) -> Result<EngineConfig, FlightSuretyError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(FlightSuretyError::NotInitialized)
}
