//! # Property-Based Test Generators
//!
//! `proptest` strategies for the flight surety engine.
//!
//! Generators produce semantic values (premiums, deposits, status codes,
//! action sequences) rather than raw bytes, and weight boundary cases
//! around the premium cap and the funding floor, where most of the
//! engine's decisions are made.

extern crate std;

use flight_surety::config::UNIT;
use flight_surety::flight::FlightStatus;
use proptest::prelude::*;
use std::vec::Vec;

/// Minimum airline deposit under the default configuration.
pub const MIN_FUNDING: i128 = 10 * UNIT;

// ── Scalar Generators ────────────────────────────────────────────────────────

/// Premiums around the 1-unit cap, including rejected values.
///
/// Distribution:
///   10% → 0
///   10% → 1 stroop
///   10% → exactly the cap
///   10% → cap + 1
///   10% → far above the cap
///   50% → uniform in [1, cap]
pub fn premium_strategy() -> impl Strategy<Value = i128> {
    prop_oneof![
        1 => Just(0i128),
        1 => Just(1i128),
        1 => Just(UNIT),
        1 => Just(UNIT + 1),
        1 => (2 * UNIT..=100 * UNIT),
        5 => (1i128..=UNIT),
    ]
}

/// Premiums the engine always accepts under the default cap.
pub fn valid_premium_strategy() -> impl Strategy<Value = i128> {
    prop_oneof![
        1 => Just(1i128),
        1 => Just(UNIT),
        8 => (1i128..=UNIT),
    ]
}

/// Premiums that are always rejected (non-positive or above the cap).
pub fn invalid_premium_strategy() -> impl Strategy<Value = i128> {
    prop_oneof![
        3 => Just(0i128),
        2 => (-1_000_000i128..=-1i128),
        1 => Just(i128::MIN),
        4 => (UNIT + 1..=1_000 * UNIT),
    ]
}

/// Airline deposits around the 10-unit floor.
pub fn funding_strategy() -> impl Strategy<Value = i128> {
    prop_oneof![
        1 => Just(0i128),
        2 => (1i128..MIN_FUNDING),
        3 => Just(MIN_FUNDING),
        4 => (MIN_FUNDING..=100 * UNIT),
    ]
}

/// Valid status codes, weighted toward the payout-triggering one.
pub fn status_strategy() -> impl Strategy<Value = FlightStatus> {
    prop_oneof![
        1 => Just(FlightStatus::Unknown),
        2 => Just(FlightStatus::OnTime),
        4 => Just(FlightStatus::LateAirline),
        1 => Just(FlightStatus::LateWeather),
        1 => Just(FlightStatus::LateTechnical),
        1 => Just(FlightStatus::LateOther),
    ]
}

/// Raw status codes; about a fifth are not valid oracle codes.
pub fn status_code_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![
        8 => status_strategy().prop_map(|s| s as u32),
        1 => (1u32..10u32),
        1 => (51u32..=u32::MAX),
    ]
}

/// Codes that never map to a status.
pub fn invalid_status_code_strategy() -> impl Strategy<Value = u32> {
    (0u32..=1_000u32).prop_filter("valid status code", |c| FlightStatus::from_code(*c).is_err())
}

/// Time deltas in seconds.
pub fn duration_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        1 => Just(0u64),
        3 => (1u64..=3_600u64),
        3 => (1u64..=86_400u64),
        1 => Just(604_800u64),
    ]
}

// ── Action Generators ────────────────────────────────────────────────────────

/// Engine actions for state exploration.
///
/// Index fields select from the explorer's pools by modular indexing:
/// `airline_index` from the airline pool, `passenger_index` from the
/// passenger pool and `flight_index` from the flights registered so far.
#[derive(Debug, Clone)]
pub enum EngineAction {
    Fund { airline_index: usize, amount: i128 },
    RegisterAirline { voter_index: usize, candidate_index: usize },
    RegisterFlight { airline_index: usize, designator: u16 },
    Buy { passenger_index: usize, flight_index: usize, amount: i128 },
    Report { flight_index: usize, status_code: u32 },
    Withdraw { passenger_index: usize, flight_index: usize },
    AdvanceTime { delta: u64 },
    /// Owner opens the circuit breaker.
    Halt,
    /// Owner closes the circuit breaker.
    Resume,
}

/// Weights favour the insurance flow; circuit-breaker toggles are rare.
pub fn engine_action_strategy(
    num_airlines: usize,
    num_passengers: usize,
) -> impl Strategy<Value = EngineAction> {
    let airline_idx = 0..num_airlines;
    let passenger_idx = 0..num_passengers;
    let flight_idx = 0usize..8usize;

    prop_oneof![
        12 => (airline_idx.clone(), funding_strategy())
            .prop_map(|(a, amount)| EngineAction::Fund { airline_index: a, amount }),
        12 => (airline_idx.clone(), airline_idx.clone())
            .prop_map(|(v, c)| EngineAction::RegisterAirline { voter_index: v, candidate_index: c }),
        10 => (airline_idx.clone(), 0u16..4u16)
            .prop_map(|(a, d)| EngineAction::RegisterFlight { airline_index: a, designator: d }),
        25 => (passenger_idx.clone(), flight_idx.clone(), premium_strategy())
            .prop_map(|(p, f, amount)| EngineAction::Buy { passenger_index: p, flight_index: f, amount }),
        15 => (flight_idx.clone(), status_code_strategy())
            .prop_map(|(f, code)| EngineAction::Report { flight_index: f, status_code: code }),
        15 => (passenger_idx, flight_idx)
            .prop_map(|(p, f)| EngineAction::Withdraw { passenger_index: p, flight_index: f }),
        8 => duration_strategy().prop_map(|d| EngineAction::AdvanceTime { delta: d }),
        2 => Just(EngineAction::Halt),
        1 => Just(EngineAction::Resume),
    ]
}

/// 1 to `max_len` engine actions.
pub fn engine_action_sequence(
    num_airlines: usize,
    num_passengers: usize,
    max_len: usize,
) -> impl Strategy<Value = Vec<EngineAction>> {
    prop::collection::vec(
        engine_action_strategy(num_airlines, num_passengers),
        1..=max_len,
    )
}

// ── Mutation Testing Support ─────────────────────────────────────────────────

/// A semantic mutation applied to an amount to check the suite notices it.
#[derive(Debug, Clone)]
pub enum Mutation {
    ZeroAmount,
    NegateAmount,
    MaxAmount,
    DoubleAmount,
    OffByOne,
}

pub fn mutation_strategy() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        Just(Mutation::ZeroAmount),
        Just(Mutation::NegateAmount),
        Just(Mutation::MaxAmount),
        Just(Mutation::DoubleAmount),
        Just(Mutation::OffByOne),
    ]
}

pub fn mutate_amount(amount: i128, mutation: &Mutation) -> i128 {
    match mutation {
        Mutation::ZeroAmount => 0,
        Mutation::NegateAmount => amount.checked_neg().unwrap_or(i128::MAX),
        Mutation::MaxAmount => i128::MAX,
        Mutation::DoubleAmount => amount.saturating_mul(2),
        Mutation::OffByOne => amount.saturating_add(1),
    }
}

// ── Historical Pattern Generators ────────────────────────────────────────────

/// Typical engine lifecycles expressed as action sequences.
///
/// Patterns assume the explorer pools: airline 0 is the genesis airline and
/// at least four airlines and four passengers exist.
#[derive(Debug, Clone)]
pub enum TransactionPattern {
    /// Seat three airlines, fund them, then vote a fifth in.
    ConsortiumBootstrap,
    /// One flight, two passengers, late-airline report, both withdraw.
    LateFlightPayout,
    /// Reports the same flight late twice with a purchase in between.
    RepeatedLateReport,
    /// Withdrawals attempted before any credit exists.
    EarlyWithdrawal,
    /// Activity while the circuit breaker is open, then resumed.
    HaltedEngine,
}

pub fn pattern_to_actions(pattern: &TransactionPattern, num_passengers: usize) -> Vec<EngineAction> {
    let late = FlightStatus::LateAirline as u32;
    match pattern {
        TransactionPattern::ConsortiumBootstrap => {
            let mut actions = Vec::new();
            for i in 1..4 {
                actions.push(EngineAction::RegisterAirline { voter_index: 0, candidate_index: i });
                actions.push(EngineAction::Fund { airline_index: i, amount: MIN_FUNDING });
            }
            actions.push(EngineAction::RegisterAirline { voter_index: 1, candidate_index: 4 });
            actions.push(EngineAction::RegisterAirline { voter_index: 2, candidate_index: 4 });
            actions.push(EngineAction::Fund { airline_index: 4, amount: MIN_FUNDING });
            actions
        }
        TransactionPattern::LateFlightPayout => {
            vec![
                EngineAction::RegisterAirline { voter_index: 0, candidate_index: 1 },
                EngineAction::Fund { airline_index: 1, amount: MIN_FUNDING },
                EngineAction::RegisterFlight { airline_index: 1, designator: 0 },
                EngineAction::Buy { passenger_index: 0, flight_index: 0, amount: UNIT },
                EngineAction::Buy { passenger_index: 1, flight_index: 0, amount: UNIT / 2 },
                EngineAction::AdvanceTime { delta: 3_600 },
                EngineAction::Report { flight_index: 0, status_code: late },
                EngineAction::Withdraw { passenger_index: 0, flight_index: 0 },
                EngineAction::Withdraw { passenger_index: 1, flight_index: 0 },
                EngineAction::Withdraw { passenger_index: 0, flight_index: 0 },
            ]
        }
        TransactionPattern::RepeatedLateReport => {
            let mut actions = vec![
                EngineAction::Fund { airline_index: 0, amount: MIN_FUNDING },
                EngineAction::RegisterFlight { airline_index: 0, designator: 1 },
                EngineAction::Buy { passenger_index: 0, flight_index: 0, amount: UNIT },
                EngineAction::Report { flight_index: 0, status_code: late },
                EngineAction::Report { flight_index: 0, status_code: late },
            ];
            for p in 1..num_passengers.min(4) {
                actions.push(EngineAction::Buy { passenger_index: p, flight_index: 0, amount: UNIT });
            }
            actions.push(EngineAction::Report { flight_index: 0, status_code: late });
            actions.push(EngineAction::Withdraw { passenger_index: 0, flight_index: 0 });
            actions
        }
        TransactionPattern::EarlyWithdrawal => {
            vec![
                EngineAction::RegisterFlight { airline_index: 0, designator: 2 },
                EngineAction::Withdraw { passenger_index: 0, flight_index: 0 },
                EngineAction::Buy { passenger_index: 0, flight_index: 0, amount: UNIT },
                EngineAction::Withdraw { passenger_index: 0, flight_index: 0 },
                EngineAction::Report { flight_index: 0, status_code: FlightStatus::LateWeather as u32 },
                EngineAction::Withdraw { passenger_index: 0, flight_index: 0 },
            ]
        }
        TransactionPattern::HaltedEngine => {
            vec![
                EngineAction::RegisterFlight { airline_index: 0, designator: 3 },
                EngineAction::Buy { passenger_index: 0, flight_index: 0, amount: UNIT },
                EngineAction::Halt,
                EngineAction::Report { flight_index: 0, status_code: late },
                EngineAction::Buy { passenger_index: 1, flight_index: 0, amount: UNIT },
                EngineAction::Resume,
                EngineAction::Fund { airline_index: 0, amount: MIN_FUNDING },
                EngineAction::Report { flight_index: 0, status_code: late },
                EngineAction::Withdraw { passenger_index: 0, flight_index: 0 },
            ]
        }
    }
}

pub fn transaction_pattern_strategy() -> impl Strategy<Value = TransactionPattern> {
    prop_oneof![
        Just(TransactionPattern::ConsortiumBootstrap),
        Just(TransactionPattern::LateFlightPayout),
        Just(TransactionPattern::RepeatedLateReport),
        Just(TransactionPattern::EarlyWithdrawal),
        Just(TransactionPattern::HaltedEngine),
    ]
}
