#![no_main]

use arbitrary::Arbitrary;
use flight_surety::{config::UNIT, FlightSuretyContract, FlightSuretyContractClient};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, BytesN, Env, String,
};

/// Actions covering every mutating entry point. Amounts are expressed in
/// tenths of a unit so the premium cap and funding floor are hit often.
#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Fund { airline: u8, tenths: u16 },
    RegisterAirline { voter: u8, candidate: u8 },
    RegisterFlight { airline: u8, designator: u8 },
    Buy { passenger: u8, flight: u8, tenths: i16 },
    Report { flight: u8, code: u8 },
    Withdraw { passenger: u8, flight: u8 },
    Authorize { target: u8 },
    Halt,
    Resume,
    AdvanceTime { delta: u16 },
}

const SCHEDULED: &str = "2026-05-01T09:30:00Z";

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let oracle = Address::generate(&env);
    let token_id = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let sac = token::StellarAssetClient::new(&env, &token_id);
    let balances = token::Client::new(&env, &token_id);

    let contract_id = env.register(FlightSuretyContract, ());
    let client = FlightSuretyContractClient::new(&env, &contract_id);

    if client.try_initialize(&owner, &token_id).is_err() {
        return;
    }
    client.authorize_caller(&owner, &oracle);

    let mut airlines = vec![owner.clone()];
    for _ in 0..4 {
        airlines.push(Address::generate(&env));
    }
    let passengers: Vec<Address> = (0..4).map(|_| Address::generate(&env)).collect();
    let mut flights: Vec<(Address, String, BytesN<32>)> = Vec::new();
    let scheduled = String::from_str(&env, SCHEDULED);

    for action in actions.into_iter() {
        match action {
            FuzzAction::Fund { airline, tenths } => {
                let airline = &airlines[airline as usize % airlines.len()];
                let amount = tenths as i128 * UNIT / 10;
                if amount > 0 {
                    sac.mint(airline, &amount);
                }
                let _ = client.try_fund_airline(airline, &amount);
            }
            FuzzAction::RegisterAirline { voter, candidate } => {
                let voter = &airlines[voter as usize % airlines.len()];
                let candidate = &airlines[candidate as usize % airlines.len()];
                let _ = client.try_register_airline(voter, candidate);
            }
            FuzzAction::RegisterFlight { airline, designator } => {
                let airline = airlines[airline as usize % airlines.len()].clone();
                let designator = String::from_str(&env, &format!("FZ{}", designator % 8));
                if let Ok(Ok(key)) =
                    client.try_register_flight(&airline, &airline, &designator, &scheduled)
                {
                    flights.push((airline, designator, key));
                }
            }
            FuzzAction::Buy { passenger, flight, tenths } => {
                if flights.is_empty() {
                    continue;
                }
                let (airline, designator, _) = &flights[flight as usize % flights.len()];
                let passenger = &passengers[passenger as usize % passengers.len()];
                let amount = tenths as i128 * UNIT / 10;
                if amount > 0 {
                    sac.mint(passenger, &amount);
                }
                let _ = client.try_buy_insurance(
                    passenger, airline, passenger, designator, &scheduled, &amount,
                );
            }
            FuzzAction::Report { flight, code } => {
                if flights.is_empty() {
                    continue;
                }
                let (_, _, key) = &flights[flight as usize % flights.len()];
                let _ = client.try_process_flight_status_by_key(&oracle, key, &(code as u32));
            }
            FuzzAction::Withdraw { passenger, flight } => {
                if flights.is_empty() {
                    continue;
                }
                let (_, _, key) = &flights[flight as usize % flights.len()];
                let passenger = &passengers[passenger as usize % passengers.len()];
                let before = client.get_escrow_balance();
                if let Ok(Ok(paid)) = client.try_pay_insurance_by_key(passenger, key, passenger) {
                    assert!(paid > 0, "INVARIANT VIOLATION: zero payout succeeded");
                    assert_eq!(
                        client.get_escrow_balance(),
                        before - paid,
                        "INVARIANT VIOLATION: escrow not debited by payout"
                    );
                    assert_eq!(
                        client.get_insurance_amount(key, passenger),
                        0,
                        "INVARIANT VIOLATION: credit survives payout"
                    );
                }
            }
            FuzzAction::Authorize { target } => {
                let target = &passengers[target as usize % passengers.len()];
                let _ = client.try_authorize_caller(&owner, target);
            }
            FuzzAction::Halt => {
                let _ = client.try_set_operational(&owner, &false);
            }
            FuzzAction::Resume => {
                let _ = client.try_set_operational(&owner, &true);
            }
            FuzzAction::AdvanceTime { delta } => {
                let ts = env.ledger().timestamp().saturating_add(delta as u64);
                env.ledger().set_timestamp(ts);
            }
        }

        // ── Post-action invariant checks ──
        let escrow = client.get_escrow_balance();
        assert!(escrow >= 0, "INVARIANT VIOLATION: escrow went negative: {}", escrow);
        assert_eq!(
            escrow,
            balances.balance(&contract_id),
            "INVARIANT VIOLATION: escrow ledger diverged from token balance"
        );

        let registered = airlines
            .iter()
            .filter(|a| client.is_registered_airline(a))
            .count() as u32;
        let funded = airlines.iter().filter(|a| client.is_airline(a)).count() as u32;
        assert_eq!(registered, client.get_airline_count(), "INVARIANT VIOLATION: registered count");
        assert_eq!(funded, client.get_funded_airline_count(), "INVARIANT VIOLATION: funded count");

        let cap = client.get_config().max_premium;
        for (_, _, key) in &flights {
            for p in client.get_flight_passengers(key).iter() {
                let policy = client.get_insurance(key, &p);
                assert!(
                    policy.amount_paid > 0 && policy.amount_paid <= cap,
                    "INVARIANT VIOLATION: premium outside (0, cap]"
                );
                if !policy.credited {
                    assert_eq!(policy.credit_owed, 0, "INVARIANT VIOLATION: uncredited policy owes");
                }
                if policy.paid {
                    assert_eq!(policy.credit_owed, 0, "INVARIANT VIOLATION: paid policy owes");
                }
            }
        }
    }
});
