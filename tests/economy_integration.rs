//! Integration tests for the economic engine
//!
//! These tests drive end-of-turn upkeep through a full GameState:
//! - Smuggling payouts split between the pirates nearest each endpoint
//! - Trade value growing with distance, and tariffs skimming it
//! - Ship and infrastructure upkeep with per-item fault isolation
//! - Loan servicing through repayment and default
//! - The event log staying append-only and consistent with balances

use stellar_regency::core::config::{NegativeBalancePolicy, SimulationConfig};
use stellar_regency::core::types::{CharacterId, FactionId, FleetId, PlanetId, SystemId};
use stellar_regency::economy::{
    AccountRef, EconomyEventKind, EconomyState, FundsLedger, LoanStatus, UpkeepStep,
};
use stellar_regency::galaxy::StarChart;
use stellar_regency::turn::GameState;
use stellar_regency::world::{Character, Faction, Fleet, Planet, World};

// ============================================================================
// Fixtures
// ============================================================================

fn chart(systems: &[(u32, f64, f64)]) -> StarChart {
    let mut chart = StarChart::new();
    for &(id, x, y) in systems {
        chart.add_system(SystemId(id), format!("S{}", id), x, y).unwrap();
    }
    chart
}

fn state(world: World, chart: StarChart) -> GameState {
    GameState::new(&SimulationConfig::default(), world, chart)
}

fn funds(state: &GameState, faction: u32) -> i64 {
    state.funds.balance(FactionId(faction))
}

fn budget(state: &GameState, planet: u32) -> i64 {
    state.world.planets.get(PlanetId(planet)).unwrap().budget
}

// ============================================================================
// Trade and smuggling
// ============================================================================

/// Two mirrored smuggling routes between pirate-held ends pay each pirate
/// the full value of one route: the origin share of one plus the
/// destination share of the other.
#[test]
fn test_symmetric_smuggling_pays_both_pirates_equally() {
    let mut world = World::in_memory();
    world.factions.save(Faction::pirate(FactionId(1), "Red Hand"));
    world.factions.save(Faction::pirate(FactionId(2), "Black Sail"));
    world.factions.save(Faction::empire(FactionId(3), "Regency"));
    world.planets.save(Planet::new(PlanetId(1), "Aster Prime", SystemId(1)).with_owner(FactionId(3)));
    world.planets.save(Planet::new(PlanetId(2), "Brill", SystemId(2)).with_owner(FactionId(3)));

    let mut chart = chart(&[(1, 0.0, 0.0), (2, 45.0, 0.0)]);
    chart.register_pirate_base(FactionId(1), SystemId(1)).unwrap();
    chart.register_pirate_base(FactionId(2), SystemId(2)).unwrap();

    let mut state = state(world, chart);
    state.create_trade_route(PlanetId(1), PlanetId(2), 10, true).unwrap();
    state.create_trade_route(PlanetId(2), PlanetId(1), 10, true).unwrap();

    let report = state.end_of_turn_upkeep();

    assert!(report.is_clean(), "failures: {:?}", report.failures);
    // 10 × (1.0 + 0.1 × 45) = 55 per route
    assert_eq!(funds(&state, 1), 55);
    assert_eq!(funds(&state, 2), 55);
    assert_eq!(funds(&state, 3), 0);
    assert_eq!(state.economy.log().of_kind(EconomyEventKind::Smuggling).count(), 4);
    assert_eq!(budget(&state, 1), 0);
    assert_eq!(budget(&state, 2), 0);
}

/// A smuggling route whose ends share one nearest pirate pays that pirate
/// the whole value in a single event.
#[test]
fn test_smuggling_with_single_pirate_pays_full_value() {
    let mut world = World::in_memory();
    world.factions.save(Faction::pirate(FactionId(1), "Red Hand"));
    world.planets.save(Planet::new(PlanetId(1), "A", SystemId(1)));
    world.planets.save(Planet::new(PlanetId(2), "B", SystemId(2)));

    let mut chart = chart(&[(1, 0.0, 0.0), (2, 45.0, 0.0), (3, 20.0, 5.0)]);
    chart.register_pirate_base(FactionId(1), SystemId(3)).unwrap();

    let mut state = state(world, chart);
    state.create_trade_route(PlanetId(1), PlanetId(2), 10, true).unwrap();
    state.end_of_turn_upkeep();

    assert_eq!(funds(&state, 1), 55);
    assert_eq!(state.economy.log().of_kind(EconomyEventKind::Smuggling).count(), 1);
}

/// Longer hauls are worth strictly more at equal capacity.
#[test]
fn test_trade_value_grows_with_distance() {
    let mut world = World::in_memory();
    world.planets.save(Planet::new(PlanetId(1), "Hub", SystemId(1)));
    world.planets.save(Planet::new(PlanetId(2), "Near", SystemId(2)));
    world.planets.save(Planet::new(PlanetId(3), "Far", SystemId(3)));

    let mut state = state(world, chart(&[(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 100.0, 0.0)]));
    state.create_trade_route(PlanetId(1), PlanetId(2), 10, false).unwrap();
    state.create_trade_route(PlanetId(1), PlanetId(3), 10, false).unwrap();

    let report = state.end_of_turn_upkeep();

    assert!(report.is_clean());
    assert_eq!(budget(&state, 2), 20);
    assert_eq!(budget(&state, 3), 110);
    assert!(budget(&state, 3) > budget(&state, 2));
    assert_eq!(budget(&state, 1), 0);
}

/// A tariff set by the destination's owner is skimmed from the trade value.
#[test]
fn test_tariff_skims_trade_into_owner_treasury() {
    let mut world = World::in_memory();
    world.factions.save(Faction::empire(FactionId(5), "Customs Union"));
    world.planets.save(Planet::new(PlanetId(1), "Hub", SystemId(1)));
    world.planets.save(Planet::new(PlanetId(2), "Port", SystemId(2)).with_owner(FactionId(5)));

    let mut state = state(world, chart(&[(1, 0.0, 0.0), (2, 10.0, 0.0)]));
    state.create_trade_route(PlanetId(1), PlanetId(2), 10, false).unwrap();
    state.economy.set_tariff(FactionId(5), 10).unwrap();

    state.end_of_turn_upkeep();

    assert_eq!(funds(&state, 5), 2);
    assert_eq!(budget(&state, 2), 18);
    let trade: Vec<i64> = state
        .economy
        .log()
        .of_kind(EconomyEventKind::Trade)
        .map(|e| e.amount)
        .collect();
    assert_eq!(trade, vec![20]);
    let income: Vec<i64> = state
        .economy
        .log()
        .of_kind(EconomyEventKind::TradeIncome)
        .map(|e| e.amount)
        .collect();
    assert_eq!(income, vec![18]);

    // Clearing the tariff restores the full value on the next settlement
    state.economy.clear_tariff(FactionId(5));
    state.end_of_turn_upkeep();
    assert_eq!(budget(&state, 2), 38);
    assert_eq!(funds(&state, 5), 2);
}

// ============================================================================
// Upkeep
// ============================================================================

/// A fleet whose commander is missing is skipped; the rest of upkeep runs.
#[test]
fn test_missing_commander_skips_only_that_fleet() {
    let mut world = World::in_memory();
    world.factions.save(Faction::empire(FactionId(1), "Regency"));
    world.fleets.save(
        Fleet::new(FleetId(1), "Vigil", FactionId(1), SystemId(1))
            .with_upkeep(200)
            .with_commander(CharacterId(99)),
    );
    world.fleets.save(Fleet::new(FleetId(2), "Lance", FactionId(1), SystemId(1)).with_upkeep(300));
    world.planets.save(
        Planet::new(PlanetId(1), "Aster", SystemId(1))
            .with_owner(FactionId(1))
            .with_infrastructure(4),
    );

    let mut state = state(world, chart(&[(1, 0.0, 0.0)]));
    let report = state.end_of_turn_upkeep();

    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.step, UpkeepStep::ShipMaintenance);
    assert_eq!(failure.subject, "fleet 1");
    assert!(failure.error.contains("not found"));

    // Lance at 10% of 300, plus 4 infrastructure levels at 5 each
    assert_eq!(funds(&state, 1), -30 - 20);
    assert_eq!(report.events_appended, 2);
}

/// Skilled commanders and governors cut upkeep, capped at the configured maximum.
#[test]
fn test_skilled_officers_reduce_upkeep() {
    let mut world = World::in_memory();
    world.factions.save(Faction::empire(FactionId(1), "Regency"));
    world.characters.save(Character::new(CharacterId(1), "Admiral Vey").with_skills(100, 0, 100));
    world.characters.save(Character::new(CharacterId(2), "Governor Sato").with_skills(0, 50, 0));
    world.fleets.save(
        Fleet::new(FleetId(1), "Vigil", FactionId(1), SystemId(1))
            .with_upkeep(200)
            .with_commander(CharacterId(1)),
    );
    world.planets.save(
        Planet::new(PlanetId(1), "Aster", SystemId(1))
            .with_owner(FactionId(1))
            .with_infrastructure(10)
            .with_governor(CharacterId(2)),
    );

    let mut state = state(world, chart(&[(1, 0.0, 0.0)]));
    let report = state.end_of_turn_upkeep();

    assert!(report.is_clean());
    // Fleet: 20 × (1 - min(0.5, 0.3 + 0.1)) = 12
    // Infrastructure: 50 × (1 - 0.15) = 42.5 -> 43
    assert_eq!(funds(&state, 1), -12 - 43);
}

// ============================================================================
// Loans
// ============================================================================

/// A solvent borrower repays what it can each turn until the loan closes.
#[test]
fn test_loan_repaid_from_available_funds() {
    let mut world = World::in_memory();
    world.factions.save(Faction::empire(FactionId(1), "Regency"));
    let mut state = state(world, chart(&[(1, 0.0, 0.0)]));
    state.funds.add_balance(FactionId(1), 1000);

    let loan = state.issue_loan(AccountRef::Faction(FactionId(1)), 100, 0.07, 10).unwrap();
    assert_eq!(funds(&state, 1), 1100);

    state.end_of_turn_upkeep();

    let loan = state.economy.loan(loan).unwrap();
    assert_eq!(loan.status(), LoanStatus::FullyRepaid);
    assert_eq!(loan.remaining(), 0);
    // 100 borrowed, 7 interest, 107 repaid
    assert_eq!(funds(&state, 1), 993);

    let interest: Vec<i64> = state
        .economy
        .log()
        .of_kind(EconomyEventKind::LoanInterest)
        .map(|e| e.amount)
        .collect();
    assert_eq!(interest, vec![-7]);
}

/// A borrower who cannot meet the minimum obligation defaults, and the loan
/// never accrues or collects again.
#[test]
fn test_loan_defaults_when_minimum_unmet() {
    let mut world = World::in_memory();
    world.factions.save(Faction::empire(FactionId(1), "Regency"));
    world.fleets.save(Fleet::new(FleetId(1), "Dreadnought", FactionId(1), SystemId(1)).with_upkeep(2000));
    let mut state = state(world, chart(&[(1, 0.0, 0.0)]));

    let id = state.issue_loan(AccountRef::Faction(FactionId(1)), 100, 0.0, 2).unwrap();
    state.end_of_turn_upkeep();

    let loan = state.economy.loan(id).unwrap();
    assert_eq!(loan.status(), LoanStatus::Defaulted);
    assert_eq!(loan.remaining(), 100);
    assert_eq!(funds(&state, 1), -100);

    let defaults: Vec<i64> = state
        .economy
        .log()
        .of_kind(EconomyEventKind::LoanDefault)
        .map(|e| e.amount)
        .collect();
    assert_eq!(defaults, vec![0]);

    state.funds.add_balance(FactionId(1), 10_000);
    let before = state.economy.log().len();
    state.end_of_turn_upkeep();
    let after: Vec<EconomyEventKind> = state.economy.log().events()[before..].iter().map(|e| e.kind).collect();
    assert_eq!(after, vec![EconomyEventKind::Upkeep]);
    assert_eq!(state.economy.loan(id).unwrap().remaining(), 100);
}

/// Under the strict policy any deficit at servicing time defaults the loan.
#[test]
fn test_default_loans_policy_defaults_on_deficit() {
    let mut config = SimulationConfig::default();
    config.economy.negative_balance_policy = NegativeBalancePolicy::DefaultLoans;

    let mut world = World::in_memory();
    world.factions.save(Faction::empire(FactionId(1), "Regency"));
    let mut state = GameState::new(&config, world, chart(&[(1, 0.0, 0.0)]));

    let id = state.issue_loan(AccountRef::Faction(FactionId(1)), 500, 0.01, 5).unwrap();
    state.funds.add_balance(FactionId(1), -501);
    state.end_of_turn_upkeep();

    let loan = state.economy.loan(id).unwrap();
    assert_eq!(loan.status(), LoanStatus::Defaulted);
    assert_eq!(state.economy.log().of_kind(EconomyEventKind::LoanInterest).count(), 0);
}

/// Loans can be owned by characters; repayment comes out of their purse.
#[test]
fn test_character_loan_uses_personal_gold() {
    let mut world = World::in_memory();
    world.characters.save(Character::new(CharacterId(7), "Lady Orsa").with_gold(40));
    let mut state = state(world, chart(&[(1, 0.0, 0.0)]));

    let id = state.issue_loan(AccountRef::Character(CharacterId(7)), 60, 0.0, 3).unwrap();
    assert_eq!(state.world.characters.get(CharacterId(7)).unwrap().gold, 100);

    state.end_of_turn_upkeep();

    assert_eq!(state.economy.loan(id).unwrap().status(), LoanStatus::FullyRepaid);
    assert_eq!(state.world.characters.get(CharacterId(7)).unwrap().gold, 40);
}

/// Lending to an account that does not exist fails without side effects.
#[test]
fn test_issue_loan_to_missing_account_fails() {
    let mut state = state(World::in_memory(), chart(&[(1, 0.0, 0.0)]));
    let err = state
        .issue_loan(AccountRef::Faction(FactionId(42)), 100, 0.01, 12)
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(state.economy.log().is_empty());
    assert_eq!(state.economy.loans().count(), 0);
}

/// Compounding a huge debt saturates instead of overflowing, and servicing
/// carries on to a default.
#[test]
fn test_extreme_loan_saturates_through_upkeep() {
    let mut world = World::in_memory();
    world.factions.save(Faction::empire(FactionId(1), "Regency"));
    let mut state = state(world, chart(&[(1, 0.0, 0.0)]));

    let id = state
        .issue_loan(AccountRef::Faction(FactionId(1)), i64::MAX / 2, 2.0, 12)
        .unwrap();

    for _ in 0..3 {
        let report = state.end_of_turn_upkeep();
        assert!(report.is_clean(), "failures: {:?}", report.failures);
    }

    let loan = state.economy.loan(id).unwrap();
    assert_eq!(loan.status(), LoanStatus::Defaulted);
    assert_eq!(loan.remaining(), i64::MAX);
    assert_eq!(funds(&state, 1), 0);
    assert_eq!(
        funds(&state, 1),
        state.economy.log().net_funds_flow(AccountRef::Faction(FactionId(1)))
    );
}

// ============================================================================
// Ledger consistency
// ============================================================================

fn busy_state() -> GameState {
    let mut world = World::in_memory();
    world.factions.save(Faction::empire(FactionId(1), "Regency"));
    world.factions.save(Faction::empire(FactionId(2), "Concord"));
    world.factions.save(Faction::pirate(FactionId(3), "Red Hand"));
    world.fleets.save(Fleet::new(FleetId(1), "Vigil", FactionId(1), SystemId(1)).with_upkeep(250));
    world.fleets.save(Fleet::new(FleetId(2), "Lance", FactionId(2), SystemId(2)).with_upkeep(120));
    world.planets.save(
        Planet::new(PlanetId(1), "Aster", SystemId(1))
            .with_owner(FactionId(1))
            .with_infrastructure(3),
    );
    world.planets.save(
        Planet::new(PlanetId(2), "Brill", SystemId(2))
            .with_owner(FactionId(2))
            .with_infrastructure(2),
    );

    let mut chart = chart(&[(1, 0.0, 0.0), (2, 30.0, 40.0), (3, 60.0, 0.0)]);
    chart.register_pirate_base(FactionId(3), SystemId(3)).unwrap();

    let mut state = state(world, chart);
    state.create_trade_route(PlanetId(1), PlanetId(2), 12, false).unwrap();
    state.create_trade_route(PlanetId(2), PlanetId(1), 8, true).unwrap();
    state.economy.set_tariff(FactionId(2), 15).unwrap();
    state.issue_loan(AccountRef::Faction(FactionId(1)), 300, 0.02, 6).unwrap();
    state
}

/// Earlier entries are never rewritten by later turns.
#[test]
fn test_event_log_is_append_only() {
    let mut state = busy_state();
    state.end_of_turn_upkeep();
    let first_turn = state.economy.log().events().to_vec();

    for _ in 0..3 {
        state.clock.advance_turn();
        state.end_of_turn_upkeep();
    }

    let log = state.economy.log();
    assert!(log.len() > first_turn.len());
    assert_eq!(&log.events()[..first_turn.len()], first_turn.as_slice());
}

/// Every faction balance and planet budget equals the sum of fund-moving
/// events against it.
#[test]
fn test_faction_balances_match_event_log() {
    let mut state = busy_state();
    for _ in 0..5 {
        state.clock.advance_turn();
        state.end_of_turn_upkeep();
    }

    for faction in 1..=3 {
        let owner = AccountRef::Faction(FactionId(faction));
        assert_eq!(
            funds(&state, faction),
            state.economy.log().net_funds_flow(owner),
            "faction {}",
            faction
        );
    }
    for planet in 1..=2 {
        let owner = AccountRef::Planet(PlanetId(planet));
        assert_eq!(
            budget(&state, planet),
            state.economy.log().net_funds_flow(owner),
            "planet {}",
            planet
        );
    }
    assert!(budget(&state, 2) > 0);
}

/// Identical inputs produce identical ledgers.
#[test]
fn test_upkeep_is_deterministic() {
    let mut a = busy_state();
    let mut b = busy_state();
    for _ in 0..4 {
        a.end_of_turn_upkeep();
        b.end_of_turn_upkeep();
    }
    assert_eq!(a.economy.snapshot(), b.economy.snapshot());
    assert_eq!(a.funds.snapshot(), b.funds.snapshot());
}

/// A restored engine continues from where the snapshot left off.
#[test]
fn test_economy_state_survives_json() {
    let mut state = busy_state();
    state.end_of_turn_upkeep();

    let snapshot = state.economy.snapshot();
    let json = snapshot.to_json().unwrap();
    let restored = EconomyState::from_json(&json).unwrap();
    assert_eq!(restored, snapshot);

    state.economy = stellar_regency::economy::EconomicEngine::restore(
        state.economy.config().clone(),
        restored,
    );
    let next = state.create_trade_route(PlanetId(1), PlanetId(2), 1, false).unwrap();
    assert_eq!(u32::from(next), 3);
}
