//! Economic engine - registration and end-of-turn upkeep
//!
//! The engine is the sole writer of trade routes, loans, tariffs and the
//! economy log. Each turn, [`EconomicEngine::end_of_turn_upkeep`] runs four
//! sub-steps in a fixed order:
//!
//! 1. Ship maintenance, per fleet
//! 2. Infrastructure upkeep, per planet
//! 3. Trade settlement, per route
//! 4. Loan servicing, per loan
//!
//! A failed lookup only skips the item being processed; the rest of the
//! upkeep continues and the failure is returned in the [`UpkeepReport`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::calendar::Clock;
use crate::core::config::{EconomyConfig, NegativeBalancePolicy};
use crate::core::error::{EntityKind, Result, SimError};
use crate::core::types::{CharacterId, FactionId, FleetId, LoanId, PlanetId, RouteId, SystemId};
use crate::economy::account::AccountRef;
use crate::economy::ceil_credits;
use crate::economy::effects::EconomyEffect;
use crate::economy::events::EconomyLog;
use crate::economy::funds::FundsLedger;
use crate::economy::loan::{Loan, LoanBook};
use crate::economy::route::{TradeRoute, TradeRouteRegistry};
use crate::economy::tariff::{TariffPolicy, TariffTable};
use crate::galaxy::Starmap;
use crate::world::character::skill_fraction;
use crate::world::{Character, World};

/// Collaborators the engine reads and writes during settlement
pub struct EconomyContext<'a> {
    pub clock: &'a Clock,
    pub world: &'a mut World,
    pub starmap: &'a dyn Starmap,
    pub funds: &'a mut dyn FundsLedger,
}

/// Upkeep sub-steps, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpkeepStep {
    ShipMaintenance,
    Infrastructure,
    TradeSettlement,
    LoanServicing,
}

impl fmt::Display for UpkeepStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpkeepStep::ShipMaintenance => "ship maintenance",
            UpkeepStep::Infrastructure => "infrastructure",
            UpkeepStep::TradeSettlement => "trade settlement",
            UpkeepStep::LoanServicing => "loan servicing",
        };
        f.write_str(label)
    }
}

/// An upkeep item that was skipped
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpkeepFailure {
    pub step: UpkeepStep,
    pub subject: String,
    pub error: String,
}

/// Result of one end-of-turn upkeep
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpkeepReport {
    pub events_appended: usize,
    pub failures: Vec<UpkeepFailure>,
}

impl UpkeepReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Serializable economy state
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomyState {
    pub routes: Vec<TradeRoute>,
    pub loans: Vec<Loan>,
    pub tariffs: Vec<TariffPolicy>,
    pub log: EconomyLog,
}

impl EconomyState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub struct EconomicEngine {
    config: EconomyConfig,
    routes: TradeRouteRegistry,
    loans: LoanBook,
    tariffs: TariffTable,
    log: EconomyLog,
}

impl EconomicEngine {
    pub fn new(config: EconomyConfig) -> Self {
        Self {
            config,
            routes: TradeRouteRegistry::new(),
            loans: LoanBook::new(),
            tariffs: TariffTable::new(),
            log: EconomyLog::new(),
        }
    }

    /// Rebuild an engine from a snapshot
    pub fn restore(config: EconomyConfig, state: EconomyState) -> Self {
        let mut loans = LoanBook::new();
        for loan in state.loans {
            loans.insert(loan);
        }
        Self {
            config,
            routes: TradeRouteRegistry::restore(state.routes),
            loans,
            tariffs: TariffTable::restore(state.tariffs),
            log: state.log,
        }
    }

    pub fn snapshot(&self) -> EconomyState {
        EconomyState {
            routes: self.routes.iter().cloned().collect(),
            loans: self.loans.iter().cloned().collect(),
            tariffs: self.tariffs.iter().copied().collect(),
            log: self.log.clone(),
        }
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn log(&self) -> &EconomyLog {
        &self.log
    }

    pub fn routes(&self) -> &TradeRouteRegistry {
        &self.routes
    }

    pub fn loan(&self, id: LoanId) -> Option<&Loan> {
        self.loans.get(id)
    }

    pub fn loans(&self) -> impl Iterator<Item = &Loan> {
        self.loans.iter()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a trade route; it is first settled at the next upkeep
    pub fn create_trade_route(
        &mut self,
        origin: PlanetId,
        destination: PlanetId,
        capacity: u32,
        smuggling: bool,
    ) -> Result<RouteId> {
        let id = self.routes.create(origin, destination, capacity, smuggling)?;
        tracing::debug!(route = %id, %origin, %destination, capacity, smuggling, "trade route registered");
        Ok(id)
    }

    pub fn set_tariff(&mut self, faction: FactionId, rate_percent: u8) -> Result<()> {
        self.tariffs.set(faction, rate_percent)
    }

    pub fn clear_tariff(&mut self, faction: FactionId) -> Option<TariffPolicy> {
        self.tariffs.clear(faction)
    }

    pub fn tariff_for(&self, faction: FactionId) -> Option<&TariffPolicy> {
        self.tariffs.get(faction)
    }

    /// Lend `principal` to an account, crediting it immediately
    pub fn issue_loan(
        &mut self,
        ctx: &mut EconomyContext<'_>,
        account: AccountRef,
        principal: i64,
        monthly_rate: f64,
        term_months: u32,
    ) -> Result<LoanId> {
        account.ensure_exists(ctx.world)?;
        let id = self.loans.next_id();
        let loan = Loan::new(
            id,
            account,
            principal,
            monthly_rate,
            term_months,
            ctx.clock.current_year(),
            ctx.clock.current_month(),
        )?;
        EconomyEffect::LoanIssued {
            account,
            amount: principal,
        }
        .apply(format!("loan {} issued", id), ctx, &mut self.log)?;
        self.loans.insert(loan);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // End of turn
    // ------------------------------------------------------------------

    /// Run every upkeep sub-step for the current turn
    pub fn end_of_turn_upkeep(&mut self, ctx: &mut EconomyContext<'_>) -> UpkeepReport {
        let events_before = self.log.len();
        let mut failures = Vec::new();

        for fleet_id in ctx.world.fleets.ids() {
            if let Err(e) = self.maintain_fleet(ctx, fleet_id) {
                failures.push(failure(UpkeepStep::ShipMaintenance, format!("fleet {}", fleet_id), e));
            }
        }

        for planet_id in ctx.world.planets.ids() {
            if let Err(e) = self.maintain_infrastructure(ctx, planet_id) {
                failures.push(failure(UpkeepStep::Infrastructure, format!("planet {}", planet_id), e));
            }
        }

        let routes: Vec<TradeRoute> = self.routes.iter().cloned().collect();
        for route in &routes {
            if let Err(e) = self.settle_route(ctx, route) {
                failures.push(failure(UpkeepStep::TradeSettlement, format!("route {}", route.id), e));
            }
        }

        for loan_id in self.loans.ids() {
            if let Err(e) = self.service_loan(ctx, loan_id) {
                failures.push(failure(UpkeepStep::LoanServicing, format!("loan {}", loan_id), e));
            }
        }

        UpkeepReport {
            events_appended: self.log.len() - events_before,
            failures,
        }
    }

    /// Value of a route of `capacity` spanning `distance`
    pub fn route_value(&self, capacity: u32, distance: f64) -> i64 {
        let per_unit = self.config.trade_base_value + self.config.trade_distance_factor * distance;
        (f64::from(capacity) * per_unit).round() as i64
    }

    fn maintain_fleet(&mut self, ctx: &mut EconomyContext<'_>, fleet_id: FleetId) -> Result<()> {
        let fleet = ctx
            .world
            .fleets
            .get(fleet_id)
            .ok_or_else(|| SimError::not_found(EntityKind::Fleet, fleet_id))?;
        AccountRef::Faction(fleet.owner).ensure_exists(ctx.world)?;

        let reduction = match fleet.commander {
            Some(id) => {
                let commander = lookup_character(ctx.world, id)?;
                self.reduction(
                    &commander,
                    commander.military,
                    self.config.ship_military_weight,
                    self.config.ship_conscientiousness_weight,
                )
            }
            None => 0.0,
        };

        let rate = self.config.ship_upkeep_percent / 100.0 * (1.0 - reduction);
        let charge = ceil_credits(fleet.upkeep_cost.max(0) as f64 * rate);
        if charge == 0 {
            return Ok(());
        }

        EconomyEffect::Upkeep {
            faction: fleet.owner,
            amount: charge,
        }
        .apply(format!("maintenance for fleet {}", fleet.name), ctx, &mut self.log)
    }

    fn maintain_infrastructure(&mut self, ctx: &mut EconomyContext<'_>, planet_id: PlanetId) -> Result<()> {
        let planet = ctx
            .world
            .planets
            .get(planet_id)
            .ok_or_else(|| SimError::not_found(EntityKind::Planet, planet_id))?;
        let Some(owner) = planet.owner else {
            return Ok(());
        };
        AccountRef::Faction(owner).ensure_exists(ctx.world)?;

        let reduction = match planet.governor {
            Some(id) => {
                let governor = lookup_character(ctx.world, id)?;
                self.reduction(
                    &governor,
                    governor.economic,
                    self.config.infrastructure_economic_weight,
                    self.config.infrastructure_conscientiousness_weight,
                )
            }
            None => 0.0,
        };

        let base = i64::from(planet.infrastructure_level).saturating_mul(self.config.infrastructure_cost_per_level);
        let charge = ceil_credits(base as f64 * (1.0 - reduction));
        if charge == 0 {
            return Ok(());
        }

        EconomyEffect::Upkeep {
            faction: owner,
            amount: charge,
        }
        .apply(
            format!("infrastructure level {} on {}", planet.infrastructure_level, planet.name),
            ctx,
            &mut self.log,
        )
    }

    fn settle_route(&mut self, ctx: &mut EconomyContext<'_>, route: &TradeRoute) -> Result<()> {
        let origin = ctx
            .world
            .planets
            .get(route.origin)
            .ok_or_else(|| SimError::not_found(EntityKind::Planet, route.origin))?;
        let destination = ctx
            .world
            .planets
            .get(route.destination)
            .ok_or_else(|| SimError::not_found(EntityKind::Planet, route.destination))?;

        let distance = ctx.starmap.distance(origin.system, destination.system)?;
        let value = self.route_value(route.capacity, distance);
        tracing::debug!(route = %route.id, distance, value, smuggling = route.smuggling, "settling route");

        if route.smuggling {
            return self.settle_smuggling(ctx, route, origin.system, destination.system, value);
        }

        let tariff = destination
            .owner
            .and_then(|owner| self.tariffs.get(owner))
            .map(|policy| (policy.faction, policy.levy(value)))
            .filter(|(_, amount)| *amount > 0);
        if let Some((faction, _)) = tariff {
            AccountRef::Faction(faction).ensure_exists(ctx.world)?;
        }
        let tariff_amount = tariff.map_or(0, |(_, amount)| amount);

        if let Some((faction, amount)) = tariff {
            EconomyEffect::Tariff { faction, amount }.apply(
                format!("tariff on route {} into {}", route.id, destination.name),
                ctx,
                &mut self.log,
            )?;
        }
        EconomyEffect::Trade {
            planet: destination.id,
            gross: value,
            net: value - tariff_amount,
        }
        .apply(
            format!("trade {} -> {} over {:.1}", origin.name, destination.name, distance),
            ctx,
            &mut self.log,
        )
    }

    fn settle_smuggling(
        &mut self,
        ctx: &mut EconomyContext<'_>,
        route: &TradeRoute,
        origin_system: SystemId,
        destination_system: SystemId,
        value: i64,
    ) -> Result<()> {
        let origin_pirate = ctx.starmap.nearest_pirate_faction(origin_system)?;
        let destination_pirate = ctx.starmap.nearest_pirate_faction(destination_system)?;

        // Origin side takes the odd credit
        let origin_share = value - value / 2;
        let destination_share = value / 2;

        let payouts: Vec<(FactionId, i64)> = match (origin_pirate, destination_pirate) {
            (Some(a), Some(b)) if a == b => vec![(a, value)],
            (a, b) => a
                .map(|f| (f, origin_share))
                .into_iter()
                .chain(b.map(|f| (f, destination_share)))
                .collect(),
        };

        if origin_pirate.is_none() || destination_pirate.is_none() {
            tracing::debug!(route = %route.id, "no pirate near one endpoint, share unclaimed");
        }

        for (faction, _) in &payouts {
            AccountRef::Faction(*faction).ensure_exists(ctx.world)?;
        }
        for (faction, amount) in payouts {
            if amount == 0 {
                continue;
            }
            EconomyEffect::Smuggling { faction, amount }.apply(
                format!("contraband on route {}", route.id),
                ctx,
                &mut self.log,
            )?;
        }
        Ok(())
    }

    fn service_loan(&mut self, ctx: &mut EconomyContext<'_>, loan_id: LoanId) -> Result<()> {
        let fraction = self.config.loan_installment_fraction;
        let policy = self.config.negative_balance_policy;
        let loan = self
            .loans
            .get_mut(loan_id)
            .ok_or_else(|| SimError::not_found(EntityKind::Loan, loan_id))?;
        if !loan.is_active() {
            return Ok(());
        }

        let account = loan.account;
        let balance = account.balance(ctx.world, ctx.funds)?;

        if policy == NegativeBalancePolicy::DefaultLoans && balance < 0 {
            loan.mark_defaulted();
            tracing::debug!(loan = %loan_id, %account, balance, "loan defaulted on deficit");
            return EconomyEffect::LoanDefault { account }.apply(
                format!("loan {} defaulted: owner in deficit", loan_id),
                ctx,
                &mut self.log,
            );
        }

        let interest = loan.accrue_interest();
        if interest > 0 {
            EconomyEffect::LoanInterest {
                account,
                amount: interest,
            }
            .apply(format!("interest on loan {}", loan_id), ctx, &mut self.log)?;
        }

        let minimum = loan.minimum_obligation(fraction);
        let available = balance.max(0);
        if available < minimum {
            loan.mark_defaulted();
            tracing::debug!(loan = %loan_id, %account, available, minimum, "loan defaulted");
            return EconomyEffect::LoanDefault { account }.apply(
                format!("loan {} defaulted: {} available, {} due", loan_id, available, minimum),
                ctx,
                &mut self.log,
            );
        }

        let payment = available.min(loan.remaining());
        if payment <= 0 {
            return Ok(());
        }
        EconomyEffect::LoanPayment {
            account,
            amount: payment,
        }
        .apply(format!("payment on loan {}", loan_id), ctx, &mut self.log)?;
        loan.make_payment(payment);
        Ok(())
    }

    fn reduction(&self, character: &Character, skill: u8, skill_weight: f64, trait_weight: f64) -> f64 {
        if !character.alive {
            return 0.0;
        }
        let raw = skill_fraction(skill) * skill_weight
            + skill_fraction(character.conscientiousness) * trait_weight;
        raw.min(self.config.max_upkeep_reduction)
    }
}

fn lookup_character(world: &World, id: CharacterId) -> Result<Character> {
    world
        .characters
        .get(id)
        .ok_or_else(|| SimError::not_found(EntityKind::Character, id))
}

fn failure(step: UpkeepStep, subject: String, error: SimError) -> UpkeepFailure {
    tracing::warn!(step = %step, subject = %subject, error = %error, "upkeep item skipped");
    UpkeepFailure {
        step,
        subject,
        error: error.to_string(),
    }
}
