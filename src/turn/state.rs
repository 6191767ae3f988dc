//! GameState - everything one turn reads and mutates

use crate::core::calendar::Clock;
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{LoanId, PlanetId, RouteId};
use crate::economy::{AccountRef, EconomicEngine, EconomyContext, InMemoryFunds, UpkeepReport};
use crate::galaxy::Starmap;
use crate::turn::social::SocialLog;
use crate::world::World;

pub struct GameState {
    pub clock: Clock,
    pub world: World,
    pub starmap: Box<dyn Starmap>,
    pub funds: InMemoryFunds,
    pub economy: EconomicEngine,
    pub social_log: SocialLog,
}

impl GameState {
    pub fn new(config: &SimulationConfig, world: World, starmap: impl Starmap + 'static) -> Self {
        Self {
            clock: Clock::from_config(&config.calendar),
            world,
            starmap: Box::new(starmap),
            funds: InMemoryFunds::new(),
            economy: EconomicEngine::new(config.economy.clone()),
            social_log: SocialLog::new(),
        }
    }

    /// Split the state into the engine and the collaborators it settles against
    pub fn economy_parts(&mut self) -> (&mut EconomicEngine, EconomyContext<'_>) {
        (
            &mut self.economy,
            EconomyContext {
                clock: &self.clock,
                world: &mut self.world,
                starmap: self.starmap.as_ref(),
                funds: &mut self.funds,
            },
        )
    }

    pub fn end_of_turn_upkeep(&mut self) -> UpkeepReport {
        let (engine, mut ctx) = self.economy_parts();
        engine.end_of_turn_upkeep(&mut ctx)
    }

    pub fn create_trade_route(
        &mut self,
        origin: PlanetId,
        destination: PlanetId,
        capacity: u32,
        smuggling: bool,
    ) -> Result<RouteId> {
        self.economy.create_trade_route(origin, destination, capacity, smuggling)
    }

    pub fn issue_loan(
        &mut self,
        account: AccountRef,
        principal: i64,
        monthly_rate: f64,
        term_months: u32,
    ) -> Result<LoanId> {
        let (engine, mut ctx) = self.economy_parts();
        engine.issue_loan(&mut ctx, account, principal, monthly_rate, term_months)
    }
}
