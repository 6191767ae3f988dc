//! Seeded scenario generation
//!
//! Builds a playable starting position from a [`GalaxyConfig`]: star systems,
//! empires with planets and fleets, pirate clans with bases, the characters
//! who govern and command them, and a set of trade and smuggling routes.
//! The same config always yields the same scenario.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::{GalaxyConfig, SimulationConfig};
use crate::core::error::{Result, SimError};
use crate::core::types::{CharacterId, FactionId, FleetId, PlanetId, SystemId};
use crate::economy::{FundsLedger, InMemoryFunds};
use crate::galaxy::starmap::StarChart;
use crate::turn::GameState;
use crate::world::{Character, Faction, Fleet, Planet, World};

const STARTING_TREASURY: i64 = 1000;
const PLACEMENT_ATTEMPTS: u32 = 16;

/// A route to register once the scenario becomes a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSpec {
    pub origin: PlanetId,
    pub destination: PlanetId,
    pub capacity: u32,
    pub smuggling: bool,
}

/// A generated starting position
pub struct Scenario {
    pub world: World,
    pub chart: StarChart,
    pub funds: InMemoryFunds,
    pub routes: Vec<RouteSpec>,
}

impl Scenario {
    /// Turn the scenario into live game state, registering its routes
    pub fn into_game_state(self, config: &SimulationConfig) -> Result<GameState> {
        let mut state = GameState::new(config, self.world, self.chart);
        state.funds = self.funds;
        for route in self.routes {
            state.create_trade_route(route.origin, route.destination, route.capacity, route.smuggling)?;
        }
        Ok(state)
    }
}

/// Generate a scenario
pub fn generate(config: &GalaxyConfig) -> Result<Scenario> {
    if config.systems < 2 || !(config.radius > 0.0) {
        return Err(SimError::Config("galaxy needs two systems and a positive radius".into()));
    }
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let mut chart = generate_chart(config, &mut rng)?;
    let mut generator = Generator {
        rng,
        world: World::in_memory(),
        funds: InMemoryFunds::new(),
        systems: config.systems,
        next_character: 1,
        next_planet: 1,
        next_fleet: 1,
    };

    let mut planets = Vec::new();
    for index in 1..=config.factions {
        let faction = FactionId(index);
        generator.world.factions.save(Faction::empire(faction, format!("Empire {}", index)));
        generator.funds.add_balance(faction, STARTING_TREASURY);

        for _ in 0..config.planets_per_faction {
            planets.push(generator.spawn_planet(faction));
        }
        for _ in 0..config.fleets_per_faction {
            generator.spawn_fleet(faction);
        }
    }

    for offset in 1..=config.pirate_factions {
        let faction = FactionId(config.factions + offset);
        generator.world.factions.save(Faction::pirate(faction, format!("Pirate Clan {}", offset)));
        let base = generator.random_system();
        chart.register_pirate_base(faction, base)?;
    }

    let mut routes = Vec::new();
    if planets.len() >= 2 {
        let total = config.trade_routes + config.smuggling_routes;
        for n in 0..total {
            let origin = planets[generator.rng.gen_range(0..planets.len())];
            let mut destination = planets[generator.rng.gen_range(0..planets.len())];
            while destination == origin {
                destination = planets[generator.rng.gen_range(0..planets.len())];
            }
            routes.push(RouteSpec {
                origin,
                destination,
                capacity: generator.rng.gen_range(5..=20),
                smuggling: n >= config.trade_routes,
            });
        }
    }

    tracing::info!(
        seed = config.seed,
        systems = config.systems,
        planets = planets.len(),
        routes = routes.len(),
        "scenario generated"
    );

    Ok(Scenario {
        world: generator.world,
        chart,
        funds: generator.funds,
        routes,
    })
}

fn generate_chart(config: &GalaxyConfig, rng: &mut ChaCha8Rng) -> Result<StarChart> {
    let mut chart = StarChart::new();
    for index in 1..=config.systems {
        let mut placed = false;
        for _ in 0..PLACEMENT_ATTEMPTS {
            let x = rng.gen_range(-config.radius..=config.radius);
            let y = rng.gen_range(-config.radius..=config.radius);
            if chart.add_system(SystemId(index), format!("System {}", index), x, y).is_ok() {
                placed = true;
                break;
            }
        }
        if !placed {
            return Err(SimError::Validation(format!("could not place system {}", index)));
        }
    }
    Ok(chart)
}

struct Generator {
    rng: ChaCha8Rng,
    world: World,
    funds: InMemoryFunds,
    systems: u32,
    next_character: u32,
    next_planet: u32,
    next_fleet: u32,
}

impl Generator {
    fn random_system(&mut self) -> SystemId {
        SystemId(self.rng.gen_range(1..=self.systems))
    }

    fn spawn_character(&mut self, faction: FactionId, title: &str) -> CharacterId {
        let id = CharacterId(self.next_character);
        self.next_character += 1;
        let character = Character::new(id, format!("{} {}", title, id))
            .with_faction(faction)
            .with_skills(
                self.rng.gen_range(0..=100),
                self.rng.gen_range(0..=100),
                self.rng.gen_range(0..=100),
            )
            .with_gold(self.rng.gen_range(0..100));
        self.world.characters.save(character);
        id
    }

    fn spawn_planet(&mut self, owner: FactionId) -> PlanetId {
        let id = PlanetId(self.next_planet);
        self.next_planet += 1;
        let governor = self.spawn_character(owner, "Governor");
        let system = self.random_system();
        let planet = Planet::new(id, format!("Planet {}", id), system)
            .with_owner(owner)
            .with_infrastructure(self.rng.gen_range(1..=5))
            .with_budget(self.rng.gen_range(50..200))
            .with_governor(governor);
        self.world.planets.save(planet);
        id
    }

    fn spawn_fleet(&mut self, owner: FactionId) -> FleetId {
        let id = FleetId(self.next_fleet);
        self.next_fleet += 1;
        let commander = self.spawn_character(owner, "Admiral");
        let system = self.random_system();
        let fleet = Fleet::new(id, format!("Fleet {}", id), owner, system)
            .with_upkeep(self.rng.gen_range(100..=400))
            .with_commander(commander);
        self.world.fleets.save(fleet);
        id
    }
}
