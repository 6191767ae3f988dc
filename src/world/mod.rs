//! Domain aggregates and the repositories that hold them
//!
//! Planets, fleets, characters and factions are owned by external
//! collaborators; the turn kernel reads them through [`Repository`] and
//! writes back only the sub-state it owns (planet budgets, character purses).

pub mod character;
pub mod faction;
pub mod fleet;
pub mod planet;
pub mod repository;

pub use character::Character;
pub use faction::{Faction, FactionKind};
pub use fleet::Fleet;
pub use planet::Planet;
pub use repository::{Aggregate, InMemoryRepository, Repository};

use crate::core::types::CharacterId;

/// All aggregate repositories for one game
pub struct World {
    pub factions: Box<dyn Repository<Faction>>,
    pub planets: Box<dyn Repository<Planet>>,
    pub fleets: Box<dyn Repository<Fleet>>,
    pub characters: Box<dyn Repository<Character>>,
}

impl World {
    /// World backed by ordered in-memory repositories
    pub fn in_memory() -> Self {
        Self {
            factions: Box::new(InMemoryRepository::<Faction>::new()),
            planets: Box::new(InMemoryRepository::<Planet>::new()),
            fleets: Box::new(InMemoryRepository::<Fleet>::new()),
            characters: Box::new(InMemoryRepository::<Character>::new()),
        }
    }

    /// Ids of every living character, in id order
    pub fn living_characters(&self) -> Vec<CharacterId> {
        self.characters
            .ids()
            .into_iter()
            .filter(|id| self.characters.get(*id).is_some_and(|c| c.alive))
            .collect()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::in_memory()
    }
}
