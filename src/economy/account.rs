//! Accounts that can hold money: faction treasuries, planet budgets and
//! character purses

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{EntityKind, Result, SimError};
use crate::core::types::{CharacterId, FactionId, PlanetId};
use crate::economy::funds::FundsLedger;
use crate::world::World;

/// Reference to a money-holding account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccountRef {
    Faction(FactionId),
    Planet(PlanetId),
    Character(CharacterId),
}

impl AccountRef {
    /// Fail with NotFound if the account's aggregate does not exist
    pub fn ensure_exists(&self, world: &World) -> Result<()> {
        let exists = match *self {
            AccountRef::Faction(id) => world.factions.contains(id),
            AccountRef::Planet(id) => world.planets.contains(id),
            AccountRef::Character(id) => world.characters.contains(id),
        };
        if exists {
            Ok(())
        } else {
            Err(self.not_found())
        }
    }

    /// Current balance of the account (may be negative)
    pub fn balance(&self, world: &World, funds: &dyn FundsLedger) -> Result<i64> {
        match *self {
            AccountRef::Faction(id) => {
                self.ensure_exists(world)?;
                Ok(funds.balance(id))
            }
            AccountRef::Planet(id) => world
                .planets
                .get(id)
                .map(|p| p.budget)
                .ok_or_else(|| self.not_found()),
            AccountRef::Character(id) => world
                .characters
                .get(id)
                .map(|c| c.gold)
                .ok_or_else(|| self.not_found()),
        }
    }

    /// Apply a signed delta to the account
    pub fn adjust(&self, delta: i64, world: &mut World, funds: &mut dyn FundsLedger) -> Result<()> {
        match *self {
            AccountRef::Faction(id) => {
                self.ensure_exists(world)?;
                funds.add_balance(id, delta);
            }
            AccountRef::Planet(id) => {
                let mut planet = world.planets.get(id).ok_or_else(|| self.not_found())?;
                planet.budget = planet.budget.saturating_add(delta);
                world.planets.save(planet);
            }
            AccountRef::Character(id) => {
                let mut character = world.characters.get(id).ok_or_else(|| self.not_found())?;
                character.gold = character.gold.saturating_add(delta);
                world.characters.save(character);
            }
        }
        Ok(())
    }

    fn not_found(&self) -> SimError {
        match *self {
            AccountRef::Faction(id) => SimError::not_found(EntityKind::Faction, id),
            AccountRef::Planet(id) => SimError::not_found(EntityKind::Planet, id),
            AccountRef::Character(id) => SimError::not_found(EntityKind::Character, id),
        }
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRef::Faction(id) => write!(f, "faction {}", id),
            AccountRef::Planet(id) => write!(f, "planet {}", id),
            AccountRef::Character(id) => write!(f, "character {}", id),
        }
    }
}
