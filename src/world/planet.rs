//! Planet - owned territory with infrastructure and a local budget

use serde::{Deserialize, Serialize};

use crate::core::types::{CharacterId, FactionId, PlanetId, SystemId};
use crate::world::repository::Aggregate;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    pub system: SystemId,
    pub owner: Option<FactionId>,
    /// Upkeep is charged per level each turn
    pub infrastructure_level: u32,
    /// Planetary treasury, credited by legitimate trade
    pub budget: i64,
    pub governor: Option<CharacterId>,
}

impl Planet {
    pub fn new(id: PlanetId, name: impl Into<String>, system: SystemId) -> Self {
        Self {
            id,
            name: name.into(),
            system,
            owner: None,
            infrastructure_level: 0,
            budget: 0,
            governor: None,
        }
    }

    pub fn with_owner(mut self, owner: FactionId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_infrastructure(mut self, level: u32) -> Self {
        self.infrastructure_level = level;
        self
    }

    pub fn with_governor(mut self, governor: CharacterId) -> Self {
        self.governor = Some(governor);
        self
    }

    pub fn with_budget(mut self, budget: i64) -> Self {
        self.budget = budget;
        self
    }
}

impl Aggregate for Planet {
    type Id = PlanetId;

    fn id(&self) -> PlanetId {
        self.id
    }
}
