//! Fleet - ships owned by a faction, maintained every turn

use serde::{Deserialize, Serialize};

use crate::core::types::{CharacterId, FactionId, FleetId, SystemId};
use crate::world::repository::Aggregate;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fleet {
    pub id: FleetId,
    pub name: String,
    pub owner: FactionId,
    pub system: SystemId,
    /// Full maintenance cost; the charged share is set by economy tuning
    pub upkeep_cost: i64,
    pub commander: Option<CharacterId>,
}

impl Fleet {
    pub fn new(id: FleetId, name: impl Into<String>, owner: FactionId, system: SystemId) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            system,
            upkeep_cost: 0,
            commander: None,
        }
    }

    pub fn with_upkeep(mut self, upkeep_cost: i64) -> Self {
        self.upkeep_cost = upkeep_cost;
        self
    }

    pub fn with_commander(mut self, commander: CharacterId) -> Self {
        self.commander = Some(commander);
        self
    }
}

impl Aggregate for Fleet {
    type Id = FleetId;

    fn id(&self) -> FleetId {
        self.id
    }
}
