//! Faction - empires and pirate clans

use serde::{Deserialize, Serialize};

use crate::core::types::FactionId;
use crate::world::repository::Aggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactionKind {
    Empire,
    Pirate,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub kind: FactionKind,
}

impl Faction {
    pub fn empire(id: FactionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: FactionKind::Empire,
        }
    }

    pub fn pirate(id: FactionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: FactionKind::Pirate,
        }
    }

    pub fn is_pirate(&self) -> bool {
        self.kind == FactionKind::Pirate
    }
}

impl Aggregate for Faction {
    type Id = FactionId;

    fn id(&self) -> FactionId {
        self.id
    }
}
