//! Starmap - inter-system geometry and pirate base registry
//!
//! The economy consumes the [`Starmap`] contract only: symmetric distances
//! between systems and the nearest registered pirate faction to a system.
//! [`StarChart`] is the coordinate-backed implementation used by the game
//! and by tests.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::error::{EntityKind, Result, SimError};
use crate::core::types::{FactionId, SystemId};

/// Read-only geometry service consumed by trade settlement
pub trait Starmap {
    /// Symmetric, non-negative distance; zero for a system to itself
    fn distance(&self, a: SystemId, b: SystemId) -> Result<f64>;

    /// Pirate faction whose base is closest to `system`, if any is registered
    fn nearest_pirate_faction(&self, system: SystemId) -> Result<Option<FactionId>>;
}

/// A star system on the chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// A pirate faction's base in a system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PirateBase {
    pub faction: FactionId,
    pub system: SystemId,
}

/// Coordinate-based starmap with Euclidean distances
///
/// Pirate bases keep registration order; when two bases are exactly
/// equidistant from a system, the one registered first is reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StarChart {
    systems: BTreeMap<SystemId, StarSystem>,
    pirate_bases: Vec<PirateBase>,
}

impl StarChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or move a system
    ///
    /// Distinct systems may not share coordinates, so that distance is zero
    /// only between a system and itself.
    pub fn add_system(&mut self, id: SystemId, name: impl Into<String>, x: f64, y: f64) -> Result<()> {
        if !x.is_finite() || !y.is_finite() {
            return Err(SimError::Validation(format!(
                "system {} has non-finite coordinates",
                id
            )));
        }
        if let Some(other) = self
            .systems
            .values()
            .find(|s| s.id != id && s.x == x && s.y == y)
        {
            return Err(SimError::Validation(format!(
                "system {} would overlap system {} at ({}, {})",
                id, other.id, x, y
            )));
        }
        self.systems.insert(
            id,
            StarSystem {
                id,
                name: name.into(),
                x,
                y,
            },
        );
        Ok(())
    }

    /// Register a pirate base; a faction may hold several
    pub fn register_pirate_base(&mut self, faction: FactionId, system: SystemId) -> Result<()> {
        self.system(system)?;
        let base = PirateBase { faction, system };
        if !self.pirate_bases.contains(&base) {
            self.pirate_bases.push(base);
        }
        Ok(())
    }

    pub fn system(&self, id: SystemId) -> Result<&StarSystem> {
        self.systems
            .get(&id)
            .ok_or_else(|| SimError::not_found(EntityKind::System, id))
    }

    pub fn systems(&self) -> impl Iterator<Item = &StarSystem> {
        self.systems.values()
    }

    pub fn pirate_bases(&self) -> &[PirateBase] {
        &self.pirate_bases
    }
}

impl Starmap for StarChart {
    fn distance(&self, a: SystemId, b: SystemId) -> Result<f64> {
        let from = self.system(a)?;
        let to = self.system(b)?;
        if a == b {
            return Ok(0.0);
        }
        let dx = from.x - to.x;
        let dy = from.y - to.y;
        Ok((dx * dx + dy * dy).sqrt())
    }

    fn nearest_pirate_faction(&self, system: SystemId) -> Result<Option<FactionId>> {
        self.system(system)?;
        let mut best: Option<(OrderedFloat<f64>, FactionId)> = None;
        for base in &self.pirate_bases {
            let d = OrderedFloat(self.distance(system, base.system)?);
            // Strict comparison keeps the earliest registration on ties
            if best.map_or(true, |(best_d, _)| d < best_d) {
                best = Some((d, base.faction));
            }
        }
        Ok(best.map(|(_, faction)| faction))
    }
}
