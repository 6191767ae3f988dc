//! Trade routes - directed, capacity-rated links between planets

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{PlanetId, RouteId};

/// A registered trade route, immutable once created
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRoute {
    pub id: RouteId,
    pub origin: PlanetId,
    pub destination: PlanetId,
    /// Abstract throughput per turn, always positive
    pub capacity: u32,
    pub smuggling: bool,
}

/// Registry of all trade routes, in creation order
#[derive(Clone, Debug, Default)]
pub struct TradeRouteRegistry {
    routes: BTreeMap<RouteId, TradeRoute>,
    next_id: u32,
}

impl TradeRouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a route; nothing is registered on error
    pub fn create(
        &mut self,
        origin: PlanetId,
        destination: PlanetId,
        capacity: u32,
        smuggling: bool,
    ) -> Result<RouteId> {
        if capacity == 0 {
            return Err(SimError::Validation("trade route capacity must be positive".into()));
        }
        if origin == destination {
            return Err(SimError::Validation(format!(
                "trade route cannot start and end at planet {}",
                origin
            )));
        }

        self.next_id += 1;
        let id = RouteId(self.next_id);
        self.routes.insert(
            id,
            TradeRoute {
                id,
                origin,
                destination,
                capacity,
                smuggling,
            },
        );
        Ok(id)
    }

    pub fn get(&self, id: RouteId) -> Option<&TradeRoute> {
        self.routes.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TradeRoute> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub(crate) fn restore(routes: Vec<TradeRoute>) -> Self {
        let next_id = routes.iter().map(|r| r.id.0).max().unwrap_or(0);
        Self {
            routes: routes.into_iter().map(|r| (r.id, r)).collect(),
            next_id,
        }
    }
}
