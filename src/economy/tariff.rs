//! Tariffs - faction-level cut of legitimate trade into its planets

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::FactionId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffPolicy {
    pub faction: FactionId,
    /// Whole percent, 0..=100
    pub rate_percent: u8,
}

impl TariffPolicy {
    /// Tariff owed on a trade value, rounded down
    pub fn levy(&self, value: i64) -> i64 {
        value.max(0) * i64::from(self.rate_percent) / 100
    }
}

#[derive(Clone, Debug, Default)]
pub struct TariffTable {
    policies: BTreeMap<FactionId, TariffPolicy>,
}

impl TariffTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, faction: FactionId, rate_percent: u8) -> Result<()> {
        if rate_percent > 100 {
            return Err(SimError::Validation(format!(
                "tariff rate {}% exceeds 100%",
                rate_percent
            )));
        }
        self.policies.insert(
            faction,
            TariffPolicy {
                faction,
                rate_percent,
            },
        );
        Ok(())
    }

    pub fn clear(&mut self, faction: FactionId) -> Option<TariffPolicy> {
        self.policies.remove(&faction)
    }

    pub fn get(&self, faction: FactionId) -> Option<&TariffPolicy> {
        self.policies.get(&faction)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TariffPolicy> {
        self.policies.values()
    }

    pub(crate) fn restore(policies: Vec<TariffPolicy>) -> Self {
        Self {
            policies: policies.into_iter().map(|p| (p.faction, p)).collect(),
        }
    }
}
