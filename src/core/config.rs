//! Simulation configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every section can be loaded from a
//! TOML file; missing keys fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Top-level configuration for a simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub calendar: CalendarConfig,
    pub economy: EconomyConfig,
    pub galaxy: GalaxyConfig,
}

/// Starting date and year length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub start_year: i32,
    pub start_month: u32,
    /// Months in a year. One turn is one month.
    pub months_per_year: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start_year: 3000,
            start_month: 1,
            months_per_year: 12,
        }
    }
}

/// What happens to loans when the borrowing account is in deficit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeBalancePolicy {
    /// Deficit spending is allowed indefinitely; only non-negative funds
    /// are available for loan payments.
    #[default]
    Allow,
    /// Any active loan whose owner is in deficit at servicing time defaults.
    DefaultLoans,
}

/// Tuning for the end-of-turn economic upkeep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    // === SHIP MAINTENANCE ===
    /// Percentage of a fleet's upkeep cost charged to its owner each turn
    ///
    /// At 10%, a fleet with upkeep cost 200 costs 20 credits per turn
    /// before commander reductions.
    pub ship_upkeep_percent: f64,

    /// Fractional reduction granted by a commander with military skill 100
    pub ship_military_weight: f64,

    /// Fractional reduction granted by a commander with conscientiousness 100
    pub ship_conscientiousness_weight: f64,

    // === INFRASTRUCTURE ===
    /// Credits charged per infrastructure level per turn
    pub infrastructure_cost_per_level: i64,

    /// Fractional reduction granted by a governor with economic skill 100
    pub infrastructure_economic_weight: f64,

    /// Fractional reduction granted by a governor with conscientiousness 100
    pub infrastructure_conscientiousness_weight: f64,

    /// Cap on the combined skill reduction for either upkeep kind (0..=1)
    ///
    /// Keeps even a perfect commander from running a fleet for free.
    pub max_upkeep_reduction: f64,

    // === TRADE ===
    /// Value per unit of capacity independent of distance
    pub trade_base_value: f64,

    /// Value per unit of capacity per unit of distance
    ///
    /// Must be positive: longer hauls are always worth strictly more.
    /// Route value = round(capacity × (trade_base_value + trade_distance_factor × distance)).
    pub trade_distance_factor: f64,

    // === LOANS ===
    /// Scales the per-turn minimum obligation of a loan
    ///
    /// Minimum obligation = min(remaining, ceil(principal / term × fraction)).
    /// At 1.0 the loan amortizes over its term.
    pub loan_installment_fraction: f64,

    /// How deficit balances interact with loan servicing
    pub negative_balance_policy: NegativeBalancePolicy,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            ship_upkeep_percent: 10.0,
            ship_military_weight: 0.3,
            ship_conscientiousness_weight: 0.1,

            infrastructure_cost_per_level: 5,
            infrastructure_economic_weight: 0.3,
            infrastructure_conscientiousness_weight: 0.1,

            max_upkeep_reduction: 0.5,

            trade_base_value: 1.0,
            trade_distance_factor: 0.1,

            loan_installment_fraction: 1.0,
            negative_balance_policy: NegativeBalancePolicy::Allow,
        }
    }
}

/// Parameters for the seeded scenario generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    pub seed: u64,
    pub systems: u32,
    pub factions: u32,
    pub pirate_factions: u32,
    pub planets_per_faction: u32,
    pub fleets_per_faction: u32,
    pub trade_routes: u32,
    pub smuggling_routes: u32,
    /// Systems are scattered uniformly inside a square of this half-width
    pub radius: f64,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            systems: 24,
            factions: 4,
            pirate_factions: 2,
            planets_per_faction: 3,
            fleets_per_faction: 2,
            trade_routes: 8,
            smuggling_routes: 3,
            radius: 100.0,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let calendar = &self.calendar;
        if calendar.months_per_year == 0 {
            return Err(SimError::Config("months_per_year must be positive".into()));
        }
        if calendar.start_month == 0 || calendar.start_month > calendar.months_per_year {
            return Err(SimError::Config(format!(
                "start_month ({}) must be within 1..={}",
                calendar.start_month, calendar.months_per_year
            )));
        }

        let economy = &self.economy;
        if !(economy.ship_upkeep_percent >= 0.0) {
            return Err(SimError::Config("ship_upkeep_percent must be non-negative".into()));
        }
        if economy.infrastructure_cost_per_level < 0 {
            return Err(SimError::Config(
                "infrastructure_cost_per_level must be non-negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&economy.max_upkeep_reduction) {
            return Err(SimError::Config(format!(
                "max_upkeep_reduction ({}) must be within 0..=1",
                economy.max_upkeep_reduction
            )));
        }
        let weights = [
            economy.ship_military_weight,
            economy.ship_conscientiousness_weight,
            economy.infrastructure_economic_weight,
            economy.infrastructure_conscientiousness_weight,
        ];
        if weights.iter().any(|w| !(*w >= 0.0)) {
            return Err(SimError::Config("skill weights must be non-negative".into()));
        }
        if !(economy.trade_base_value >= 0.0) {
            return Err(SimError::Config("trade_base_value must be non-negative".into()));
        }
        if !(economy.trade_distance_factor > 0.0) || !economy.trade_distance_factor.is_finite() {
            return Err(SimError::Config("trade_distance_factor must be positive".into()));
        }
        if !(economy.loan_installment_fraction > 0.0) {
            return Err(SimError::Config("loan_installment_fraction must be positive".into()));
        }

        let galaxy = &self.galaxy;
        if galaxy.systems < 2 {
            return Err(SimError::Config("galaxy needs at least two systems".into()));
        }
        if !(galaxy.radius > 0.0) {
            return Err(SimError::Config("galaxy radius must be positive".into()));
        }

        Ok(())
    }
}
