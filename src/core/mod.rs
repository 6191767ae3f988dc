pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::Clock;
pub use config::{CalendarConfig, EconomyConfig, GalaxyConfig, NegativeBalancePolicy, SimulationConfig};
pub use error::{EntityKind, Result, SimError};
