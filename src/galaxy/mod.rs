//! Galaxy - starmap geometry and scenario generation

pub mod generation;
pub mod starmap;

pub use generation::{generate, RouteSpec, Scenario};
pub use starmap::{PirateBase, StarChart, StarSystem, Starmap};
