//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            pub fn new(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> u32 {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Unique identifier for factions (empires and pirate clans alike)
    FactionId
);
id_type!(
    /// Unique identifier for planets
    PlanetId
);
id_type!(
    /// Unique identifier for fleets
    FleetId
);
id_type!(
    /// Unique identifier for characters (commanders, governors, social actors)
    CharacterId
);
id_type!(
    /// Unique identifier for star systems on the starmap
    SystemId
);
id_type!(
    /// Unique identifier for registered trade routes
    RouteId
);
id_type!(
    /// Unique identifier for loans
    LoanId
);

/// Game turn counter, used only as a label for logging and reports
pub type TurnNumber = u64;
