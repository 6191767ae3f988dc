use std::fmt;

use thiserror::Error;

/// Kind of aggregate a lookup was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Faction,
    Planet,
    Fleet,
    Character,
    System,
    Route,
    Loan,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Faction => "Faction",
            EntityKind::Planet => "Planet",
            EntityKind::Fleet => "Fleet",
            EntityKind::Character => "Character",
            EntityKind::System => "System",
            EntityKind::Route => "Trade route",
            EntityKind::Loan => "Loan",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: u32 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Phase failure: {0}")]
    PhaseFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SimError {
    pub fn not_found(kind: EntityKind, id: impl Into<u32>) -> Self {
        SimError::NotFound { kind, id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SimError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
