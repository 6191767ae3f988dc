//! Turn phases and the contract for opaque phase collaborators

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::TurnNumber;
use crate::turn::state::GameState;

/// The phases of one turn, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Clock,
    Lifecycle,
    Social,
    Affection,
    Ransom,
    Morale,
    Intrigue,
    Economy,
}

impl Phase {
    pub const ORDER: [Phase; 8] = [
        Phase::Clock,
        Phase::Lifecycle,
        Phase::Social,
        Phase::Affection,
        Phase::Ransom,
        Phase::Morale,
        Phase::Intrigue,
        Phase::Economy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Clock => "clock",
            Phase::Lifecycle => "lifecycle",
            Phase::Social => "social",
            Phase::Affection => "affection",
            Phase::Ransom => "ransom",
            Phase::Morale => "morale",
            Phase::Intrigue => "intrigue",
            Phase::Economy => "economy",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A game subsystem run once per turn
///
/// Lifecycle, affection, ransom, morale and intrigue are supplied by their
/// owning subsystems. Whatever a phase changed before returning an error
/// stays changed.
pub trait TurnPhase {
    fn run(&mut self, state: &mut GameState, turn: TurnNumber) -> Result<()>;
}

impl<F> TurnPhase for F
where
    F: FnMut(&mut GameState, TurnNumber) -> Result<()>,
{
    fn run(&mut self, state: &mut GameState, turn: TurnNumber) -> Result<()> {
        self(state, turn)
    }
}

/// Phase that does nothing; the default for unwired subsystems
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPhase;

impl TurnPhase for NoopPhase {
    fn run(&mut self, _state: &mut GameState, _turn: TurnNumber) -> Result<()> {
        Ok(())
    }
}
