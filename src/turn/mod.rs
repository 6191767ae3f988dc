//! Turn processing: phases, social collaborators and the pipeline

pub mod phase;
pub mod pipeline;
pub mod social;
pub mod state;

pub use phase::{NoopPhase, Phase, TurnPhase};
pub use pipeline::{PhaseOutcome, TurnPipeline, TurnReport, UnitFailure};
pub use social::{
    IdlePlanner, Intent, IntentKind, IntentResolver, RecordingResolver, SocialEvent, SocialLog,
    SocialPlanner,
};
pub use state::GameState;
