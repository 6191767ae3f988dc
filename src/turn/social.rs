//! Social phase collaborators: intent planning, resolution and the social log

use serde::{Deserialize, Serialize};

use crate::core::calendar::Clock;
use crate::core::error::Result;
use crate::core::types::CharacterId;
use crate::turn::state::GameState;
use crate::world::Character;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    Socialize,
    Court,
    Gift,
    Insult,
    Scheme,
}

/// Something an actor means to do this month
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub target: Option<CharacterId>,
}

impl Intent {
    pub fn new(kind: IntentKind, target: Option<CharacterId>) -> Self {
        Self { kind, target }
    }
}

/// Outcome of a resolved intent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialEvent {
    pub year: i32,
    pub month: u32,
    pub actor: CharacterId,
    pub target: Option<CharacterId>,
    pub kind: IntentKind,
    pub description: String,
}

impl SocialEvent {
    pub fn new(
        clock: &Clock,
        actor: CharacterId,
        intent: &Intent,
        description: impl Into<String>,
    ) -> Self {
        Self {
            year: clock.current_year(),
            month: clock.current_month(),
            actor,
            target: intent.target,
            kind: intent.kind,
            description: description.into(),
        }
    }
}

/// Append-only record of social events
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLog {
    events: Vec<SocialEvent>,
}

impl SocialLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn extend(&mut self, events: Vec<SocialEvent>) {
        self.events.extend(events);
    }

    pub fn events(&self) -> &[SocialEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn for_actor(&self, actor: CharacterId) -> impl Iterator<Item = &SocialEvent> {
        self.events.iter().filter(move |e| e.actor == actor)
    }
}

/// Plans each living actor's intents for the month
pub trait SocialPlanner {
    fn plan_intents(&mut self, actor: &Character, state: &GameState) -> Result<Vec<Intent>>;
}

/// Resolves one intent into the social events it produced
pub trait IntentResolver {
    fn resolve(
        &mut self,
        actor: &Character,
        intent: &Intent,
        state: &mut GameState,
    ) -> Result<Vec<SocialEvent>>;
}

impl<F> SocialPlanner for F
where
    F: FnMut(&Character, &GameState) -> Result<Vec<Intent>>,
{
    fn plan_intents(&mut self, actor: &Character, state: &GameState) -> Result<Vec<Intent>> {
        self(actor, state)
    }
}

impl<F> IntentResolver for F
where
    F: FnMut(&Character, &Intent, &mut GameState) -> Result<Vec<SocialEvent>>,
{
    fn resolve(
        &mut self,
        actor: &Character,
        intent: &Intent,
        state: &mut GameState,
    ) -> Result<Vec<SocialEvent>> {
        self(actor, intent, state)
    }
}

/// Planner that never plans anything
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePlanner;

impl SocialPlanner for IdlePlanner {
    fn plan_intents(&mut self, _actor: &Character, _state: &GameState) -> Result<Vec<Intent>> {
        Ok(Vec::new())
    }
}

/// Resolver that records each intent as a plain event
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingResolver;

impl IntentResolver for RecordingResolver {
    fn resolve(
        &mut self,
        actor: &Character,
        intent: &Intent,
        state: &mut GameState,
    ) -> Result<Vec<SocialEvent>> {
        let description = match intent.target {
            Some(target) => format!("{} {:?} character {}", actor.name, intent.kind, target),
            None => format!("{} {:?}", actor.name, intent.kind),
        };
        Ok(vec![SocialEvent::new(&state.clock, actor.id, intent, description)])
    }
}
