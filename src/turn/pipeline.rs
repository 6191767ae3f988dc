//! Turn pipeline - runs every phase of a turn in order, isolating failures
//!
//! Fault isolation boundaries, from smallest to largest:
//! intent -> actor -> phase. An error is recorded at the smallest boundary
//! that encloses it and processing resumes with the next unit of work.
//! Nothing escapes [`TurnPipeline::process_all_turn_events`].

use serde::{Deserialize, Serialize};

use crate::core::error::{EntityKind, Result, SimError};
use crate::core::types::{CharacterId, TurnNumber};
use crate::economy::UpkeepReport;
use crate::turn::phase::{NoopPhase, Phase, TurnPhase};
use crate::turn::social::{IdlePlanner, IntentResolver, RecordingResolver, SocialPlanner};
use crate::turn::state::GameState;

/// Outcome of one phase
///
/// `succeeded` reports whether the phase itself ran to completion. Items
/// skipped inside it are listed separately: social units in
/// [`TurnReport::unit_failures`], upkeep items in [`TurnReport::economy`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseOutcome {
    pub phase: Phase,
    pub succeeded: bool,
    pub error: Option<String>,
}

/// A unit of work inside a phase that failed and was skipped
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFailure {
    pub phase: Phase,
    pub label: String,
    pub error: String,
}

/// Everything that happened in one turn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: TurnNumber,
    pub year: i32,
    pub month: u32,
    pub phases: Vec<PhaseOutcome>,
    pub unit_failures: Vec<UnitFailure>,
    pub social_events: usize,
    pub economy: Option<UpkeepReport>,
}

impl TurnReport {
    fn new(turn: TurnNumber) -> Self {
        Self {
            turn,
            year: 0,
            month: 0,
            phases: Vec::with_capacity(Phase::ORDER.len()),
            unit_failures: Vec::new(),
            social_events: 0,
            economy: None,
        }
    }

    pub fn outcome(&self, phase: Phase) -> Option<&PhaseOutcome> {
        self.phases.iter().find(|o| o.phase == phase)
    }

    pub fn failed_phases(&self) -> Vec<Phase> {
        self.phases
            .iter()
            .filter(|o| !o.succeeded)
            .map(|o| o.phase)
            .collect()
    }

    /// Every phase succeeded and no unit of work inside one failed
    pub fn all_succeeded(&self) -> bool {
        self.failed_phases().is_empty()
            && self.unit_failures.is_empty()
            && self.economy.as_ref().map_or(true, UpkeepReport::is_clean)
    }

    fn record_phase(&mut self, phase: Phase, result: Result<()>) {
        let outcome = match result {
            Ok(()) => PhaseOutcome {
                phase,
                succeeded: true,
                error: None,
            },
            Err(e) => {
                tracing::warn!(phase = %phase, error = %e, "phase failed");
                PhaseOutcome {
                    phase,
                    succeeded: false,
                    error: Some(e.to_string()),
                }
            }
        };
        self.phases.push(outcome);
    }

    fn record_unit(&mut self, phase: Phase, label: String, error: SimError) {
        tracing::warn!(phase = %phase, unit = %label, error = %error, "unit of work failed");
        self.unit_failures.push(UnitFailure {
            phase,
            label,
            error: error.to_string(),
        });
    }
}

/// Orchestrates one full turn over a [`GameState`]
pub struct TurnPipeline {
    lifecycle: Box<dyn TurnPhase>,
    planner: Box<dyn SocialPlanner>,
    resolver: Box<dyn IntentResolver>,
    affection: Box<dyn TurnPhase>,
    ransom: Box<dyn TurnPhase>,
    morale: Box<dyn TurnPhase>,
    intrigue: Box<dyn TurnPhase>,
}

impl Default for TurnPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnPipeline {
    /// Pipeline with every external phase unwired
    pub fn new() -> Self {
        Self {
            lifecycle: Box::new(NoopPhase),
            planner: Box::new(IdlePlanner),
            resolver: Box::new(RecordingResolver),
            affection: Box::new(NoopPhase),
            ransom: Box::new(NoopPhase),
            morale: Box::new(NoopPhase),
            intrigue: Box::new(NoopPhase),
        }
    }

    pub fn with_lifecycle(mut self, phase: impl TurnPhase + 'static) -> Self {
        self.lifecycle = Box::new(phase);
        self
    }

    pub fn with_planner(mut self, planner: impl SocialPlanner + 'static) -> Self {
        self.planner = Box::new(planner);
        self
    }

    pub fn with_resolver(mut self, resolver: impl IntentResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_affection(mut self, phase: impl TurnPhase + 'static) -> Self {
        self.affection = Box::new(phase);
        self
    }

    pub fn with_ransom(mut self, phase: impl TurnPhase + 'static) -> Self {
        self.ransom = Box::new(phase);
        self
    }

    pub fn with_morale(mut self, phase: impl TurnPhase + 'static) -> Self {
        self.morale = Box::new(phase);
        self
    }

    pub fn with_intrigue(mut self, phase: impl TurnPhase + 'static) -> Self {
        self.intrigue = Box::new(phase);
        self
    }

    /// Run one full turn
    ///
    /// `turn` labels logs and the report; it does not steer anything.
    pub fn process_all_turn_events(&mut self, state: &mut GameState, turn: TurnNumber) -> TurnReport {
        let span = tracing::info_span!("turn", turn);
        let _enter = span.enter();

        let mut report = TurnReport::new(turn);
        for phase in Phase::ORDER {
            let result = match phase {
                Phase::Clock => {
                    state.clock.advance_turn();
                    Ok(())
                }
                Phase::Lifecycle => self.lifecycle.run(state, turn),
                Phase::Social => {
                    self.run_social(state, &mut report);
                    Ok(())
                }
                Phase::Affection => self.affection.run(state, turn),
                Phase::Ransom => self.ransom.run(state, turn),
                Phase::Morale => self.morale.run(state, turn),
                Phase::Intrigue => self.intrigue.run(state, turn),
                Phase::Economy => {
                    report.economy = Some(state.end_of_turn_upkeep());
                    Ok(())
                }
            };
            report.record_phase(phase, result);
        }

        report.year = state.clock.current_year();
        report.month = state.clock.current_month();
        tracing::info!(
            year = report.year,
            month = report.month,
            failed_phases = report.failed_phases().len(),
            unit_failures = report.unit_failures.len(),
            "turn complete"
        );
        report
    }

    /// Plan and resolve intents for every actor alive when the phase starts
    fn run_social(&mut self, state: &mut GameState, report: &mut TurnReport) {
        let actors = state.world.living_characters();
        for actor_id in actors {
            if let Err(e) = self.run_actor(state, actor_id, report) {
                report.record_unit(Phase::Social, format!("actor {}", actor_id), e);
            }
        }
    }

    fn run_actor(&mut self, state: &mut GameState, actor_id: CharacterId, report: &mut TurnReport) -> Result<()> {
        let actor = state
            .world
            .characters
            .get(actor_id)
            .ok_or_else(|| SimError::not_found(EntityKind::Character, actor_id))?;
        let intents = self.planner.plan_intents(&actor, state)?;

        for (index, intent) in intents.iter().enumerate() {
            match self.resolver.resolve(&actor, intent, state) {
                Ok(events) => {
                    report.social_events += events.len();
                    state.social_log.extend(events);
                }
                Err(e) => report.record_unit(
                    Phase::Social,
                    format!("actor {} intent {} ({:?})", actor_id, index, intent.kind),
                    e,
                ),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::galaxy::StarChart;
    use crate::turn::social::{Intent, IntentKind};
    use crate::world::{Character, World};

    fn state_with_actors(n: u32) -> GameState {
        let mut world = World::in_memory();
        for i in 1..=n {
            world.characters.save(Character::new(CharacterId(i), format!("Actor {}", i)));
        }
        GameState::new(&SimulationConfig::default(), world, StarChart::new())
    }

    struct TwoIntents;

    impl SocialPlanner for TwoIntents {
        fn plan_intents(&mut self, _actor: &crate::world::Character, _state: &GameState) -> Result<Vec<Intent>> {
            Ok(vec![
                Intent::new(IntentKind::Socialize, None),
                Intent::new(IntentKind::Scheme, None),
            ])
        }
    }

    #[test]
    fn test_default_pipeline_runs_every_phase_in_order() {
        let mut state = state_with_actors(2);
        let mut pipeline = TurnPipeline::new();
        let report = pipeline.process_all_turn_events(&mut state, 1);

        let phases: Vec<Phase> = report.phases.iter().map(|o| o.phase).collect();
        assert_eq!(phases, Phase::ORDER.to_vec());
        assert!(report.all_succeeded());
        assert_eq!((report.year, report.month), (3000, 2));
    }

    #[test]
    fn test_failing_phase_does_not_stop_later_phases() {
        let mut state = state_with_actors(0);
        let mut pipeline = TurnPipeline::new().with_ransom(|_: &mut GameState, _: TurnNumber| -> Result<()> {
            Err(SimError::PhaseFailed("hostage ledger corrupted".into()))
        });
        let report = pipeline.process_all_turn_events(&mut state, 7);

        assert_eq!(report.failed_phases(), vec![Phase::Ransom]);
        assert!(report.outcome(Phase::Economy).unwrap().succeeded);
        assert!(report.outcome(Phase::Ransom).unwrap().error.as_ref().unwrap().contains("hostage"));
    }

    #[test]
    fn test_failing_intent_skips_only_that_intent() {
        let mut state = state_with_actors(2);
        let resolver = |actor: &Character, intent: &Intent, state: &mut GameState| -> Result<Vec<crate::turn::social::SocialEvent>> {
            if intent.kind == IntentKind::Scheme {
                return Err(SimError::PhaseFailed("plot exposed".into()));
            }
            Ok(vec![crate::turn::social::SocialEvent::new(&state.clock, actor.id, intent, "chat")])
        };
        let mut pipeline = TurnPipeline::new().with_planner(TwoIntents).with_resolver(resolver);
        let report = pipeline.process_all_turn_events(&mut state, 1);

        assert_eq!(report.unit_failures.len(), 2);
        assert_eq!(report.social_events, 2);
        assert_eq!(state.social_log.len(), 2);
        assert!(report.failed_phases().is_empty());
        assert_eq!(report.unit_failures[0].label, "actor 1 intent 1 (Scheme)");
    }

    #[test]
    fn test_skipped_upkeep_item_leaves_economy_phase_succeeded() {
        use crate::core::types::{FactionId, FleetId, SystemId};
        use crate::world::{Faction, Fleet};

        let mut world = World::in_memory();
        world.factions.save(Faction::empire(FactionId(1), "Regency"));
        world.fleets.save(
            Fleet::new(FleetId(1), "Vigil", FactionId(1), SystemId(1))
                .with_upkeep(200)
                .with_commander(CharacterId(42)),
        );
        let mut state = GameState::new(&SimulationConfig::default(), world, StarChart::new());
        let report = TurnPipeline::new().process_all_turn_events(&mut state, 1);

        assert!(report.outcome(Phase::Economy).unwrap().succeeded);
        assert!(report.failed_phases().is_empty());
        assert_eq!(report.economy.as_ref().unwrap().failures.len(), 1);
        assert!(!report.all_succeeded());
    }
}
