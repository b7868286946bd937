//! Simulation module with the step loop and the terminal undo pass.
//!
//! The `Simulation` struct drives a skirmish through a fixed step budget:
//!
//! 1. **RESOLVE**: Enemy, then Player, each append one command to the log
//! 2. **DRAIN**: Execute everything appended this step, in order
//! 3. **CHECK**: Stop early once either side's health is `<= 0`
//! 4. **PACE**: Optionally pause before the next step
//!
//! After the loop, [`Simulation::finish`] classifies the outcome, replays
//! the whole log backward and verifies that both actors are back to their
//! starting state.
//!
//! # Determinism
//!
//! Given the same configuration and the same decision source (for example
//! [`SeededDecisions`] with the same seed), a run produces the same commands,
//! the same display lines and the same report.
//!
//! # Example
//!
//! ```
//! use skirmish_core::config::SimulationConfig;
//! use skirmish_core::display::MemorySink;
//! use skirmish_core::simulation::{Simulation, SimulationState};
//!
//! let mut sim = Simulation::seeded(SimulationConfig::unpaced(), 42).unwrap();
//! let mut sink = MemorySink::new();
//!
//! let report = sim.run(&mut sink).unwrap();
//!
//! assert!(report.steps_run <= 10);
//! assert_eq!(sim.state(), SimulationState::Unwound);
//! assert_eq!(sink.lines().first().map(String::as_str), Some("Seed: 42"));
//! assert_eq!(sink.lines().last().map(String::as_str), Some("Undo all checks passed"));
//! ```

use std::fmt;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::actor::{ActorId, Combatants, CombatantsSnapshot};
use crate::config::SimulationConfig;
use crate::decision::{DecisionSource, SeededDecisions};
use crate::display::DisplaySink;
use crate::error::SimulationError;
use crate::log::CommandLog;
use crate::outcome::Outcome;
use crate::resolver::{ActionKind, TurnResolver};

// =============================================================================
// Records
// =============================================================================

/// Where a simulation is in its lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationState {
    /// Steps remain and nobody is defeated.
    Running,
    /// Stopped because a side reached `<= 0` health.
    Terminated,
    /// Stopped because the step budget was spent.
    Exhausted,
    /// Undo pass done and the initial state verified.
    Unwound,
}

impl SimulationState {
    /// True once the step loop has stopped, before unwinding.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Terminated | Self::Exhausted)
    }
}

/// What happened in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based step number.
    pub step: u32,
    /// Enemy's action.
    pub enemy: ActionKind,
    /// Player's action.
    pub player: ActionKind,
    /// Both actors after the step's drain.
    pub after: CombatantsSnapshot,
}

impl StepRecord {
    /// Action taken by `actor` in this step.
    #[must_use]
    pub const fn action(&self, actor: ActorId) -> ActionKind {
        match actor {
            ActorId::Player => self.player,
            ActorId::Enemy => self.enemy,
        }
    }
}

/// Summary of a finished and verified run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Seed of the decision source, if it had one.
    pub seed: Option<u64>,
    /// Configured step budget.
    pub step_budget: u32,
    /// Steps actually played.
    pub steps_run: u32,
    /// Why the loop stopped (`Terminated` or `Exhausted`).
    pub ended: SimulationState,
    /// Outcome classification.
    pub outcome: Outcome,
    /// Both actors at the end of play, before the undo pass.
    pub final_state: CombatantsSnapshot,
    /// Number of commands on the log.
    pub commands_issued: usize,
    /// Per-step history.
    pub steps: Vec<StepRecord>,
}

// =============================================================================
// Simulation
// =============================================================================

/// The skirmish orchestrator.
///
/// `Simulation` exclusively owns:
/// - both actors
/// - the command log and the drain cursor into it
/// - the turn resolver and its decision source
/// - the snapshot taken before the first step, for the round-trip check
pub struct Simulation {
    config: SimulationConfig,
    actors: Combatants,
    initial: CombatantsSnapshot,
    log: CommandLog,
    cursor: usize,
    resolver: TurnResolver,
    decisions: Box<dyn DecisionSource>,
    steps_run: u32,
    state: SimulationState,
    history: Vec<StepRecord>,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("actors", &self.actors)
            .field("log", &format!("[{} commands]", self.log.len()))
            .field("cursor", &self.cursor)
            .field("seed", &self.decisions.seed())
            .field("steps_run", &self.steps_run)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a simulation driven by `decisions`.
    ///
    /// # Errors
    ///
    /// [`SimulationError::Config`] when `config` fails validation.
    pub fn new(
        config: SimulationConfig,
        decisions: Box<dyn DecisionSource>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let actors = Combatants::new(config.player_hp, config.enemy_hp);
        Ok(Self {
            initial: actors.snapshot(),
            actors,
            log: CommandLog::new(),
            cursor: 0,
            resolver: TurnResolver::new(config.attack_damage),
            decisions,
            steps_run: 0,
            state: SimulationState::Running,
            history: Vec::new(),
            config,
        })
    }

    /// Creates a simulation driven by [`SeededDecisions`].
    ///
    /// # Errors
    ///
    /// [`SimulationError::Config`] when `config` fails validation.
    pub fn seeded(config: SimulationConfig, seed: u64) -> Result<Self, SimulationError> {
        Self::new(config, Box::new(SeededDecisions::new(seed)))
    }

    /// Plays one step: resolve Enemy, resolve Player, drain, check.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::InvalidState`] when the loop already stopped
    /// - [`SimulationError::Log`] if draining fails
    pub fn step(&mut self, sink: &mut dyn DisplaySink) -> Result<StepRecord, SimulationError> {
        if self.state != SimulationState::Running {
            return Err(SimulationError::InvalidState(self.state));
        }

        let step = self.steps_run + 1;
        sink.line(&format!("GAME STEP: {step}"));

        self.resolver.begin_step();
        let enemy = self.resolver.resolve(
            ActorId::Enemy,
            &self.actors,
            self.decisions.as_mut(),
            &mut self.log,
        );
        let player = self.resolver.resolve(
            ActorId::Player,
            &self.actors,
            self.decisions.as_mut(),
            &mut self.log,
        );

        self.cursor = self.log.drain_from(self.cursor, &mut self.actors, sink)?;
        self.steps_run = step;

        if self.actors.any_defeated() {
            self.state = SimulationState::Terminated;
        } else if self.steps_run >= self.config.steps {
            self.state = SimulationState::Exhausted;
        }

        let record = StepRecord {
            step,
            enemy,
            player,
            after: self.actors.snapshot(),
        };
        debug!(step, ?enemy, ?player, state = ?self.state, "step resolved");
        self.history.push(record.clone());
        Ok(record)
    }

    /// Plays until the budget is spent or a side is defeated, then
    /// [`finish`](Self::finish)es.
    ///
    /// Pauses for the configured delay between steps, never after the last.
    ///
    /// # Errors
    ///
    /// Any error from [`step`](Self::step) or [`finish`](Self::finish).
    pub fn run(&mut self, sink: &mut dyn DisplaySink) -> Result<RunReport, SimulationError> {
        if self.steps_run == 0 {
            if let Some(seed) = self.decisions.seed() {
                sink.line(&format!("Seed: {seed}"));
            }
            info!(
                seed = ?self.decisions.seed(),
                steps = self.config.steps,
                "simulation started"
            );
        }

        while self.state == SimulationState::Running {
            self.step(sink)?;
            if self.state == SimulationState::Running {
                if let Some(delay) = self.config.step_delay() {
                    thread::sleep(delay);
                }
            }
        }

        self.finish(sink)
    }

    /// Reports the outcome and final states, runs the undo pass and verifies
    /// the round trip.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::InvalidState`] unless the loop has stopped
    /// - [`SimulationError::Log`] if the undo pass fails
    /// - [`SimulationError::RoundTripViolation`] if the initial state is not restored
    pub fn finish(&mut self, sink: &mut dyn DisplaySink) -> Result<RunReport, SimulationError> {
        if !self.state.is_finished() {
            return Err(SimulationError::InvalidState(self.state));
        }

        let final_state = self.actors.snapshot();
        let outcome = Outcome::classify(final_state.player.hp, final_state.enemy.hp);
        sink.line(&outcome.to_string());
        sink.line(&final_state.player.to_string());
        sink.line(&final_state.enemy.to_string());
        info!(?outcome, steps_run = self.steps_run, "simulation finished");

        sink.line("");
        sink.line("Undo testing");
        self.log.undo_all(&mut self.actors, sink)?;
        self.verify_round_trip()?;
        sink.line("Undo all checks passed");

        let report = RunReport {
            seed: self.decisions.seed(),
            step_budget: self.config.steps,
            steps_run: self.steps_run,
            ended: self.state,
            outcome,
            final_state,
            commands_issued: self.log.len(),
            steps: self.history.clone(),
        };
        self.state = SimulationState::Unwound;
        Ok(report)
    }

    /// Compares both actors against the snapshot taken before the first step.
    ///
    /// # Errors
    ///
    /// [`SimulationError::RoundTripViolation`] naming the first actor that differs.
    pub fn verify_round_trip(&self) -> Result<(), SimulationError> {
        let current = self.actors.snapshot();
        match self.initial.first_difference(&current) {
            None => Ok(()),
            Some(actor) => {
                let expected = *self.initial.get(actor);
                let found = *current.get(actor);
                error!(%actor, %expected, %found, "undo pass did not restore initial state");
                Err(SimulationError::RoundTripViolation {
                    actor,
                    expected,
                    found,
                })
            }
        }
    }

    /// The two actors.
    #[must_use]
    pub fn actors(&self) -> &Combatants {
        &self.actors
    }

    /// The command log.
    #[must_use]
    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Steps played so far.
    #[must_use]
    pub fn steps_run(&self) -> u32 {
        self.steps_run
    }

    /// Per-step history so far.
    #[must_use]
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    /// Seed of the decision source, if it has one.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.decisions.seed()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{Direction, ScriptedDecisions};
    use crate::display::{MemorySink, NullSink};
    use crate::error::LogError;
    use glam::IVec2;

    fn scripted(
        config: SimulationConfig,
        coins: impl IntoIterator<Item = bool>,
        directions: impl IntoIterator<Item = Direction>,
    ) -> Simulation {
        Simulation::new(config, Box::new(ScriptedDecisions::new(coins, directions))).unwrap()
    }

    /// Every coin lands tails and every move goes up.
    fn idle(config: SimulationConfig) -> Simulation {
        Simulation::new(config, Box::new(ScriptedDecisions::default())).unwrap()
    }

    mod creation_tests {
        use super::*;

        #[test]
        fn new_starts_running_at_origin() {
            let sim = Simulation::seeded(SimulationConfig::unpaced(), 7).unwrap();
            assert_eq!(sim.state(), SimulationState::Running);
            assert_eq!(sim.steps_run(), 0);
            assert_eq!(sim.seed(), Some(7));
            assert_eq!(sim.actors(), &Combatants::new(3, 1));
            assert!(sim.log().is_empty());
        }

        #[test]
        fn invalid_config_is_rejected() {
            let err = Simulation::seeded(SimulationConfig::unpaced().with_steps(0), 7).unwrap_err();
            assert!(matches!(err, SimulationError::Config(_)));
        }
    }

    mod step_tests {
        use super::*;

        #[test]
        fn step_appends_and_drains_two_commands() {
            let mut sim = scripted(
                SimulationConfig::unpaced(),
                [false, false],
                [Direction::Up, Direction::Right],
            );
            let mut sink = MemorySink::new();

            let record = sim.step(&mut sink).unwrap();

            assert_eq!(record.step, 1);
            assert_eq!(record.enemy, ActionKind::Move(Direction::Up));
            assert_eq!(record.player, ActionKind::Move(Direction::Right));
            assert_eq!(record.after.enemy.position, IVec2::new(0, 1));
            assert_eq!(record.after.player.position, IVec2::new(1, 0));
            assert_eq!(sim.log().len(), 2);
            assert_eq!(sink.lines().len(), 3);
            assert_eq!(sink.lines()[0], "GAME STEP: 1");
        }

        #[test]
        fn enemy_attack_in_range_hurts_player() {
            let mut sim = scripted(SimulationConfig::unpaced(), [true], [Direction::Left]);
            let record = sim.step(&mut NullSink).unwrap();

            assert_eq!(record.enemy, ActionKind::Attack);
            assert_eq!(record.after.player.hp, 2);
            assert_eq!(record.after.player.position, IVec2::new(-1, 0));
            assert_eq!(sim.state(), SimulationState::Running);
        }

        #[test]
        fn killing_blow_terminates_early() {
            let mut sim = scripted(SimulationConfig::unpaced(), [false, true], [Direction::Up]);
            sim.step(&mut NullSink).unwrap();

            assert_eq!(sim.state(), SimulationState::Terminated);
            assert_eq!(sim.steps_run(), 1);
            assert!(sim.actors().get(ActorId::Enemy).is_defeated());
            assert!(matches!(
                sim.step(&mut NullSink),
                Err(SimulationError::InvalidState(SimulationState::Terminated))
            ));
        }

        #[test]
        fn budget_exhaustion_stops_loop() {
            let mut sim = idle(SimulationConfig::unpaced().with_steps(2));
            sim.step(&mut NullSink).unwrap();
            assert_eq!(sim.state(), SimulationState::Running);
            sim.step(&mut NullSink).unwrap();
            assert_eq!(sim.state(), SimulationState::Exhausted);
        }
    }

    mod finish_tests {
        use super::*;

        #[test]
        fn finish_before_stop_is_rejected() {
            let mut sim = idle(SimulationConfig::unpaced());
            assert!(matches!(
                sim.finish(&mut NullSink),
                Err(SimulationError::InvalidState(SimulationState::Running))
            ));
        }

        #[test]
        fn run_reports_and_unwinds() {
            // Step 1: enemy moves up, player attacks from distance 1 and kills.
            let mut sim = scripted(SimulationConfig::unpaced(), [false, true], [Direction::Up]);
            let mut sink = MemorySink::new();

            let report = sim.run(&mut sink).unwrap();

            assert_eq!(report.outcome, Outcome::WinWithBonus);
            assert_eq!(report.ended, SimulationState::Terminated);
            assert_eq!(report.steps_run, 1);
            assert_eq!(report.commands_issued, 2);
            assert_eq!(report.final_state.enemy.hp, 0);
            assert_eq!(report.seed, None);
            assert_eq!(sim.state(), SimulationState::Unwound);
            assert_eq!(sim.actors(), &Combatants::new(3, 1));

            let lines = sink.into_lines();
            assert_eq!(
                lines,
                vec![
                    "GAME STEP: 1".to_owned(),
                    "  Enemy  moves by\t(dx=0, dy=1)\tto\t(x=0, y=1)".to_owned(),
                    "  Player attacks Enemy for\t1 hit point".to_owned(),
                    "WIN with 2x BONUS (Bonus from killing Enemy)".to_owned(),
                    "Player: HP=3, posX=0, posY=0".to_owned(),
                    "Enemy: HP=0, posX=0, posY=1".to_owned(),
                    String::new(),
                    "Undo testing".to_owned(),
                    "  Player undo attacks Enemy for\t1 hit point".to_owned(),
                    "  Enemy  moves by\t(dx=0, dy=-1)\tto\t(x=0, y=0)".to_owned(),
                    "Undo all checks passed".to_owned(),
                ]
            );
        }

        #[test]
        fn finish_twice_is_rejected() {
            let mut sim = idle(SimulationConfig::unpaced().with_steps(1));
            sim.run(&mut NullSink).unwrap();
            assert!(matches!(
                sim.finish(&mut NullSink),
                Err(SimulationError::InvalidState(SimulationState::Unwound))
            ));
        }

        #[test]
        fn tampered_state_fails_round_trip() {
            let mut sim = idle(SimulationConfig::unpaced().with_steps(1));
            sim.step(&mut NullSink).unwrap();
            sim.actors.get_mut(ActorId::Player).restore_hp(1);

            let err = sim.finish(&mut NullSink).unwrap_err();
            match err {
                SimulationError::RoundTripViolation {
                    actor,
                    expected,
                    found,
                } => {
                    assert_eq!(actor, ActorId::Player);
                    assert_eq!(expected.hp, 3);
                    assert_eq!(found.hp, 4);
                }
                other => panic!("expected round-trip violation, got {other:?}"),
            }
            assert_eq!(sim.state(), SimulationState::Exhausted);
        }

        #[test]
        fn retrying_a_failed_finish_reports_log_error() {
            let mut sim = idle(SimulationConfig::unpaced().with_steps(1));
            sim.step(&mut NullSink).unwrap();
            sim.actors.get_mut(ActorId::Enemy).move_by(IVec2::new(9, 9));
            assert!(sim.finish(&mut NullSink).is_err());

            assert!(matches!(
                sim.finish(&mut NullSink),
                Err(SimulationError::Log(LogError::Command { .. }))
            ));
        }
    }

    mod pacing_tests {
        use super::*;
        use std::time::{Duration, Instant};

        #[test]
        fn pause_is_skipped_after_last_step() {
            let config = SimulationConfig {
                steps: 1,
                step_delay_ms: 5_000,
                pacing: true,
                ..Default::default()
            };
            let mut sim = idle(config);
            let started = Instant::now();
            sim.run(&mut NullSink).unwrap();
            assert!(started.elapsed() < Duration::from_secs(5));
        }
    }
}
