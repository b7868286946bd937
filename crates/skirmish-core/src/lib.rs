//! # Skirmish Core
//!
//! Turn-based Player vs Enemy skirmish built on a reversible command log.
//!
//! Every action taken during a run is recorded as a [`Command`] and applied
//! through the [`CommandLog`]. When the run ends, the log is replayed
//! backward and the initial state is checked, proving that every recorded
//! action is invertible.
//!
//! ## Architecture
//!
//! - **Actors**: two positioned, damageable participants ([`actor`])
//! - **Commands**: reversible moves and attacks ([`command`])
//! - **Log**: append, drain forward, undo backward ([`log`])
//! - **Resolver**: per-actor attack-or-move decisions ([`resolver`])
//! - **Simulation**: the step loop and the round-trip check ([`simulation`])
//!
//! ## Usage
//!
//! ```
//! use skirmish_core::{Simulation, SimulationConfig, WriterSink};
//!
//! let mut sim = Simulation::seeded(SimulationConfig::unpaced(), 2024).unwrap();
//! let mut sink = WriterSink::new(Vec::new());
//! let report = sim.run(&mut sink).unwrap();
//! println!("{} after {} steps", report.outcome, report.steps_run);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actor;
pub mod command;
pub mod config;
pub mod decision;
pub mod display;
pub mod error;
pub mod log;
pub mod outcome;
pub mod resolver;
pub mod simulation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use actor::{Actor, ActorId, ActorState, Combatants, CombatantsSnapshot};
pub use command::{AttackCommand, Command, CommandState, MoveCommand, Reversible};
pub use config::SimulationConfig;
pub use decision::{DecisionSource, Direction, ScriptedDecisions, SeededDecisions};
pub use display::{DisplaySink, MemorySink, NullSink, Phase, WriterSink};
pub use error::{CommandError, ConfigError, LogError, SimulationError};
pub use log::CommandLog;
pub use outcome::Outcome;
pub use resolver::{ActionKind, TurnResolver};
pub use simulation::{RunReport, Simulation, SimulationState, StepRecord};
