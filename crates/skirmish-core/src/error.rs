//! Error types for configuration, commands, the command log and the run loop.
//!
//! Out-of-range attacks are not errors: they are a defined outcome recorded on
//! the command itself. The only correctness failure is
//! [`SimulationError::RoundTripViolation`], raised when the undo pass does not
//! restore the initial state.

use thiserror::Error;

use crate::actor::{ActorId, ActorState};
use crate::simulation::SimulationState;

/// Invalid simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The step budget must allow at least one step.
    #[error("step budget must be at least 1")]
    ZeroSteps,

    /// An actor would start already defeated.
    #[error("{actor} must start with positive health, got {hp}")]
    NonPositiveHealth {
        /// Offending side.
        actor: ActorId,
        /// Configured starting health.
        hp: i32,
    },

    /// Attacks must deal damage.
    #[error("attack damage must be positive, got {0}")]
    NonPositiveDamage(i32),

    /// The configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Misuse of a single command's execute/undo state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    /// An attack named the same actor as source and target.
    #[error("{0} cannot attack itself")]
    SelfTarget(ActorId),

    /// `execute` was called on a command that already ran.
    #[error("command was already executed")]
    AlreadyExecuted,

    /// `undo` was called on a command that was already undone.
    #[error("command was already undone")]
    AlreadyUndone,
}

/// Failure while draining or unwinding the command log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    /// A drain cursor pointed past the end of the log.
    #[error("drain cursor {index} is past the end of the log (len {len})")]
    CursorOutOfRange {
        /// Requested cursor.
        index: usize,
        /// Log length at the time of the call.
        len: usize,
    },

    /// A command in the log refused to execute or undo.
    #[error("command #{index} failed: {source}")]
    Command {
        /// Position of the command in the log.
        index: usize,
        /// Underlying command error.
        #[source]
        source: CommandError,
    },
}

/// Failure of the simulation loop.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Rejected configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The command log could not be drained or unwound.
    #[error(transparent)]
    Log(#[from] LogError),

    /// A step or finish was requested in a state that does not allow it.
    #[error("operation not allowed while simulation is {0:?}")]
    InvalidState(SimulationState),

    /// The undo pass did not restore the initial state.
    #[error("undo pass did not restore {actor}: expected {expected}, found {found}")]
    RoundTripViolation {
        /// First actor found out of place.
        actor: ActorId,
        /// State before the first step.
        expected: ActorState,
        /// State after the undo pass.
        found: ActorState,
    },
}
