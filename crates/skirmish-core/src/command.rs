//! Reversible commands: the units of play recorded on the command log.
//!
//! Every action an actor takes is a [`Command`]. A command captures enough
//! state to invert itself, so a whole run can be replayed backward.
//!
//! # Architecture
//!
//! - [`Reversible`]: the execute/undo/describe contract
//! - [`MoveCommand`]: translate the source by a delta; inverse is the negated delta
//! - [`AttackCommand`]: damage the target if in range; inverse restores health
//!   only if the attack landed
//! - [`Command`]: tagged variant over both, dispatching through `match`
//!
//! # State Machine
//!
//! ```text
//! Created --execute--> Executed --undo--> Undone
//! ```
//!
//! - `execute` is legal only in `Created`
//! - `undo` in `Created` is a no-op (nothing was applied)
//! - `undo` in `Undone` is an error
//!
//! # Example
//!
//! ```
//! use skirmish_core::actor::{ActorId, Combatants};
//! use skirmish_core::command::{Command, Reversible};
//! use glam::IVec2;
//!
//! let mut actors = Combatants::new(3, 1);
//! let mut attack = Command::attack(ActorId::Player, ActorId::Enemy, 1).unwrap();
//!
//! attack.execute(&mut actors).unwrap();
//! assert_eq!(actors.get(ActorId::Enemy).hp(), 0);
//!
//! attack.undo(&mut actors).unwrap();
//! assert_eq!(actors.get(ActorId::Enemy).hp(), 1);
//! ```

use glam::IVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor::{ActorId, Combatants};
use crate::display::Phase;
use crate::error::CommandError;

// =============================================================================
// Contract
// =============================================================================

/// The execute/undo contract shared by every command.
pub trait Reversible {
    /// Applies the forward effect. Legal exactly once.
    ///
    /// # Errors
    ///
    /// [`CommandError::AlreadyExecuted`] if the command already ran.
    fn execute(&mut self, actors: &mut Combatants) -> Result<(), CommandError>;

    /// Applies the exact inverse of [`Reversible::execute`].
    ///
    /// Performs no mutation when the forward effect changed nothing.
    ///
    /// # Errors
    ///
    /// [`CommandError::AlreadyUndone`] if the command was already undone.
    fn undo(&mut self, actors: &mut Combatants) -> Result<(), CommandError>;

    /// One human-readable line describing the transition just made.
    fn describe(&self, actors: &Combatants, phase: Phase) -> String;
}

/// Lifecycle of a command instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CommandState {
    /// Built but not yet applied.
    #[default]
    Created,
    /// Forward effect applied.
    Executed,
    /// Inverse applied.
    Undone,
}

impl CommandState {
    fn begin_execute(&mut self) -> Result<(), CommandError> {
        match self {
            Self::Created => {
                *self = Self::Executed;
                Ok(())
            }
            Self::Executed | Self::Undone => Err(CommandError::AlreadyExecuted),
        }
    }

    /// Returns whether the inverse must be applied.
    fn begin_undo(&mut self) -> Result<bool, CommandError> {
        match self {
            Self::Created => Ok(false),
            Self::Executed => {
                *self = Self::Undone;
                Ok(true)
            }
            Self::Undone => Err(CommandError::AlreadyUndone),
        }
    }
}

// =============================================================================
// MoveCommand
// =============================================================================

/// Translates the source actor by a fixed delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCommand {
    source: ActorId,
    delta: IVec2,
    state: CommandState,
}

impl MoveCommand {
    /// Creates a move of `source` by `delta`.
    #[must_use]
    pub const fn new(source: ActorId, delta: IVec2) -> Self {
        Self {
            source,
            delta,
            state: CommandState::Created,
        }
    }

    /// The moving actor.
    #[must_use]
    pub const fn source(&self) -> ActorId {
        self.source
    }

    /// The forward delta.
    #[must_use]
    pub const fn delta(&self) -> IVec2 {
        self.delta
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> CommandState {
        self.state
    }
}

impl Reversible for MoveCommand {
    fn execute(&mut self, actors: &mut Combatants) -> Result<(), CommandError> {
        self.state.begin_execute()?;
        actors.get_mut(self.source).move_by(self.delta);
        debug!(actor = %self.source, dx = self.delta.x, dy = self.delta.y, "move executed");
        Ok(())
    }

    fn undo(&mut self, actors: &mut Combatants) -> Result<(), CommandError> {
        if self.state.begin_undo()? {
            actors.get_mut(self.source).move_by(-self.delta);
            debug!(actor = %self.source, dx = -self.delta.x, dy = -self.delta.y, "move undone");
        }
        Ok(())
    }

    fn describe(&self, actors: &Combatants, phase: Phase) -> String {
        let delta = match phase {
            Phase::Forward => self.delta,
            Phase::Reverse => -self.delta,
        };
        let at = actors.get(self.source).position();
        format!(
            "  {:<6} moves by\t(dx={}, dy={})\tto\t(x={}, y={})",
            self.source, delta.x, delta.y, at.x, at.y
        )
    }
}

// =============================================================================
// AttackCommand
// =============================================================================

/// Melee attack from `source` against `target`.
///
/// Records whether the attack landed. Undo restores the target's health
/// only when it did, and does so without re-checking range: by the time an
/// attack is undone every later command has been reverted, and keying off
/// the stored flag keeps the inverse independent of positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackCommand {
    source: ActorId,
    target: ActorId,
    amount: i32,
    applied: bool,
    state: CommandState,
}

impl AttackCommand {
    /// Creates an attack of `amount` points.
    ///
    /// # Errors
    ///
    /// [`CommandError::SelfTarget`] when `source == target`.
    pub fn new(source: ActorId, target: ActorId, amount: i32) -> Result<Self, CommandError> {
        if source == target {
            return Err(CommandError::SelfTarget(source));
        }
        Ok(Self {
            source,
            target,
            amount,
            applied: false,
            state: CommandState::Created,
        })
    }

    /// Creates an attack of `amount` points by `source` on its opponent.
    #[must_use]
    pub const fn against(source: ActorId, amount: i32) -> Self {
        Self {
            source,
            target: source.opponent(),
            amount,
            applied: false,
            state: CommandState::Created,
        }
    }

    /// The attacking actor.
    #[must_use]
    pub const fn source(&self) -> ActorId {
        self.source
    }

    /// The attacked actor.
    #[must_use]
    pub const fn target(&self) -> ActorId {
        self.target
    }

    /// Damage dealt when the attack lands.
    #[must_use]
    pub const fn amount(&self) -> i32 {
        self.amount
    }

    /// True if the forward attack changed the target's health.
    #[must_use]
    pub const fn applied(&self) -> bool {
        self.applied
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> CommandState {
        self.state
    }
}

impl Reversible for AttackCommand {
    fn execute(&mut self, actors: &mut Combatants) -> Result<(), CommandError> {
        let (source, target) = actors
            .pair_mut(self.source, self.target)
            .ok_or(CommandError::SelfTarget(self.source))?;
        self.state.begin_execute()?;
        self.applied = source.attack(target, self.amount);
        debug!(
            source = %self.source,
            target = %self.target,
            amount = self.amount,
            applied = self.applied,
            "attack executed"
        );
        Ok(())
    }

    fn undo(&mut self, actors: &mut Combatants) -> Result<(), CommandError> {
        if self.state.begin_undo()? && self.applied {
            actors.get_mut(self.target).restore_hp(self.amount);
            debug!(
                source = %self.source,
                target = %self.target,
                amount = self.amount,
                "attack undone"
            );
        }
        Ok(())
    }

    fn describe(&self, _actors: &Combatants, phase: Phase) -> String {
        let verb = match phase {
            Phase::Forward => "attacks",
            Phase::Reverse => "undo attacks",
        };
        format!(
            "  {} {verb} {} for\t{} hit point",
            self.source,
            self.target,
            self.amount.unsigned_abs()
        )
    }
}

// =============================================================================
// Command
// =============================================================================

/// A reversible unit of play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Translate an actor.
    Move(MoveCommand),
    /// Melee attack.
    Attack(AttackCommand),
}

impl Command {
    /// Shorthand for a [`MoveCommand`].
    #[must_use]
    pub const fn movement(source: ActorId, delta: IVec2) -> Self {
        Self::Move(MoveCommand::new(source, delta))
    }

    /// Shorthand for an [`AttackCommand`].
    ///
    /// # Errors
    ///
    /// [`CommandError::SelfTarget`] when `source == target`.
    pub fn attack(source: ActorId, target: ActorId, amount: i32) -> Result<Self, CommandError> {
        AttackCommand::new(source, target, amount).map(Self::Attack)
    }

    /// The acting actor.
    #[must_use]
    pub const fn source(&self) -> ActorId {
        match self {
            Self::Move(cmd) => cmd.source(),
            Self::Attack(cmd) => cmd.source(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> CommandState {
        match self {
            Self::Move(cmd) => cmd.state(),
            Self::Attack(cmd) => cmd.state(),
        }
    }

    /// True for attack commands.
    #[must_use]
    pub const fn is_attack(&self) -> bool {
        matches!(self, Self::Attack(_))
    }
}

impl Reversible for Command {
    fn execute(&mut self, actors: &mut Combatants) -> Result<(), CommandError> {
        match self {
            Self::Move(cmd) => cmd.execute(actors),
            Self::Attack(cmd) => cmd.execute(actors),
        }
    }

    fn undo(&mut self, actors: &mut Combatants) -> Result<(), CommandError> {
        match self {
            Self::Move(cmd) => cmd.undo(actors),
            Self::Attack(cmd) => cmd.undo(actors),
        }
    }

    fn describe(&self, actors: &Combatants, phase: Phase) -> String {
        match self {
            Self::Move(cmd) => cmd.describe(actors, phase),
            Self::Attack(cmd) => cmd.describe(actors, phase),
        }
    }
}

impl From<MoveCommand> for Command {
    fn from(cmd: MoveCommand) -> Self {
        Self::Move(cmd)
    }
}

impl From<AttackCommand> for Command {
    fn from(cmd: AttackCommand) -> Self {
        Self::Attack(cmd)
    }
}

// =============================================================================
// Tests
// =============================================================================
