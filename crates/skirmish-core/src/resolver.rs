//! Turn resolution: turns one actor's decisions into a command on the log.
//!
//! Per step, the [`TurnResolver`] is asked once for the Enemy and once for
//! the Player (see [`ActorId::TURN_ORDER`]). For each actor:
//! 1. If no attack has been issued this step, flip a coin
//! 2. Heads and a living opponent produce an [`AttackCommand`](crate::command::AttackCommand)
//! 3. Anything else draws a [`Direction`] and produces a move
//!
//! At most one attack is issued per step. The suppression flag is reset by
//! [`TurnResolver::begin_step`].
//!
//! # Example
//!
//! ```
//! use skirmish_core::actor::{ActorId, Combatants};
//! use skirmish_core::decision::{Direction, ScriptedDecisions};
//! use skirmish_core::log::CommandLog;
//! use skirmish_core::resolver::{ActionKind, TurnResolver};
//!
//! let actors = Combatants::new(3, 1);
//! let mut log = CommandLog::new();
//! let mut decisions = ScriptedDecisions::new([true, true], [Direction::Left]);
//! let mut resolver = TurnResolver::new(1);
//!
//! resolver.begin_step();
//! let enemy = resolver.resolve(ActorId::Enemy, &actors, &mut decisions, &mut log);
//! let player = resolver.resolve(ActorId::Player, &actors, &mut decisions, &mut log);
//!
//! assert_eq!(enemy, ActionKind::Attack);
//! assert_eq!(player, ActionKind::Move(Direction::Left));
//! assert_eq!(log.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::actor::{ActorId, Combatants};
use crate::command::{AttackCommand, Command};
use crate::decision::{DecisionSource, Direction};
use crate::log::CommandLog;

/// What an actor did in a step.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Issued an attack against the opponent.
    Attack,
    /// Moved one cell.
    Move(Direction),
}

impl ActionKind {
    /// True for [`ActionKind::Attack`].
    #[must_use]
    pub const fn is_attack(self) -> bool {
        matches!(self, Self::Attack)
    }
}

/// Decides and records one command per actor per step.
#[derive(Debug, Clone)]
pub struct TurnResolver {
    attack_damage: i32,
    attacked_this_step: bool,
}

impl TurnResolver {
    /// Creates a resolver whose attacks deal `attack_damage`.
    #[must_use]
    pub const fn new(attack_damage: i32) -> Self {
        Self {
            attack_damage,
            attacked_this_step: false,
        }
    }

    /// Clears the per-step attack suppression.
    pub fn begin_step(&mut self) {
        self.attacked_this_step = false;
    }

    /// True once an attack has been issued in the current step.
    #[must_use]
    pub const fn attacked_this_step(&self) -> bool {
        self.attacked_this_step
    }

    /// Decides `actor`'s action against its opponent and appends the command.
    ///
    /// The coin is only drawn while no attack has been issued this step; a
    /// direction is drawn whenever the result is a move. Health checks read
    /// `actors` as of the start of the step, before anything is drained.
    pub fn resolve(
        &mut self,
        actor: ActorId,
        actors: &Combatants,
        decisions: &mut dyn DecisionSource,
        log: &mut CommandLog,
    ) -> ActionKind {
        let opponent = actor.opponent();
        let wants_attack = !self.attacked_this_step && decisions.coin_flip();

        if wants_attack && !actors.get(opponent).is_defeated() {
            self.attacked_this_step = true;
            log.append(Command::Attack(AttackCommand::against(actor, self.attack_damage)));
            trace!(%actor, %opponent, "resolved attack");
            return ActionKind::Attack;
        }

        let direction = decisions.direction();
        log.append(Command::movement(actor, direction.delta()));
        trace!(%actor, ?direction, "resolved move");
        ActionKind::Move(direction)
    }
}
