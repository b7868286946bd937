//! Actor module: the two positioned, damageable participants of a skirmish.
//!
//! This module provides:
//! - [`ActorId`]: Which side an actor fights for (Player or Enemy)
//! - [`Actor`]: Position and health, with movement and melee primitives
//! - [`Combatants`]: Owner of both actors, with split borrows for attacks
//! - [`ActorState`] / [`CombatantsSnapshot`]: Serializable value copies
//!
//! # Invariants
//!
//! - Health may go negative; any value `<= 0` means "defeated"
//! - Positions are unbounded integers (no board edges)
//! - Actors are only mutated through command execute/undo during a run
//!
//! # Example
//!
//! ```
//! use skirmish_core::actor::{ActorId, Combatants};
//! use glam::IVec2;
//!
//! let mut actors = Combatants::new(3, 1);
//! actors.get_mut(ActorId::Enemy).move_by(IVec2::new(1, 1));
//!
//! let (player, enemy) = actors.pair_mut(ActorId::Player, ActorId::Enemy).unwrap();
//! assert!(player.attack(enemy, 1));
//! assert_eq!(actors.get(ActorId::Enemy).hp(), 0);
//! assert!(actors.get(ActorId::Enemy).is_defeated());
//! ```

use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum Chebyshev distance at which a melee attack lands.
pub const MELEE_RANGE: i32 = 1;

// =============================================================================
// ActorId
// =============================================================================

/// Identity tag of an actor.
///
/// A skirmish has exactly one actor per side, so the tag doubles as the
/// actor's identifier inside [`Combatants`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorId {
    /// The controlled side; starts with more health.
    Player,
    /// The opposing side.
    Enemy,
}

impl ActorId {
    /// Both sides in resolution order (Enemy acts first each step).
    pub const TURN_ORDER: [ActorId; 2] = [ActorId::Enemy, ActorId::Player];

    /// Returns the other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Player => "Player",
            Self::Enemy => "Enemy",
        })
    }
}

// =============================================================================
// Actor
// =============================================================================

/// A positioned entity with health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: ActorId,
    position: IVec2,
    hp: i32,
}

impl Actor {
    /// Creates an actor at the origin with the given health.
    #[must_use]
    pub const fn new(id: ActorId, hp: i32) -> Self {
        Self {
            id,
            position: IVec2::ZERO,
            hp,
        }
    }

    /// Returns the actor's identity tag.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Returns the current grid position.
    #[must_use]
    pub const fn position(&self) -> IVec2 {
        self.position
    }

    /// Returns the current health.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// True once health has dropped to zero or below.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Translates the actor by `delta`. Never fails.
    pub fn move_by(&mut self, delta: IVec2) {
        self.position += delta;
    }

    /// Chebyshev distance to `other`, i.e. `max(|dx|, |dy|)`.
    #[must_use]
    pub fn distance_to(&self, other: &Actor) -> i32 {
        (other.position - self.position).abs().max_element()
    }

    /// True when `other` is within [`MELEE_RANGE`] (including the same cell).
    #[must_use]
    pub fn in_range_of(&self, other: &Actor) -> bool {
        self.distance_to(other) <= MELEE_RANGE
    }

    /// Melee attack against `target`.
    ///
    /// Returns `false` without touching `target` when it is out of range.
    /// Otherwise subtracts `amount` from the target's health and returns
    /// `true`. A negative `amount` heals under the same range rule.
    pub fn attack(&self, target: &mut Actor, amount: i32) -> bool {
        if !self.in_range_of(target) {
            return false;
        }
        target.hp -= amount;
        true
    }

    /// Adds `amount` back to health without any range check.
    ///
    /// Used to invert an attack that is known to have landed.
    pub fn restore_hp(&mut self, amount: i32) {
        self.hp += amount;
    }

    /// Returns a value copy of this actor's state.
    #[must_use]
    pub const fn state(&self) -> ActorState {
        ActorState {
            id: self.id,
            position: self.position,
            hp: self.hp,
        }
    }
}

// =============================================================================
// Snapshots
// =============================================================================

/// Value copy of one actor, used for reports and round-trip checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorState {
    /// Which side this state belongs to.
    pub id: ActorId,
    /// Grid position.
    pub position: IVec2,
    /// Health.
    pub hp: i32,
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: HP={}, posX={}, posY={}",
            self.id, self.hp, self.position.x, self.position.y
        )
    }
}

/// Value copy of both actors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantsSnapshot {
    /// Player state.
    pub player: ActorState,
    /// Enemy state.
    pub enemy: ActorState,
}

impl CombatantsSnapshot {
    /// Returns the state recorded for `id`.
    #[must_use]
    pub const fn get(&self, id: ActorId) -> &ActorState {
        match id {
            ActorId::Player => &self.player,
            ActorId::Enemy => &self.enemy,
        }
    }

    /// Returns the first actor whose state differs from `other`, if any.
    #[must_use]
    pub fn first_difference(&self, other: &Self) -> Option<ActorId> {
        [ActorId::Player, ActorId::Enemy]
            .into_iter()
            .find(|&id| self.get(id) != other.get(id))
    }
}

// =============================================================================
// Combatants
// =============================================================================

/// Owner of the two actors of a skirmish.
///
/// Commands refer to actors by [`ActorId`] and borrow them from here only
/// while executing or undoing, so the log never holds live references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatants {
    player: Actor,
    enemy: Actor,
}

impl Combatants {
    /// Creates both actors at the origin with the given starting health.
    #[must_use]
    pub const fn new(player_hp: i32, enemy_hp: i32) -> Self {
        Self {
            player: Actor::new(ActorId::Player, player_hp),
            enemy: Actor::new(ActorId::Enemy, enemy_hp),
        }
    }

    /// Returns the actor for `id`.
    #[must_use]
    pub const fn get(&self, id: ActorId) -> &Actor {
        match id {
            ActorId::Player => &self.player,
            ActorId::Enemy => &self.enemy,
        }
    }

    /// Returns the actor for `id` mutably.
    pub fn get_mut(&mut self, id: ActorId) -> &mut Actor {
        match id {
            ActorId::Player => &mut self.player,
            ActorId::Enemy => &mut self.enemy,
        }
    }

    /// Borrows `source` and `target` at the same time.
    ///
    /// Returns `None` when both ids name the same actor.
    pub fn pair_mut(
        &mut self,
        source: ActorId,
        target: ActorId,
    ) -> Option<(&mut Actor, &mut Actor)> {
        match (source, target) {
            (ActorId::Player, ActorId::Enemy) => Some((&mut self.player, &mut self.enemy)),
            (ActorId::Enemy, ActorId::Player) => Some((&mut self.enemy, &mut self.player)),
            _ => None,
        }
    }

    /// True when either side is defeated.
    #[must_use]
    pub const fn any_defeated(&self) -> bool {
        self.player.is_defeated() || self.enemy.is_defeated()
    }

    /// Returns a value copy of both actors.
    #[must_use]
    pub const fn snapshot(&self) -> CombatantsSnapshot {
        CombatantsSnapshot {
            player: self.player.state(),
            enemy: self.enemy.state(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod actor_id_tests {
        use super::*;

        #[test]
        fn opponent_swaps_sides() {
            assert_eq!(ActorId::Player.opponent(), ActorId::Enemy);
            assert_eq!(ActorId::Enemy.opponent(), ActorId::Player);
        }

        #[test]
        fn enemy_resolves_first() {
            assert_eq!(ActorId::TURN_ORDER, [ActorId::Enemy, ActorId::Player]);
        }

        #[test]
        fn display_names() {
            assert_eq!(ActorId::Player.to_string(), "Player");
            assert_eq!(ActorId::Enemy.to_string(), "Enemy");
        }
    }

    mod movement_tests {
        use super::*;

        #[test]
        fn move_by_accumulates() {
            let mut actor = Actor::new(ActorId::Player, 3);
            actor.move_by(IVec2::new(1, 0));
            actor.move_by(IVec2::new(0, -1));
            actor.move_by(IVec2::new(-4, 0));
            assert_eq!(actor.position(), IVec2::new(-3, -1));
        }

        #[test]
        fn chebyshev_distance() {
            let a = Actor::new(ActorId::Player, 3);
            let mut b = Actor::new(ActorId::Enemy, 1);
            assert_eq!(a.distance_to(&b), 0);

            b.move_by(IVec2::new(1, -1));
            assert_eq!(a.distance_to(&b), 1);

            b.move_by(IVec2::new(0, -3));
            assert_eq!(a.distance_to(&b), 4);
            assert_eq!(b.distance_to(&a), 4);
        }
    }

    mod attack_tests {
        use super::*;

        #[test]
        fn attack_in_range_applies_damage() {
            let a = Actor::new(ActorId::Player, 3);
            let mut b = Actor::new(ActorId::Enemy, 5);
            b.move_by(IVec2::new(1, 1));

            assert!(a.attack(&mut b, 2));
            assert_eq!(b.hp(), 3);
        }

        #[test]
        fn attack_out_of_range_changes_nothing() {
            let a = Actor::new(ActorId::Player, 3);
            let mut b = Actor::new(ActorId::Enemy, 5);
            b.move_by(IVec2::new(2, 0));
            let before = b.clone();

            assert!(!a.attack(&mut b, 2));
            assert_eq!(b, before);
        }

        #[test]
        fn negative_attack_heals_in_range() {
            let a = Actor::new(ActorId::Player, 3);
            let mut b = Actor::new(ActorId::Enemy, 1);
            assert!(a.attack(&mut b, 1));
            assert!(a.attack(&mut b, -1));
            assert_eq!(b.hp(), 1);
        }

        #[test]
        fn health_may_go_negative() {
            let a = Actor::new(ActorId::Player, 3);
            let mut b = Actor::new(ActorId::Enemy, 1);
            assert!(a.attack(&mut b, 4));
            assert_eq!(b.hp(), -3);
            assert!(b.is_defeated());
        }
    }

    mod combatants_tests {
        use super::*;

        #[test]
        fn new_places_both_at_origin() {
            let actors = Combatants::new(3, 1);
            assert_eq!(actors.get(ActorId::Player).position(), IVec2::ZERO);
            assert_eq!(actors.get(ActorId::Enemy).position(), IVec2::ZERO);
            assert_eq!(actors.get(ActorId::Player).hp(), 3);
            assert_eq!(actors.get(ActorId::Enemy).hp(), 1);
        }

        #[test]
        fn pair_mut_rejects_same_actor() {
            let mut actors = Combatants::new(3, 1);
            assert!(actors.pair_mut(ActorId::Player, ActorId::Player).is_none());
            assert!(actors.pair_mut(ActorId::Enemy, ActorId::Enemy).is_none());
        }

        #[test]
        fn pair_mut_orders_source_first() {
            let mut actors = Combatants::new(3, 1);
            let (source, target) = actors.pair_mut(ActorId::Enemy, ActorId::Player).unwrap();
            assert_eq!(source.id(), ActorId::Enemy);
            assert_eq!(target.id(), ActorId::Player);
        }

        #[test]
        fn snapshot_difference_names_actor() {
            let mut actors = Combatants::new(3, 1);
            let before = actors.snapshot();
            assert_eq!(before.first_difference(&actors.snapshot()), None);

            actors.get_mut(ActorId::Enemy).move_by(IVec2::new(0, 1));
            assert_eq!(
                before.first_difference(&actors.snapshot()),
                Some(ActorId::Enemy)
            );
        }

        #[test]
        fn snapshot_is_serializable() {
            let actors = Combatants::new(3, 1);
            let json = serde_json::to_string(&actors.snapshot()).unwrap();
            let back: CombatantsSnapshot = serde_json::from_str(&json).unwrap();
            assert_eq!(back, actors.snapshot());
        }

        #[test]
        fn state_display_matches_report_format() {
            let actors = Combatants::new(3, 1);
            assert_eq!(
                actors.get(ActorId::Player).state().to_string(),
                "Player: HP=3, posX=0, posY=0"
            );
        }
    }
}
