//! Append-only command log with forward draining and a backward undo pass.
//!
//! Appending and applying are separate operations:
//! 1. [`CommandLog::append`] records a decision (no state change)
//! 2. [`CommandLog::drain_from`] executes everything appended since a cursor
//! 3. [`CommandLog::undo_all`] reverts every entry, last appended first
//!
//! # Invariants
//!
//! - Insertion order is chronological order of decisions
//! - Draining executes in insertion order and never re-executes an entry
//! - The undo pass visits every entry in exactly the reverse order
//!
//! # Example
//!
//! ```
//! use skirmish_core::actor::{ActorId, Combatants};
//! use skirmish_core::command::Command;
//! use skirmish_core::display::MemorySink;
//! use skirmish_core::log::CommandLog;
//! use glam::IVec2;
//!
//! let mut actors = Combatants::new(3, 1);
//! let mut log = CommandLog::new();
//! let mut sink = MemorySink::new();
//!
//! log.append(Command::movement(ActorId::Enemy, IVec2::new(0, 1)));
//! log.append(Command::attack(ActorId::Player, ActorId::Enemy, 1).unwrap());
//! let cursor = log.drain_from(0, &mut actors, &mut sink).unwrap();
//! assert_eq!(cursor, 2);
//! assert_eq!(actors.get(ActorId::Enemy).hp(), 0);
//!
//! log.undo_all(&mut actors, &mut sink).unwrap();
//! assert_eq!(actors, Combatants::new(3, 1));
//! assert_eq!(sink.lines().len(), 4);
//! ```

use tracing::debug;

use crate::actor::Combatants;
use crate::command::{Command, Reversible};
use crate::display::{DisplaySink, Phase};
use crate::error::LogError;

/// Ordered record of every command issued during a run.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    entries: Vec<Command>,
}

impl CommandLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `command` and returns its index. Does not execute it.
    pub fn append(&mut self, command: Command) -> usize {
        self.entries.push(command);
        self.entries.len() - 1
    }

    /// Executes every entry from `index` to the end, in order, describing
    /// each one to `sink`.
    ///
    /// Returns the new end index, to be passed as `index` on the next call.
    ///
    /// # Errors
    ///
    /// - [`LogError::CursorOutOfRange`] if `index > len`
    /// - [`LogError::Command`] if an entry was already executed
    pub fn drain_from(
        &mut self,
        index: usize,
        actors: &mut Combatants,
        sink: &mut dyn DisplaySink,
    ) -> Result<usize, LogError> {
        let len = self.entries.len();
        if index > len {
            return Err(LogError::CursorOutOfRange { index, len });
        }

        for (offset, command) in self.entries[index..].iter_mut().enumerate() {
            command
                .execute(actors)
                .map_err(|source| LogError::Command {
                    index: index + offset,
                    source,
                })?;
            sink.line(&command.describe(actors, Phase::Forward));
        }

        debug!(from = index, to = len, "log drained");
        Ok(len)
    }

    /// Undoes every entry, last appended first, describing each one to `sink`.
    ///
    /// Entries that were never drained are skipped without mutation and
    /// without a line.
    ///
    /// # Errors
    ///
    /// [`LogError::Command`] if an entry was already undone.
    pub fn undo_all(
        &mut self,
        actors: &mut Combatants,
        sink: &mut dyn DisplaySink,
    ) -> Result<(), LogError> {
        for (index, command) in self.entries.iter_mut().enumerate().rev() {
            let before = command.state();
            command
                .undo(actors)
                .map_err(|source| LogError::Command { index, source })?;
            if command.state() != before {
                sink.line(&command.describe(actors, Phase::Reverse));
            }
        }

        debug!(entries = self.entries.len(), "log unwound");
        Ok(())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Command> {
        self.entries.get(index)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a CommandLog {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
