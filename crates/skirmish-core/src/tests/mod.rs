//! Test module for round-trip, determinism and integration tests.
//!
//! - `round_trip.rs`: Forward-then-backward replays restore the initial state
//! - `determinism.rs`: Same seed, same run
//! - `integration.rs`: Full runs checked against the loop's rules
//! - `helpers.rs`: Setup utilities shared by the suites above

mod helpers;
