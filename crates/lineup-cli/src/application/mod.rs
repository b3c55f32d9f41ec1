//! Application layer use cases for the lineup planner.
//!
//! Use cases orchestrate the roster store from `lineup_core` to fulfil one
//! user goal each.  They contain no file system access and no printing; the
//! infrastructure layer and `main.rs` supply both.
//!
//! # Sub-modules
//!
//! - **`manage_roster`** – Adds, edits, removes and (de)activates players,
//!   reporting unknown ids instead of silently ignoring them.
//!
//! - **`plan_lineup`** – Builds a schedule from the active players and
//!   computes the balance figures printed under it.

pub mod manage_roster;
pub mod plan_lineup;
