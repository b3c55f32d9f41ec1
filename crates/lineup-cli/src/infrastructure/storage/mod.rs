//! Storage infrastructure: configuration and roster persistence.
//!
//! - `config` reads the TOML configuration file from the platform-appropriate
//!   directory and supplies defaults on first run.
//! - `roster_file` keeps the roster snapshot in a text file.
//! - `memory` keeps it in memory, for ephemeral runs and tests.
//!
//! Both roster adapters implement [`lineup_core::RosterPersistence`], so the
//! roster store never knows where its snapshots go.

pub mod config;
pub mod memory;
pub mod roster_file;
