//! Domain entities for the lineup planner.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: no files, no terminals, no clocks.
//!
//! # What lives here (for beginners)
//!
//! - [`player`]: the [`Player`](player::Player) record and the normalisation
//!   rules every constructor applies (skill clamping, position parsing).
//! - [`roster`]: the store that owns all players, tells listeners about
//!   changes and hands snapshots to a persistence adapter.
//! - [`validate`]: the roster rules a game roster must satisfy.
//! - [`lineup`]: the scheduler that spreads players across nine lines.
//! - [`stats`]: small numeric helpers used to report schedule balance.
//! - [`demo`]: a ready-made team for trying things out.
//!
//! Code in outer layers (the CLI, file storage) depends on the domain, but
//! the domain never depends on them.

pub mod demo;
pub mod lineup;
pub mod player;
pub mod roster;
pub mod stats;
pub mod validate;
