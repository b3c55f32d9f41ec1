//! # lineup-core
//!
//! Shared library for the lineup planner: the player model, the roster store,
//! roster validation, the line scheduler, and the text codec used to persist
//! rosters.
//!
//! It has no dependencies on files, terminals, or any particular storage.
//!
//! # Overview (for beginners)
//!
//! A game is split into 3 periods of 3 lines each.  Every line fields five
//! skaters ("fielders") and one goalie.  Given the active players on a roster,
//! the scheduler decides who plays on which line so that:
//!
//! - each line's combined skill is as even as possible,
//! - every fielder plays a similar number of lines, and
//! - goalie duty is shared by whole periods.
//!
//! The crate is split into two modules:
//!
//! - **`domain`** – players, the roster store, validation and scheduling.
//! - **`codec`** – the delimited text format a persistence adapter stores.

pub mod codec;
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `lineup_core::Roster` instead of `lineup_core::domain::roster::Roster`.
pub use codec::{decode_player, decode_roster, encode_player, encode_roster, CodecError};
pub use domain::lineup::{
    build_lineup, try_build_lineup, LineAssignment, LineupError, OccupancyBounds, PlayerRow,
    Schedule,
};
pub use domain::player::{Player, PlayerDraft, PlayerId, Position, Skill};
pub use domain::roster::{
    EventKind, ListenerContext, Mutation, PersistError, Roster, RosterError, RosterEvent,
    RosterPersistence, MAX_ROSTER_SIZE,
};
pub use domain::validate::{validate, validation_messages, Violation};
