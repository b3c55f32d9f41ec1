//! Infrastructure layer for the lineup planner.
//!
//! Contains the outward-facing adapters: file-system storage for the config
//! and the roster snapshot, and terminal report rendering.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `lineup_core`, but MUST NOT be imported by the `application` layer or by
//! the core.

pub mod report;
pub mod storage;
