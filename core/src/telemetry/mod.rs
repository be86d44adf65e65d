//! telemetry/mod.rs
//! Per-call timings and byte counts.
//!
//! Notes:
//! - Nothing here outlives a call; the adapter itself stays stateless.
//! - Snapshots are plain serde structs so a host can ship them as JSON.

pub mod snapshot;
pub mod timers;

pub use snapshot::*;
pub use timers::*;
