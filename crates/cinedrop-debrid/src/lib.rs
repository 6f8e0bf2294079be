//! Debrid resolution: magnet submission, readiness polling, and link extraction.
//!
//! Layout: `job.rs` (per-submission state machine), `engine.rs` (submit and poll loop),
//! `realdebrid.rs` (Real-Debrid REST client).

pub mod engine;
pub mod job;
pub mod realdebrid;

pub use engine::{AwaitOutcome, ResolutionEngine};
pub use job::{JobState, NO_LINKS_CAUSE, ResolutionJob};
pub use realdebrid::{RealDebridClient, phase_for_status};
