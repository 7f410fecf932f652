//! Force-packed cluster layout engine for weighted particles.
//!
//! Main components:
//! - [`particle`] — weighted particles and their displacement contract.
//! - [`packer`] — the owning collection and its relaxation loop.
//! - [`phases`] — per-round sort / repulsion / attraction passes.
//! - [`schedule`] — cooperative chaining of relaxation rounds.
//! - [`timeline`] — row/column assignment for the chronological chart.
//! - [`config`] — tuning constants and the resolution mode.
//! - [`error`] — error types.
//! - [`types`] — shared type aliases.

pub mod config;
pub mod error;
pub mod packer;
pub mod particle;
pub mod phases;
pub mod schedule;
pub mod timeline;
pub mod types;
