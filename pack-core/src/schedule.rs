//! Cooperative chaining of relaxation rounds.
//!
//! The packer itself never schedules anything: each round is a discrete
//! call to [`crate::packer::Packer::step`], and how rounds are chained is
//! an injected capability. An interactive frontend typically plays the
//! scheduler role itself by calling `step` from its frame loop; headless
//! callers and tests use [`drive`] with an [`ImmediateScheduler`].

use crate::{config::Resolution, packer::Packer};

/// A capability that enqueues the next relaxation round.
///
/// Implementations must invoke `round` exactly once, after the current
/// synchronous work has returned control. The resolution mode is passed
/// so a scheduler can pick a per-frame or throttled cadence.
pub trait RoundScheduler {
    fn schedule(&mut self, mode: Resolution, round: &mut dyn FnMut());
}

/// Runs each round inline, with no yielding between rounds.
#[derive(Debug, Default)]
pub struct ImmediateScheduler;

impl RoundScheduler for ImmediateScheduler {
    fn schedule(&mut self, _mode: Resolution, round: &mut dyn FnMut()) {
        round();
    }
}

/// Chains relaxation rounds through `scheduler` until the packer settles
/// or is reset.
///
/// The resolution mode is re-read before every round, so mid-flight
/// changes affect the cadence of the remaining rounds.
pub fn drive(packer: &mut Packer, scheduler: &mut dyn RoundScheduler) {
    while packer.is_relaxing() {
        let mode = packer.resolution;
        scheduler.schedule(mode, &mut || {
            packer.step();
        });
    }
}
