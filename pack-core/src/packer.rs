//! The force-directed packer: owns the particle collection and runs the
//! iterative relaxation that settles particles into a circular cluster
//! around a center point.
//!
//! The relaxation loop is an explicit state machine: [`Packer::pack`]
//! computes the scale unit and runs the first round synchronously, then
//! each call to
//! [`Packer::step`] runs one further round until the iteration budget is
//! exhausted or the packer is no longer alive. Chaining of rounds is left
//! to the caller, either a frame loop or a [`crate::schedule::RoundScheduler`].

use crate::{
    config::{PackConfig, Resolution},
    error::{PackError, Result},
    particle::Particle,
    phases,
    types::ParticleId,
};
use glam::Vec2;
use log::debug;

/// In-flight relaxation state, present only while a layout pass is running.
#[derive(Clone, Copy, Debug)]
struct Relaxation {
    iteration: u32,
    budget: u32,
    unit: f32,
}

/// Result of a single relaxation round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Nothing to do: no relaxation in flight, or the packer was reset
    /// while this round was pending.
    Idle,
    /// A round ran and more rounds remain in the budget.
    Running,
    /// The final budgeted round ran; the layout is settled.
    Settled,
}

/// The owning collection behind the packed cluster.
///
/// Particles live in a stable arena; each round re-sorts a separate index
/// array by distance to the center instead of moving particle state.
#[derive(Debug)]
pub struct Packer {
    particles: Vec<Particle>,
    order: Vec<ParticleId>,
    total_weight: f32,
    center: Option<Vec2>,
    /// Read fresh every round; may be changed mid-flight.
    pub resolution: Resolution,
    alive: bool,
    cfg: PackConfig,
    relax: Option<Relaxation>,
}

impl Default for Packer {
    fn default() -> Self {
        Self::new()
    }
}

impl Packer {
    pub fn new() -> Self {
        Self::with_config(PackConfig::default())
    }

    pub fn with_config(cfg: PackConfig) -> Self {
        Self {
            particles: Vec::new(),
            order: Vec::new(),
            total_weight: 0.0,
            center: None,
            resolution: Resolution::High,
            alive: true,
            cfg,
            relax: None,
        }
    }

    /// Sets the attraction target to the middle of the given drawable area.
    ///
    /// Must be called before [`Packer::pack`]; call again when the
    /// viewport resizes.
    pub fn centerize(&mut self, width: f32, height: f32) {
        self.center = Some(Vec2::new(width / 2.0, height / 2.0));
    }

    /// Appends a particle and returns the new particle count.
    ///
    /// The running total weight is updated incrementally, so insertion is
    /// O(1). Ordering is overwritten by the first relaxation round's sort.
    pub fn insert(&mut self, particle: Particle) -> usize {
        self.total_weight += particle.weight();
        self.order.push(self.particles.len());
        self.particles.push(particle);
        self.particles.len()
    }

    /// Starts a full layout pass.
    ///
    /// Computes the scale unit from the viewport extents and the total
    /// weight, marks the packer alive, renders every particle at that
    /// unit, and runs the first relaxation round. Further rounds are run
    /// through [`Packer::step`].
    ///
    /// A `pack()` issued while a previous pass is still relaxing
    /// supersedes it: the relaxation state is rebuilt from scratch and
    /// the old chain's next round sees the fresh state.
    ///
    /// Fails fast with [`PackError::UninitializedCenter`] if
    /// [`Packer::centerize`] was never called, and with
    /// [`PackError::ZeroTotalWeight`] if there is nothing to lay out;
    /// both would otherwise produce degenerate geometry.
    pub fn pack(&mut self) -> Result<()> {
        let center = self.center.ok_or(PackError::UninitializedCenter)?;
        if self.total_weight <= 0.0 {
            return Err(PackError::ZeroTotalWeight);
        }

        let (width, height) = (center.x * 2.0, center.y * 2.0);
        let count = self.particles.len();
        let unit = width.min(height) / self.total_weight * self.cfg.size_delta(count);
        let budget = self.cfg.iteration_budget(count);

        self.alive = true;

        for p in &mut self.particles {
            p.render(unit);
        }

        debug!("pack: {count} particles, unit {unit:.3}, budget {budget}");

        self.relax = Some(Relaxation {
            iteration: 1,
            budget,
            unit,
        });
        self.step();

        Ok(())
    }

    /// Runs one relaxation round.
    ///
    /// Liveness is checked first: a round that runs after
    /// [`Packer::reset`] or [`Packer::clear`] performs no work and drops
    /// the pending relaxation, so a stale scheduled callback is a no-op.
    ///
    /// A live round sorts the order array closest-to-center first, applies
    /// pairwise repulsion, pulls every particle toward the center with
    /// strength `damping_factor / iteration`, and, on redraw rounds,
    /// flushes physics positions to the drawn representation. High
    /// resolution redraws every `ceil(count / redraw_threshold)`-th round;
    /// low resolution only on the final round of the budget.
    pub fn step(&mut self) -> RoundOutcome {
        if !self.alive {
            self.relax = None;
            return RoundOutcome::Idle;
        }
        let Some(mut relax) = self.relax else {
            return RoundOutcome::Idle;
        };
        let Some(center) = self.center else {
            // Unreachable through pack(), which requires a center.
            self.relax = None;
            return RoundOutcome::Idle;
        };

        let redraw = match self.resolution {
            Resolution::High => {
                relax.iteration % self.cfg.redraw_stride(self.particles.len()) == 0
            }
            Resolution::Low => relax.iteration == relax.budget,
        };

        phases::sort_by_center_distance(&self.particles, &mut self.order, center);
        phases::repulsion_phase(&mut self.particles, &self.order, self.cfg.min_separation);
        phases::attraction_phase(
            &mut self.particles,
            center,
            self.cfg.damping_factor / relax.iteration as f32,
        );

        if redraw {
            for p in &mut self.particles {
                p.reposition();
            }
        }

        if relax.iteration < relax.budget {
            relax.iteration += 1;
            self.relax = Some(relax);
            RoundOutcome::Running
        } else {
            self.relax = None;
            RoundOutcome::Settled
        }
    }

    /// Halts relaxation and sends every particle back to its resting slot.
    ///
    /// The collection and total weight are kept; a later [`Packer::pack`]
    /// restarts from scratch. Cancellation is cooperative: a pending round
    /// still runs its liveness check and then does nothing.
    pub fn reset(&mut self) {
        self.alive = false;

        for p in &mut self.particles {
            p.reset_position();
        }

        debug!("reset: {} particles returned home", self.particles.len());
    }

    /// Drops all particles and zeroes the total weight. A hard reset;
    /// only re-inserting data makes the packer useful again.
    pub fn clear(&mut self) {
        self.alive = false;
        self.total_weight = 0.0;
        self.particles.clear();
        self.order.clear();
        self.relax = None;

        debug!("clear: collection emptied");
    }

    /// True while a layout pass is alive and has rounds left to run.
    pub fn is_relaxing(&self) -> bool {
        self.alive && self.relax.is_some()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    pub fn center(&self) -> Option<Vec2> {
        self.center
    }

    pub fn config(&self) -> &PackConfig {
        &self.cfg
    }

    /// Scale unit of the in-flight layout pass, if one is running.
    pub fn unit(&self) -> Option<f32> {
        self.relax.map(|r| r.unit)
    }

    /// `(next_iteration, budget)` of the in-flight pass, if one is running.
    pub fn progress(&self) -> Option<(u32, u32)> {
        self.relax.map(|r| (r.iteration, r.budget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Resolution;
    use glam::Vec2;

    fn packer_with_weights(weights: &[f32]) -> Packer {
        let mut packer = Packer::new();
        for (i, &w) in weights.iter().enumerate() {
            // Spread homes out so scenarios are deterministic but not degenerate.
            let home = Vec2::new(20.0 * i as f32, 10.0 * i as f32);
            let count = packer.insert(Particle::new(home, w).unwrap());
            assert_eq!(count, i + 1);
        }
        packer
    }

    fn drive_to_settled(packer: &mut Packer) {
        let mut guard = 0;
        while packer.is_relaxing() {
            packer.step();
            guard += 1;
            assert!(guard < 10_000, "relaxation did not terminate");
        }
    }

    #[test]
    fn insert_keeps_total_weight_in_sync() {
        let packer = packer_with_weights(&[1.0, 2.5, 0.5]);
        assert_eq!(packer.len(), 3);
        assert!((packer.total_weight() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn centerize_places_center_at_midpoint() {
        let mut packer = Packer::new();
        packer.centerize(400.0, 300.0);
        assert_eq!(packer.center(), Some(Vec2::new(200.0, 150.0)));
    }

    #[test]
    fn pack_before_centerize_fails_fast() {
        let mut packer = packer_with_weights(&[1.0]);
        assert_eq!(packer.pack(), Err(PackError::UninitializedCenter));
    }

    #[test]
    fn pack_with_zero_total_weight_fails_fast() {
        let mut packer = Packer::new();
        packer.centerize(400.0, 400.0);
        assert_eq!(packer.pack(), Err(PackError::ZeroTotalWeight));
    }

    #[test]
    fn pack_computes_the_documented_scale_unit() {
        // Weights {1, 2, 1} in a 400x400 viewport:
        // unit = min(400, 400) / 4 * (1 + 2 * 0.057) = 100 * 1.114 = 111.4.
        let mut packer = packer_with_weights(&[1.0, 2.0, 1.0]);
        packer.centerize(400.0, 400.0);
        packer.pack().unwrap();

        let unit = packer.unit().unwrap();
        assert!((unit - 111.4).abs() < 1e-3);

        // Small sets get the 50-round floor.
        let (_, budget) = packer.progress().unwrap();
        assert_eq!(budget, 50);

        // Every particle is rendered at the computed unit.
        for p in packer.particles() {
            assert!((p.radius - p.weight() * unit * 0.5).abs() < 1e-3);
        }
    }

    #[test]
    fn pack_runs_the_first_round_synchronously() {
        let mut packer = packer_with_weights(&[1.0, 1.0, 1.0]);
        packer.centerize(400.0, 400.0);
        packer.pack().unwrap();

        // Round 1 already ran, so the next round is 2.
        assert_eq!(packer.progress(), Some((2, 50)));
        assert!(packer.is_relaxing());
    }

    #[test]
    fn relaxation_terminates_after_the_budget() {
        let mut packer = packer_with_weights(&[1.0, 2.0, 1.0]);
        packer.centerize(400.0, 400.0);
        packer.pack().unwrap();

        let mut rounds = 1; // round 1 ran inside pack()
        loop {
            match packer.step() {
                RoundOutcome::Running => rounds += 1,
                RoundOutcome::Settled => {
                    rounds += 1;
                    break;
                }
                RoundOutcome::Idle => panic!("went idle before settling"),
            }
        }

        assert_eq!(rounds, 50);
        assert!(!packer.is_relaxing());
        assert_eq!(packer.step(), RoundOutcome::Idle);
    }

    #[test]
    fn relaxation_pulls_particles_toward_the_center() {
        let mut packer = packer_with_weights(&[1.0, 1.0, 1.0, 1.0]);
        packer.centerize(400.0, 400.0);
        packer.pack().unwrap();
        drive_to_settled(&mut packer);

        // The damping schedule leaves roughly a third of the initial
        // center distance after 50 rounds; the point is clustering, not
        // convergence to the exact center.
        let center = packer.center().unwrap();
        let start = Vec2::new(60.0, 30.0).distance(center);
        for p in packer.particles() {
            assert!(
                p.pos.distance(center) < start,
                "particle at {:?} did not cluster around {:?}",
                p.pos,
                center
            );
        }

        // Repulsion keeps the cluster from collapsing to a point.
        let particles = packer.particles();
        for i in 0..particles.len() {
            for j in (i + 1)..particles.len() {
                assert!(particles[i].pos.distance(particles[j].pos) > 1.0);
            }
        }
    }

    #[test]
    fn high_resolution_redraws_on_the_first_round_for_small_sets() {
        let mut packer = packer_with_weights(&[1.0, 1.0, 1.0]);
        packer.centerize(400.0, 400.0);
        packer.resolution = Resolution::High;
        packer.pack().unwrap();

        // Stride is 1 for 3 particles, so round 1 flushed the new physics
        // positions into the drawn positions.
        for p in packer.particles() {
            assert_eq!(p.drawn, p.pos);
        }
    }

    #[test]
    fn low_resolution_defers_redraw_to_the_final_round() {
        let mut packer = packer_with_weights(&[1.0, 1.0, 1.0]);
        packer.centerize(400.0, 400.0);
        packer.resolution = Resolution::Low;
        packer.pack().unwrap();

        // Physics has moved but nothing was flushed since render().
        let moved: Vec<bool> = packer
            .particles()
            .iter()
            .map(|p| p.drawn != p.pos)
            .collect();
        assert!(moved.iter().any(|&m| m));

        // Still no flush while rounds remain.
        while packer.step() == RoundOutcome::Running {
            if packer.progress().is_some_and(|(i, b)| i < b) {
                assert!(packer.particles().iter().any(|p| p.drawn != p.pos));
            }
        }

        // The final round flushed everything.
        for p in packer.particles() {
            assert_eq!(p.drawn, p.pos);
        }
    }

    #[test]
    fn reset_makes_a_pending_round_a_no_op() {
        let mut packer = packer_with_weights(&[1.0, 2.0]);
        packer.centerize(400.0, 400.0);
        packer.pack().unwrap();
        assert!(packer.is_relaxing());

        packer.reset();
        assert!(!packer.is_alive());
        assert!(!packer.is_relaxing());

        let homes: Vec<Vec2> = packer.particles().iter().map(|p| p.pos).collect();

        // The round that was "scheduled" before reset skips all work.
        assert_eq!(packer.step(), RoundOutcome::Idle);
        for (p, &home) in packer.particles().iter().zip(homes.iter()) {
            assert_eq!(p.pos, home);
            assert_eq!(p.pos, p.home());
        }

        // Data survives; a new pack is valid.
        assert_eq!(packer.len(), 2);
        assert!((packer.total_weight() - 3.0).abs() < 1e-6);
        packer.pack().unwrap();
        assert!(packer.is_relaxing());
    }

    #[test]
    fn clear_discards_everything() {
        let mut packer = packer_with_weights(&[1.0, 2.0, 3.0]);
        packer.centerize(400.0, 400.0);
        packer.pack().unwrap();

        packer.clear();

        assert!(packer.is_empty());
        assert_eq!(packer.total_weight(), 0.0);
        assert!(!packer.is_relaxing());

        // Behaves like a fresh instance afterwards.
        packer.insert(Particle::new(Vec2::new(10.0, 10.0), 2.0).unwrap());
        packer.pack().unwrap();
        assert_eq!(packer.len(), 1);
        assert!((packer.total_weight() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn repack_mid_flight_supersedes_and_keeps_data_intact() {
        let mut packer = packer_with_weights(&[1.0, 2.0, 1.0]);
        packer.centerize(400.0, 400.0);
        packer.pack().unwrap();

        // Burn a few rounds, then interrupt with a second pack.
        packer.step();
        packer.step();
        packer.pack().unwrap();

        assert_eq!(packer.len(), 3);
        assert!((packer.total_weight() - 4.0).abs() < 1e-6);
        // The chain restarted: round 1 ran inside pack, next is 2.
        assert_eq!(packer.progress(), Some((2, 50)));
    }

    #[test]
    fn resolution_change_mid_flight_takes_effect_next_round() {
        let mut packer = packer_with_weights(&[1.0, 1.0, 1.0]);
        packer.centerize(400.0, 400.0);
        packer.resolution = Resolution::Low;
        packer.pack().unwrap();

        // Switch to high resolution mid-flight: the very next round has
        // stride 1 and flushes drawn positions.
        packer.resolution = Resolution::High;
        packer.step();

        for p in packer.particles() {
            assert_eq!(p.drawn, p.pos);
        }
    }
}
