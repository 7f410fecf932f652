//! Per-round passes of the relaxation loop.
//!
//! One relaxation round runs, in order:
//! 1. [`sort_by_center_distance`] — re-sort the order array so particles
//!    closest to the center come first.
//! 2. [`repulsion_phase`] — pairwise pass pushing apart particles closer
//!    than the minimum separation.
//! 3. [`attraction_phase`] — pull every particle toward the center with
//!    an iteration-decaying strength.
//!
//! The phases operate on a stable particle arena plus a separately
//! re-sorted index array, so sorting never moves particle state.

use crate::{particle::Particle, types::ParticleId};
use glam::Vec2;

/// Sorts the order array by ascending distance from `center`.
///
/// The sort is stable, so particles at equal distance keep their prior
/// relative order. Squared distances give the same ordering as Euclidean
/// distances without the square root.
pub fn sort_by_center_distance(particles: &[Particle], order: &mut [ParticleId], center: Vec2) {
    order.sort_by(|&a, &b| {
        let da = particles[a].pos.distance_squared(center);
        let db = particles[b].pos.distance_squared(center);
        da.total_cmp(&db)
    });
}

/// Applies pairwise repulsion over every unordered pair in sorted order.
///
/// For each pair the earlier-sorted particle issues the displacement;
/// [`Particle::displace_from`] moves both sides, so each pair is visited
/// exactly once. This is the O(n²) step; no spatial partitioning is used,
/// which is acceptable for populations up to a few hundred.
pub fn repulsion_phase(particles: &mut [Particle], order: &[ParticleId], min_separation: f32) {
    for i in 0..order.len() {
        for j in (i + 1)..order.len() {
            displace_pair(particles, order[i], order[j], min_separation);
        }
    }
}

/// Pulls every particle toward `center` with the given strength.
pub fn attraction_phase(particles: &mut [Particle], center: Vec2, strength: f32) {
    for p in particles {
        p.attract_to(center, strength);
    }
}

/// Mutably splits out the two particles at `a` and `b` and applies the
/// repulsion contract, with `a` as the issuing side.
fn displace_pair(particles: &mut [Particle], a: ParticleId, b: ParticleId, min_separation: f32) {
    debug_assert_ne!(a, b);

    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let (head, tail) = particles.split_at_mut(hi);

    if a < b {
        head[lo].displace_from(&mut tail[0], min_separation);
    } else {
        tail[0].displace_from(&mut head[lo], min_separation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn particles_at(positions: &[Vec2]) -> Vec<Particle> {
        positions
            .iter()
            .map(|&p| Particle::new(p, 1.0).unwrap())
            .collect()
    }

    #[test]
    fn sort_orders_closest_first() {
        let particles = particles_at(&[
            Vec2::new(100.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(10.0, 0.0),
        ]);
        let mut order = vec![0, 1, 2];

        sort_by_center_distance(&particles, &mut order, Vec2::ZERO);

        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn sort_is_stable_for_equal_distances() {
        let particles = particles_at(&[
            Vec2::new(5.0, 0.0),
            Vec2::new(-5.0, 0.0),
            Vec2::new(0.0, 5.0),
        ]);
        let mut order = vec![2, 0, 1];

        sort_by_center_distance(&particles, &mut order, Vec2::ZERO);

        // All distances are equal; prior order survives.
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn repulsion_separates_a_crowded_pair() {
        let mut particles = particles_at(&[Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0)]);
        let order = vec![0, 1];

        repulsion_phase(&mut particles, &order, 12.0);

        assert!((particles[0].pos.distance(particles[1].pos) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn repulsion_does_not_touch_separated_pairs() {
        let before = [Vec2::new(0.0, 0.0), Vec2::new(30.0, 0.0), Vec2::new(0.0, 40.0)];
        let mut particles = particles_at(&before);
        let order = vec![0, 1, 2];

        repulsion_phase(&mut particles, &order, 12.0);

        for (p, &b) in particles.iter().zip(before.iter()) {
            assert_eq!(p.pos, b);
        }
    }

    #[test]
    fn repulsion_respects_order_indirection() {
        // Indices in the order array are arena indices, not positions in
        // the array itself; the pass must follow the indirection.
        let mut particles = particles_at(&[Vec2::new(2.0, 0.0), Vec2::new(0.0, 0.0)]);
        let order = vec![1, 0];

        repulsion_phase(&mut particles, &order, 12.0);

        assert!((particles[0].pos.distance(particles[1].pos) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn attraction_pulls_all_particles_toward_center() {
        let mut particles = particles_at(&[Vec2::new(10.0, 0.0), Vec2::new(0.0, -20.0)]);

        attraction_phase(&mut particles, Vec2::ZERO, 0.25);

        assert_eq!(particles[0].pos, Vec2::new(7.5, 0.0));
        assert_eq!(particles[1].pos, Vec2::new(0.0, -15.0));
    }
}
