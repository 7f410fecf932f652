use crate::error::{PackError, Result};
use glam::Vec2;

/// A weighted point entity positioned by the packer.
///
/// A particle keeps two positions: `pos`, the physics position mutated by
/// forces every round, and `drawn`, the position last flushed to the drawn
/// representation via [`Particle::reposition`]. Separating the two lets
/// the packer update physics every round while only repainting on redraw
/// rounds.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Current physics position.
    pub pos: Vec2,
    /// Position last flushed for drawing.
    pub drawn: Vec2,
    /// Drawn radius, set by [`Particle::render`]. Zero until rendered.
    pub radius: f32,
    home: Vec2,
    weight: f32,
}

impl Particle {
    /// Creates a particle resting at `home` with the given impact weight.
    ///
    /// Weights must be positive and finite; anything else would corrupt
    /// the packer's aggregate sizing and is rejected here, at the boundary.
    pub fn new(home: Vec2, weight: f32) -> Result<Self> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(PackError::NonPositiveWeight { weight });
        }

        Ok(Self {
            pos: home,
            drawn: home,
            radius: 0.0,
            home,
            weight,
        })
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn home(&self) -> Vec2 {
        self.home
    }

    /// Draws the particle at the given scale unit.
    ///
    /// Sets the drawn radius from the weight and snaps the drawn position
    /// to the current physics position.
    pub fn render(&mut self, unit: f32) {
        self.radius = self.weight * unit * 0.5;
        self.drawn = self.pos;
    }

    /// Pushes `self` and `other` apart if they are closer than
    /// `min_separation`.
    ///
    /// The displacement is symmetric: each participant moves half the
    /// overlap along the separating axis. Coincident particles separate
    /// along the x axis so the direction is always defined. Pairs already
    /// at or beyond `min_separation` are left untouched.
    pub fn displace_from(&mut self, other: &mut Particle, min_separation: f32) {
        let delta = other.pos - self.pos;
        let dist = delta.length();

        if dist >= min_separation {
            return;
        }

        let axis = if dist > f32::EPSILON {
            delta / dist
        } else {
            Vec2::X
        };

        let push = axis * (min_separation - dist) * 0.5;
        self.pos -= push;
        other.pos += push;
    }

    /// Moves partway toward `target`, scaled by `strength`.
    pub fn attract_to(&mut self, target: Vec2, strength: f32) {
        self.pos += (target - self.pos) * strength;
    }

    /// Returns to the idle resting slot and discards the rendered size.
    pub fn reset_position(&mut self) {
        self.pos = self.home;
        self.drawn = self.home;
        self.radius = 0.0;
    }

    /// Flushes the current physics position to the drawn representation.
    pub fn reposition(&mut self) {
        self.drawn = self.pos;
    }
}
