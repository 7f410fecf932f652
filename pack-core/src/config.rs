/// Rendering quality mode.
///
/// Controls how often intermediate positions are flushed to the drawn
/// representation during relaxation. The packer reads this fresh every
/// round, so it can be changed mid-flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    High,
    Low,
}

/// Tuning constants for the force-directed packer.
#[derive(Clone, Copy, Debug)]
pub struct PackConfig {
    /// Pairs closer than this are pushed apart during repulsion.
    pub min_separation: f32,
    /// Base strength of the center pull; decays as `damping_factor / iteration`.
    pub damping_factor: f32,
    /// Floor on the relaxation round budget.
    pub min_refinement: u32,
    /// Extra rounds granted per particle.
    pub refinement_delta: u32,
    /// Population size per high-resolution redraw stride step.
    pub redraw_threshold: u32,
    /// Per-particle growth of the sizing correction.
    pub sizing_delta: f32,
    /// Sizing correction applied when there is a single particle.
    pub max_delta: f32,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            min_separation: 12.0,
            damping_factor: 0.25,
            min_refinement: 50,
            refinement_delta: 4,
            redraw_threshold: 35,
            sizing_delta: 0.057,
            max_delta: 0.7,
        }
    }
}

impl PackConfig {
    /// Visual density correction for the scale unit.
    ///
    /// A single particle gets a fixed `max_delta` so it does not fill the
    /// viewport; larger crowds grow slightly super-linearly so they do not
    /// over-shrink.
    pub fn size_delta(&self, count: usize) -> f32 {
        if count == 1 {
            self.max_delta
        } else {
            1.0 + (count as f32 - 1.0) * self.sizing_delta
        }
    }

    /// Total relaxation rounds for a population of `count` particles.
    ///
    /// Scales with the population, with a floor so small sets still settle.
    pub fn iteration_budget(&self, count: usize) -> u32 {
        self.min_refinement.max(count as u32 * self.refinement_delta)
    }

    /// High-resolution redraw stride: a redraw happens every
    /// `ceil(count / redraw_threshold)`-th round.
    pub fn redraw_stride(&self, count: usize) -> u32 {
        (count as u32).div_ceil(self.redraw_threshold).max(1)
    }
}
