use glam::Vec2;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// A single simulated point mass.
///
/// All bodies carry the same implicit mass, so only position and velocity
/// are stored. `vel` is a per-step displacement: [`MassPoint::integrate`]
/// moves the body by exactly `-vel`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MassPoint {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl MassPoint {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Draws a body from `normal`.
    ///
    /// Both position components are raw samples. Velocity components are
    /// samples re-centered on zero and divided by `velocity_ratio`, so a
    /// larger ratio gives a calmer start.
    pub fn random(normal: &Normal<f32>, velocity_ratio: f32, rng: &mut impl Rng) -> Self {
        let pos = Vec2::new(normal.sample(rng), normal.sample(rng));
        let mean = normal.mean();
        let vel = Vec2::new(
            (normal.sample(rng) - mean) / velocity_ratio,
            (normal.sample(rng) - mean) / velocity_ratio,
        );
        Self { pos, vel }
    }

    /// Euclidean distance between the two positions.
    #[inline]
    pub fn distance(&self, other: &MassPoint) -> f32 {
        self.pos.distance(other.pos)
    }

    /// Magnitude of the attraction between `self` and `other`.
    ///
    /// Returns `0.0` when the squared distance is zero. That covers the
    /// self-pair, identical coordinates, and distinct points too close
    /// for `f32` to separate.
    #[inline]
    pub fn force(&self, other: &MassPoint, big_g: f32) -> f32 {
        let d2 = self.pos.distance_squared(other.pos);
        if d2 == 0.0 {
            return 0.0;
        }
        big_g / d2
    }

    /// Explicit Euler position update.
    ///
    /// Velocities point away from attractors (see
    /// [`crate::population::Population::apply_interaction`]), hence the
    /// subtraction.
    #[inline]
    pub fn integrate(&mut self) {
        self.pos -= self.vel;
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}
