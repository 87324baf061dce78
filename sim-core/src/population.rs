use crate::{body::MassPoint, config::Config, types::BodyId};
use rand::Rng;
use rand_distr::{Normal, NormalError};

/// Which branch a single pairwise interaction took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// Same position (including the self-pair); nothing changed.
    Coincident,
    /// Closer than `Config::close_range`; both bodies now share their
    /// averaged velocity.
    Merged,
    /// Far range; only the first body's velocity was nudged.
    Attracted,
}

/// Fixed-size arena of bodies mutated in place once per step.
///
/// Bodies are addressed by [`BodyId`] so that an interaction can update
/// two slots through one mutable borrow of the population. The body
/// count is set at construction and never changes afterwards.
#[derive(Clone, Debug, Default)]
pub struct Population {
    bodies: Vec<MassPoint>,
}

impl Population {
    pub fn from_states(bodies: Vec<MassPoint>) -> Self {
        Self { bodies }
    }

    /// Builds `count` bodies from a zero-mean normal distribution.
    ///
    /// ### Parameters
    /// - `count` - Number of bodies; fixed for the lifetime of the run.
    /// - `deviation` - Standard deviation of the sampling distribution.
    /// - `velocity_ratio` - Divisor applied to velocity samples.
    /// - `rng` - Source of randomness.
    ///
    /// ### Errors
    /// Returns [`NormalError`] if `deviation` is negative or NaN.
    pub fn random(
        count: usize,
        deviation: f32,
        velocity_ratio: f32,
        rng: &mut impl Rng,
    ) -> Result<Self, NormalError> {
        let normal = Normal::new(0.0, deviation)?;
        let bodies = (0..count)
            .map(|_| MassPoint::random(&normal, velocity_ratio, rng))
            .collect();

        log::debug!("spawned {count} bodies (deviation {deviation}, velocity ratio {velocity_ratio})");
        Ok(Self { bodies })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&MassPoint> {
        self.bodies.get(id)
    }

    pub fn bodies(&self) -> &[MassPoint] {
        &self.bodies
    }

    /// Mutable view of the bodies; states can change, the count cannot.
    pub fn bodies_mut(&mut self) -> &mut [MassPoint] {
        &mut self.bodies
    }

    /// Applies the influence of body `j` on body `i`.
    ///
    /// 1. At distance zero nothing happens.
    /// 2. Below `cfg.close_range` both bodies take the componentwise mean
    ///    of their current velocities. This is the only branch that
    ///    writes to `j`.
    /// 3. Otherwise `i`'s velocity gains `force * (pos_i - pos_j) / d`.
    ///
    /// ### Panics
    /// Panics if `i` or `j` is out of bounds.
    pub fn apply_interaction(&mut self, i: BodyId, j: BodyId, cfg: &Config) -> Interaction {
        let a = self.bodies[i];
        let b = self.bodies[j];

        let dist = a.distance(&b);
        if dist == 0.0 {
            return Interaction::Coincident;
        }

        if dist < cfg.close_range {
            let avg = (a.vel + b.vel) / 2.0;
            self.bodies[i].vel = avg;
            self.bodies[j].vel = avg;
            return Interaction::Merged;
        }

        let force = a.force(&b, cfg.big_g);
        self.bodies[i].vel += force * ((a.pos - b.pos) / dist);
        Interaction::Attracted
    }

    /// Moves body `id` by its current velocity.
    #[inline]
    pub fn integrate(&mut self, id: BodyId) {
        self.bodies[id].integrate();
    }

    /// `true` if no position or velocity component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.bodies.iter().all(MassPoint::is_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;
    use rand::{SeedableRng, rngs::StdRng};

    fn pair(a: (Vec2, Vec2), b: (Vec2, Vec2)) -> Population {
        Population::from_states(vec![MassPoint::new(a.0, a.1), MassPoint::new(b.0, b.1)])
    }

    #[test]
    fn coincident_bodies_are_left_untouched() {
        let mut pop = pair(
            (Vec2::new(3.0, 3.0), Vec2::new(1.0, 0.0)),
            (Vec2::new(3.0, 3.0), Vec2::new(-4.0, 2.0)),
        );
        let before = pop.bodies.clone();

        let hit = pop.apply_interaction(0, 1, &Config::with_big_g(100.0));

        assert_eq!(hit, Interaction::Coincident);
        assert_eq!(pop.bodies, before);
        assert!(pop.is_finite());
    }

    #[test]
    fn self_pair_is_a_no_op() {
        let mut pop = pair(
            (Vec2::new(0.0, 0.0), Vec2::new(1.0, 2.0)),
            (Vec2::new(50.0, 0.0), Vec2::ZERO),
        );
        let before = pop.bodies.clone();

        assert_eq!(
            pop.apply_interaction(0, 0, &Config::default()),
            Interaction::Coincident
        );
        assert_eq!(pop.bodies, before);
    }

    #[test]
    fn close_range_averages_both_velocities() {
        let mut pop = pair(
            (Vec2::new(0.0, 0.0), Vec2::new(2.0, 6.0)),
            (Vec2::new(1.0, 1.0), Vec2::new(0.0, -2.0)),
        );

        let hit = pop.apply_interaction(0, 1, &Config::with_big_g(1000.0));

        assert_eq!(hit, Interaction::Merged);
        assert_eq!(pop.bodies[0].vel, Vec2::new(1.0, 2.0));
        assert_eq!(pop.bodies[1].vel, Vec2::new(1.0, 2.0));
        // Positions only change during integration.
        assert_eq!(pop.bodies[1].pos, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn threshold_distance_uses_far_range_branch() {
        let mut pop = pair(
            (Vec2::new(0.0, 0.0), Vec2::ZERO),
            (Vec2::new(4.0, 0.0), Vec2::new(3.0, 3.0)),
        );

        let hit = pop.apply_interaction(0, 1, &Config::with_big_g(16.0));

        assert_eq!(hit, Interaction::Attracted);
        assert_eq!(pop.bodies[0].vel, Vec2::new(-1.0, 0.0));
        assert_eq!(pop.bodies[1].vel, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn far_range_only_updates_first_body() {
        let mut pop = pair(
            (Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.5)),
            (Vec2::new(6.0, 8.0), Vec2::new(-1.0, 2.0)),
        );

        pop.apply_interaction(0, 1, &Config::with_big_g(50.0));

        // d = 10, force = 0.5, direction = (-0.6, -0.8)
        assert_relative_eq!(pop.bodies[0].vel.x, 0.2, epsilon = 1e-6);
        assert_relative_eq!(pop.bodies[0].vel.y, 0.1, epsilon = 1e-6);
        assert_eq!(pop.bodies[1].vel, Vec2::new(-1.0, 2.0));
    }

    #[test]
    fn zero_big_g_still_merges_close_bodies() {
        let mut pop = pair(
            (Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)),
            (Vec2::new(0.0, 3.0), Vec2::ZERO),
        );
        let cfg = Config::with_big_g(0.0);

        assert_eq!(pop.apply_interaction(0, 1, &cfg), Interaction::Merged);
        assert_eq!(pop.bodies[0].vel, Vec2::new(2.0, 0.0));

        let mut far = pair(
            (Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)),
            (Vec2::new(0.0, 30.0), Vec2::ZERO),
        );
        far.apply_interaction(0, 1, &cfg);
        assert_eq!(far.bodies[0].vel, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn random_population_has_requested_size() {
        let mut rng = StdRng::seed_from_u64(42);
        let pop = Population::random(64, 100.0, 50.0, &mut rng).unwrap();

        assert_eq!(pop.len(), 64);
        assert!(!pop.is_empty());
        assert!(pop.is_finite());
        assert!(pop.get(63).is_some());
        assert!(pop.get(64).is_none());
    }

    #[test]
    fn bodies_mut_edits_states_in_place() {
        let mut pop = pair(
            (Vec2::new(0.0, 0.0), Vec2::ZERO),
            (Vec2::new(10.0, 0.0), Vec2::ZERO),
        );

        pop.bodies_mut()[1].vel = Vec2::new(2.0, -1.0);

        assert_eq!(pop.len(), 2);
        assert_eq!(pop.bodies()[1].vel, Vec2::new(2.0, -1.0));
        assert_eq!(pop.get(1), Some(&pop.bodies()[1]));
    }

    #[test]
    fn random_population_rejects_negative_deviation() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Population::random(4, -1.0, 1.0, &mut rng).is_err());
    }
}
