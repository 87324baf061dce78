//! High-level simulation phases for the N-body population.
//!
//! One step looks like:
//! 1. [`interaction_phase`] — every ordered pair `(i, j)`, self-pairs
//!    included, updates velocities through
//!    [`Population::apply_interaction`].
//! 2. [`integration_phase`] — every body moves once by its final
//!    velocity.
//!
//! Both phases run to completion before the next starts. The close-range
//! merge branch writes to two bodies, so the result of the first phase
//! depends on the traversal order, which is plain index order.

use crate::{
    config::Config,
    population::{Interaction, Population},
};

/// Counters describing what happened during one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Ordered pairs evaluated, always `n * n`.
    pub pair_evaluations: usize,
    /// Pairs that took the close-range averaging branch.
    pub merges: usize,
    /// Pairs skipped because both bodies shared a position.
    pub coincident: usize,
    /// Pairs that applied an inverse-square velocity change.
    pub attractions: usize,
    /// Bodies integrated, always `n`.
    pub integrations: usize,
}

/// Runs the pairwise velocity sweep over the whole population.
///
/// The ordered traversal visits each unordered pair twice and every
/// body against itself once. The repeated visit matters for the
/// close-range branch, which averages again against an already
/// averaged partner.
///
/// ### Parameters
/// - `pop` - Population whose velocities are updated in place.
/// - `cfg` - Physics constants for this step.
///
/// ### Returns
/// [`StepStats`] with the pair counters filled in and
/// `integrations == 0`.
pub fn interaction_phase(pop: &mut Population, cfg: &Config) -> StepStats {
    let n = pop.len();
    let mut stats = StepStats::default();

    for i in 0..n {
        for j in 0..n {
            match pop.apply_interaction(i, j, cfg) {
                Interaction::Coincident => stats.coincident += 1,
                Interaction::Merged => stats.merges += 1,
                Interaction::Attracted => stats.attractions += 1,
            }
            stats.pair_evaluations += 1;
        }
    }

    stats
}

/// Moves every body once by its current velocity.
///
/// ### Returns
/// The number of bodies integrated.
pub fn integration_phase(pop: &mut Population) -> usize {
    for id in 0..pop.len() {
        pop.integrate(id);
    }
    pop.len()
}

/// Advances `pop` by one discrete time unit.
pub fn step(pop: &mut Population, cfg: &Config) -> StepStats {
    let mut stats = interaction_phase(pop, cfg);
    stats.integrations = integration_phase(pop);

    log::trace!(
        "step: {} pairs, {} merges, {} coincident, {} attractions",
        stats.pair_evaluations,
        stats.merges,
        stats.coincident,
        stats.attractions
    );
    stats
}
