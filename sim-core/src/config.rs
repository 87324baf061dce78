/// Separation below which two bodies are treated as merged for an
/// interaction and simply share their averaged velocity.
pub const CLOSE_RANGE_THRESHOLD: f32 = 4.0;

/// Physics constants consumed by every simulation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Gravitational constant scaling every far-range pairwise force.
    pub big_g: f32,
    /// Distance under which the close-range merge branch fires.
    pub close_range: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            big_g: 1.0,
            close_range: CLOSE_RANGE_THRESHOLD,
        }
    }
}

impl Config {
    pub fn with_big_g(big_g: f32) -> Self {
        Self {
            big_g,
            ..Self::default()
        }
    }
}
