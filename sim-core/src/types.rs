/// Identifier for a body in a [`crate::population::Population`].
///
/// This is an index into `Population::bodies`, and is only meaningful
/// within the lifetime of a given `Population` instance.
pub type BodyId = usize;
