//! Core 2-D gravitational N-body engine.
//!
//! Main components:
//! - [`body`] — a single mass point and its pairwise physics.
//! - [`population`] — the fixed-size body arena a run mutates in place.
//! - [`config`] — physics constants passed into each step.
//! - [`phases`] — the interaction and integration sweeps of one step.
//! - [`settings`] — the `key:value` settings file read at startup.
//! - [`types`] — shared type aliases and IDs.

pub mod body;
pub mod config;
pub mod phases;
pub mod population;
pub mod settings;
pub mod types;
