//! Trend model implementation.
//!
//! The model is a small value type with pure evaluation functions so that the
//! fitting code and the renderers can share it.

pub mod model;

pub use model::*;
