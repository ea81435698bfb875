//! Numerical tolerance primitives for mc-core's comparator.

pub mod tolerance;

pub use tolerance::*;
