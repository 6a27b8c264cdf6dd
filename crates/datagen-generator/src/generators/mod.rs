//! Leaf value generators.
//!
//! Each generator draws from the caller's RNG so that a worker's
//! documents come from a single, independently seeded stream.

pub mod numeric;
pub mod uuid;
