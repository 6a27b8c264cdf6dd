//! Synthetic document generator for docstore-datagen.
//!
//! Every call to [`DocumentGenerator::generate`] produces a fresh [`Family`]
//! record: a root document with a unique id, a unique partition key
//! (`LastName`), two parents, one child with one pet, and an address.
//!
//! # Architecture
//!
//! ```text
//!  worker N
//!     │
//!     ▼
//! ┌─────────────────────┐
//! │  DocumentGenerator  │
//! │                     │
//! │  - rng (StdRng)     │   one instance per worker,
//! │  - generated        │   seeded independently
//! └──────────┬──────────┘
//!            │
//!            ▼
//!   Family { id, LastName, Parents[2], Children[1], Address }
//! ```
//!
//! # Example
//!
//! ```rust
//! use datagen_generator::DocumentGenerator;
//!
//! let mut generator = DocumentGenerator::seeded(42);
//! let family = generator.generate();
//! assert!((1..=12).contains(&family.children[0].grade));
//! ```

pub mod document;
pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use document::{Address, Child, Family, Parent, Pet, PARTITION_KEY_PATH};
pub use generator::DocumentGenerator;
