//! Main document generator.

use crate::document::{Address, Child, Family, Parent, Pet};
use crate::generators::numeric::generate_grade;
use crate::generators::uuid::generate_token;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Produces randomized [`Family`] documents.
///
/// A generator owns its RNG and is meant to be owned by exactly one worker
/// for the whole run. Create one per worker with [`DocumentGenerator::for_worker`].
pub struct DocumentGenerator {
    rng: StdRng,
    generated: u64,
}

impl DocumentGenerator {
    /// Create a generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            generated: 0,
        }
    }

    /// Create a generator with a fixed seed (same seed = same documents).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            generated: 0,
        }
    }

    /// Create the generator owned by `worker_id`.
    ///
    /// With a base seed, the worker's seed is mixed from the base seed and
    /// `worker_id`, so nearby base seeds do not share streams between workers.
    /// Without one, every worker draws its own seed from OS entropy.
    pub fn for_worker(base_seed: Option<u64>, worker_id: u32) -> Self {
        match base_seed {
            Some(seed) => Self::seeded(worker_seed(seed, worker_id)),
            None => Self::from_entropy(),
        }
    }

    /// Number of documents produced so far.
    pub fn generated_count(&self) -> u64 {
        self.generated
    }

    /// Generate the next document.
    pub fn generate(&mut self) -> Family {
        let rng = &mut self.rng;

        let family = Family {
            id: generate_token(rng),
            last_name: generate_token(rng),
            parents: vec![
                Parent {
                    first_name: generate_token(rng),
                    family_name: generate_token(rng),
                },
                Parent {
                    first_name: generate_token(rng),
                    family_name: generate_token(rng),
                },
            ],
            children: vec![Child {
                first_name: generate_token(rng),
                family_name: generate_token(rng),
                gender: generate_token(rng),
                grade: generate_grade(rng),
                pets: vec![Pet {
                    given_name: generate_token(rng),
                }],
            }],
            address: Address {
                state: generate_token(rng),
                county: generate_token(rng),
                city: generate_token(rng),
            },
        };

        self.generated += 1;
        family
    }
}

impl Iterator for DocumentGenerator {
    type Item = Family;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }
}

/// SplitMix64 finalizer: a bijective scramble of a 64-bit value.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn worker_seed(base_seed: u64, worker_id: u32) -> u64 {
    mix64(mix64(base_seed) ^ u64::from(worker_id))
}
