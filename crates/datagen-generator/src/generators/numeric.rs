//! Numeric value generators.

use rand::Rng;

/// Lowest school grade a generated child can have.
pub const MIN_GRADE: i32 = 1;
/// Highest school grade a generated child can have.
pub const MAX_GRADE: i32 = 12;

/// Generate a random integer in the given range (inclusive on both ends).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i32, max: i32) -> i32 {
    rng.gen_range(min..=max)
}

/// Generate a school grade in `MIN_GRADE..=MAX_GRADE`.
pub fn generate_grade<R: Rng>(rng: &mut R) -> i32 {
    generate_int_range(rng, MIN_GRADE, MAX_GRADE)
}
