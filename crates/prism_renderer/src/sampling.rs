//! Random sampling primitives.
//!
//! Every function draws from an explicit generator so each render worker can
//! own an independent stream.

use prism_math::Vec3;
use rand::{Rng, RngCore};

/// Squared lengths at or below this are rejected to avoid dividing by zero.
const MIN_SAMPLE_LENGTH_SQUARED: f64 = 1e-160;

/// Uniform random value in [min, max).
#[inline]
pub fn random_f64_in(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * rng.gen::<f64>()
}

/// Vector with each component uniform in [min, max).
pub fn random_vec_in(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        random_f64_in(rng, min, max),
        random_f64_in(rng, min, max),
        random_f64_in(rng, min, max),
    )
}

/// Uniformly distributed direction on the unit sphere.
///
/// Rejection samples the cube [-1, 1)^3, keeping points inside the unit ball
/// that are not too close to the origin, then normalizes.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec_in(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if MIN_SAMPLE_LENGTH_SQUARED < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Random point inside the unit disk in the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            random_f64_in(rng, -1.0, 1.0),
            random_f64_in(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random offset in the square [-0.5, 0.5) x [-0.5, 0.5).
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5, 0.0)
}
