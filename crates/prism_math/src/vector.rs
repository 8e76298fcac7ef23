// Vector helpers used by scattering and camera setup.
//
// glam already provides dot, cross, length and length_squared on DVec3; the
// functions here cover the optics the renderer needs on top of that.

use crate::Vec3;

/// Per-component threshold below which a vector counts as zero.
pub const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Convert an angle in degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// `v / |v|`.
///
/// Produces NaN components for a zero-length input; callers must guard.
#[inline]
pub fn unit_vector(v: Vec3) -> Vec3 {
    v / v.length()
}

/// True when every component is below [`NEAR_ZERO_EPSILON`] in magnitude.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.x.abs() < NEAR_ZERO_EPSILON && v.y.abs() < NEAR_ZERO_EPSILON && v.z.abs() < NEAR_ZERO_EPSILON
}

/// Mirror `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices (incident over
/// transmitted). The result is split into the components perpendicular and
/// parallel to `n` per Snell's law.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-12, "{a:?} != {b:?}");
    }

    #[test]
    fn test_degrees_to_radians() {
        assert_eq!(degrees_to_radians(0.0), 0.0);
        assert!((degrees_to_radians(180.0) - std::f64::consts::PI).abs() < 1e-15);
        assert!((degrees_to_radians(90.0) - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }

    #[test]
    fn test_unit_vector() {
        assert_vec_close(unit_vector(Vec3::new(3.0, 0.0, 4.0)), Vec3::new(0.6, 0.0, 0.8));
        assert!(unit_vector(Vec3::ZERO).x.is_nan());
    }

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::ZERO));
        assert!(near_zero(Vec3::splat(1e-9)));
        assert!(near_zero(Vec3::new(-9e-9, 9e-9, 0.0)));
        assert!(!near_zero(Vec3::new(0.0, 1e-7, 0.0)));
        assert!(!near_zero(Vec3::new(0.0, 0.0, -1e-8)));
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_vec_close(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));

        // Reflecting a vector along the normal flips it
        assert_vec_close(reflect(Vec3::NEG_Y, Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_refract_with_unit_ratio_does_not_bend() {
        let uv = unit_vector(Vec3::new(1.0, -2.0, 0.5));
        assert_vec_close(refract(uv, Vec3::Y, 1.0), uv);
    }

    #[test]
    fn test_refract_bends_toward_normal_into_denser_medium() {
        let uv = unit_vector(Vec3::new(1.0, -1.0, 0.0));
        let out = refract(uv, Vec3::Y, 1.0 / 1.5);

        // Snell: sin(out) = sin(in) / 1.5
        let sin_in = uv.x.abs();
        let sin_out = out.x.abs() / out.length();
        assert!((sin_out - sin_in / 1.5).abs() < 1e-12);
        assert!(out.y < 0.0);
        assert!((out.length() - 1.0).abs() < 1e-12);
    }
}
