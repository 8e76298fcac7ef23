//! Double precision math types for the Prism path tracer.

// Re-export glam's f64 vector under the names the renderer uses
pub use glam::DVec3 as Vec3;

/// Linear-space RGB color. Components live in [0, inf) until display conversion.
pub type Color = Vec3;

mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{degrees_to_radians, near_zero, reflect, refract, unit_vector, NEAR_ZERO_EPSILON};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_color_componentwise_product() {
        let a = Color::new(0.5, 0.25, 1.0);
        let b = Color::new(0.5, 2.0, 0.0);
        assert_eq!(a * b, Color::new(0.25, 0.5, 0.0));
    }
}
