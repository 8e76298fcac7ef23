//! Camera and image settings.
//!
//! `CameraSettings` is the full configuration surface of a render: image
//! resolution, sampling quality, camera placement and lens. Out-of-domain
//! values are rejected by [`CameraSettings::validate`] before they can turn
//! into NaN pixels.

use prism_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest image height `validate` accepts.
pub const MAX_IMAGE_HEIGHT: u32 = 1 << 16;

/// Errors for camera settings outside their valid domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Aspect ratio must be positive and finite, got {0}")]
    AspectRatio(f64),

    #[error("Image width must be at least 1 pixel")]
    ImageWidth,

    #[error("Derived image height {0} exceeds {max} pixels", max = MAX_IMAGE_HEIGHT)]
    ImageHeight(f64),

    #[error("Samples per pixel must be at least 1")]
    SamplesPerPixel,

    #[error("Vertical field of view must be strictly between 0 and 180 degrees, got {0}")]
    FieldOfView(f64),

    #[error("Defocus angle must be non-negative and finite, got {0}")]
    DefocusAngle(f64),

    #[error("Focus distance must be positive and finite, got {0}")]
    FocusDistance(f64),

    #[error("Camera position is not finite")]
    NonFinitePosition,

    #[error("Camera looks from and at the same point {0}")]
    DegenerateView(Vec3),

    #[error("Up vector {0} is parallel to the view direction")]
    DegenerateUp(Vec3),
}

/// Camera and image configuration.
///
/// Defaults: 16:9 image, 400 pixels wide, 20 samples, 10 bounces, 90 degree
/// vertical field of view looking down -Z from the origin, no defocus blur
/// and a focus distance of 10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,

    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Point the camera looks from
    pub look_from: Vec3,
    /// Point the camera looks at
    pub look_at: Vec3,
    /// Camera-relative up direction
    pub vup: Vec3,

    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from `look_from` to the plane of perfect focus
    pub focus_dist: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            samples_per_pixel: 20,
            max_depth: 10,
            vfov: 90.0,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

impl CameraSettings {
    /// Image height derived from width and aspect ratio (floored, at least 1).
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.aspect_ratio) as u32).max(1)
    }

    /// Check every setting against its valid domain.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(SettingsError::AspectRatio(self.aspect_ratio));
        }
        if self.image_width == 0 {
            return Err(SettingsError::ImageWidth);
        }
        // Checked before the cast in image_height, which would saturate
        let height = (self.image_width as f64 / self.aspect_ratio).floor();
        if height > MAX_IMAGE_HEIGHT as f64 {
            return Err(SettingsError::ImageHeight(height));
        }
        if self.samples_per_pixel == 0 {
            return Err(SettingsError::SamplesPerPixel);
        }
        // NaN fails both comparisons
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(SettingsError::FieldOfView(self.vfov));
        }
        if !(self.defocus_angle.is_finite() && self.defocus_angle >= 0.0) {
            return Err(SettingsError::DefocusAngle(self.defocus_angle));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return Err(SettingsError::FocusDistance(self.focus_dist));
        }
        if !(self.look_from.is_finite() && self.look_at.is_finite() && self.vup.is_finite()) {
            return Err(SettingsError::NonFinitePosition);
        }

        let view = self.look_from - self.look_at;
        if view.length_squared() == 0.0 {
            return Err(SettingsError::DegenerateView(self.look_from));
        }
        let scale = self.vup.length_squared() * view.length_squared();
        if self.vup.cross(view).length_squared() <= f64::EPSILON * scale {
            return Err(SettingsError::DegenerateUp(self.vup));
        }

        Ok(())
    }
}
