//! Camera for ray generation.

use crate::sampling::{random_in_unit_disk, sample_square};
use crate::{Hittable, PixelBuffer, Ray, RenderError};
use prism_core::{CameraSettings, SettingsError};
use prism_math::{degrees_to_radians, unit_vector, Vec3};
use rand::RngCore;

/// Camera for generating rays into the scene.
///
/// Configuration lives in [`CameraSettings`]; everything else is derived by
/// [`Camera::initialize`]. Any configuration change marks the derived state
/// stale until `initialize` runs again.
#[derive(Debug, Clone)]
pub struct Camera {
    settings: CameraSettings,
    initialized: bool,

    // Cached computed values (set by initialize())
    image_height: u32,
    viewport_width: f64,
    viewport_height: f64,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f64,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::from_settings(CameraSettings::default())
    }

    /// Create a camera from existing settings. Call `initialize` before use.
    pub fn from_settings(settings: CameraSettings) -> Self {
        Self {
            settings,
            initialized: false,
            image_height: 1,
            viewport_width: 0.0,
            viewport_height: 0.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
            samples_scale: 1.0,
        }
    }

    /// Set image width and aspect ratio (width over height).
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.settings.image_width = image_width;
        self.settings.aspect_ratio = aspect_ratio;
        self.initialized = false;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.settings.samples_per_pixel = samples_per_pixel;
        self.settings.max_depth = max_depth;
        self.initialized = false;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.settings.look_from = look_from;
        self.settings.look_at = look_at;
        self.settings.vup = vup;
        self.initialized = false;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.settings.vfov = vfov;
        self.settings.defocus_angle = defocus_angle;
        self.settings.focus_dist = focus_dist;
        self.initialized = false;
        self
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Mutable access to the configuration. Marks the camera stale.
    pub fn settings_mut(&mut self) -> &mut CameraSettings {
        self.initialized = false;
        &mut self.settings
    }

    /// True once `initialize` has run since the last configuration change.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Validate the settings and recompute all derived values from scratch.
    pub fn initialize(&mut self) -> Result<(), SettingsError> {
        self.initialized = false;
        self.settings.validate()?;

        let s = &self.settings;
        self.image_height = s.image_height();
        self.samples_scale = 1.0 / s.samples_per_pixel as f64;
        self.center = s.look_from;

        // Calculate viewport dimensions
        let theta = degrees_to_radians(s.vfov);
        let h = (theta / 2.0).tan();
        self.viewport_height = 2.0 * h * s.focus_dist;
        self.viewport_width =
            self.viewport_height * (s.image_width as f64 / self.image_height as f64);

        // Calculate camera basis vectors
        self.w = unit_vector(s.look_from - s.look_at);
        self.u = unit_vector(s.vup.cross(self.w));
        self.v = self.w.cross(self.u);

        // Viewport edges; v points down the image
        let viewport_u = self.viewport_width * self.u;
        let viewport_v = self.viewport_height * -self.v;

        self.pixel_delta_u = viewport_u / s.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        let viewport_upper_left =
            self.center - s.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = s.focus_dist * degrees_to_radians(s.defocus_angle / 2.0).tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        self.initialized = true;
        Ok(())
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The sample point is jittered within the pixel footprint; the origin is
    /// the camera center, or a point on the defocus disk when the defocus
    /// angle is positive.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.settings.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Render `world` single-threaded into a new pixel buffer.
    pub fn render(
        &self,
        world: &dyn Hittable,
        rng: &mut dyn RngCore,
    ) -> Result<PixelBuffer, RenderError> {
        crate::renderer::render(self, world, rng)
    }

    pub fn image_width(&self) -> u32 {
        self.settings.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.settings.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.settings.max_depth
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f64 {
        self.samples_scale
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Orthonormal camera basis (u right, v up, w backward).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// World-space center of pixel (0, 0).
    pub fn pixel00_loc(&self) -> Vec3 {
        self.pixel00_loc
    }

    /// Offsets between horizontally and vertically adjacent pixel centers.
    pub fn pixel_deltas(&self) -> (Vec3, Vec3) {
        (self.pixel_delta_u, self.pixel_delta_v)
    }

    /// Viewport width and height at the focus distance.
    pub fn viewport_size(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    /// Defocus disk basis vectors, scaled to the disk radius.
    pub fn defocus_disk(&self) -> (Vec3, Vec3) {
        (self.defocus_disk_u, self.defocus_disk_v)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn forward_camera() -> Camera {
        Camera::new()
            .with_resolution(100, 1.0)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
    }

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 4.0 / 3.0)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        assert!(!camera.is_initialized());
        camera.initialize().expect("valid settings");
        assert!(camera.is_initialized());

        assert_eq!(camera.center(), Vec3::ZERO);
        assert_eq!(camera.image_height(), 600);

        let (u, v, w) = camera.basis();
        assert!((u - Vec3::X).length() < 1e-12);
        assert!((v - Vec3::Y).length() < 1e-12);
        assert!((w - Vec3::Z).length() < 1e-12);

        // tan(45) = 1, so the viewport is 2 units tall at focus distance 1
        let (vw, vh) = camera.viewport_size();
        assert!((vh - 2.0).abs() < 1e-12);
        assert!((vw - 2.0 * 800.0 / 600.0).abs() < 1e-12);
    }

    #[test]
    fn test_pixel_grid_geometry() {
        let mut camera = forward_camera();
        camera.initialize().expect("valid settings");

        let (du, dv) = camera.pixel_deltas();
        assert!((du - Vec3::new(0.02, 0.0, 0.0)).length() < 1e-12);
        // Rows go down the image
        assert!((dv - Vec3::new(0.0, -0.02, 0.0)).length() < 1e-12);

        // Pixel (0, 0) center is half a pixel in from the top-left corner
        let expected = Vec3::new(-1.0 + 0.01, 1.0 - 0.01, -1.0);
        assert!((camera.pixel00_loc() - expected).length() < 1e-12);
    }

    #[test]
    fn test_initialize_twice_is_bit_identical() {
        let mut camera = Camera::new()
            .with_resolution(320, 16.0 / 9.0)
            .with_position(Vec3::new(-2.0, 2.0, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(20.0, 10.0, 3.4);

        camera.initialize().expect("valid settings");
        let first = camera.clone();
        camera.initialize().expect("valid settings");

        assert_eq!(camera.basis(), first.basis());
        assert_eq!(camera.pixel00_loc(), first.pixel00_loc());
        assert_eq!(camera.pixel_deltas(), first.pixel_deltas());
        assert_eq!(camera.defocus_disk(), first.defocus_disk());
    }

    #[test]
    fn test_configuration_change_marks_stale() {
        let mut camera = forward_camera();
        camera.initialize().expect("valid settings");
        assert!(camera.is_initialized());

        camera.settings_mut().image_width = 50;
        assert!(!camera.is_initialized());

        camera.initialize().expect("valid settings");
        assert_eq!(camera.image_height(), 50);

        let camera = camera.with_quality(4, 3);
        assert!(!camera.is_initialized());
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        let mut camera = forward_camera().with_lens(180.0, 0.0, 1.0);
        assert_eq!(camera.initialize(), Err(SettingsError::FieldOfView(180.0)));
        assert!(!camera.is_initialized());

        let mut camera = forward_camera().with_resolution(0, 1.0);
        assert_eq!(camera.initialize(), Err(SettingsError::ImageWidth));
    }

    #[test]
    fn test_camera_ray_direction() {
        let mut camera = forward_camera();
        camera.initialize().expect("valid settings");

        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point roughly towards -Z from the camera center
        let ray = camera.get_ray(50, 50, &mut rng);
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!(ray.direction().z < 0.0);
        assert!(ray.direction().x.abs() < 0.03);
        assert!(ray.direction().y.abs() < 0.03);
    }

    #[test]
    fn test_samples_stay_within_pixel_footprint() {
        let mut camera = forward_camera();
        camera.initialize().expect("valid settings");
        let mut rng = StdRng::seed_from_u64(3);

        let (du, dv) = camera.pixel_deltas();
        let pixel_center = camera.pixel00_loc() + 10.0 * du + 20.0 * dv;

        for _ in 0..200 {
            let ray = camera.get_ray(10, 20, &mut rng);
            // Focus plane is at z = -1, so the direction ends on it
            let target = ray.at(1.0);
            let offset = target - pixel_center;
            assert!(offset.x.abs() <= 0.5 * du.x.abs() + 1e-12);
            assert!(offset.y.abs() <= 0.5 * dv.y.abs() + 1e-12);
            assert!(offset.z.abs() < 1e-12);
        }
    }

    #[test]
    fn test_defocus_origins_lie_on_disk() {
        let focus_dist = 2.0;
        let defocus_angle: f64 = 10.0;
        let mut camera = forward_camera().with_lens(90.0, defocus_angle, focus_dist);
        camera.initialize().expect("valid settings");
        let mut rng = StdRng::seed_from_u64(17);

        let radius = focus_dist * (defocus_angle / 2.0).to_radians().tan();
        let mut moved = false;
        for _ in 0..200 {
            let ray = camera.get_ray(50, 50, &mut rng);
            let origin = ray.origin();
            assert!(origin.length() < radius + 1e-12);
            assert!(origin.z.abs() < 1e-12);
            moved |= origin != Vec3::ZERO;
        }
        assert!(moved);
    }
}
