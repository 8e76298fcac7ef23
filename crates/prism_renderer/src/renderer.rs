//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop bounded by the camera's max depth
//! - Sky gradient background
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use std::path::Path;
use std::time::Instant;

use crate::{Camera, Color, Hittable, Ray};
use prism_math::{unit_vector, Interval};
use rand::RngCore;
use thiserror::Error;

/// Closest hit distance considered; suppresses self-intersection ("shadow acne").
pub const MIN_HIT_DISTANCE: f64 = 0.001;

/// Errors that can occur while rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Camera must be initialized after its last configuration change")]
    CameraNotInitialized,

    #[error("Render cancelled")]
    Cancelled,

    #[error("Bucket size must be at least 1 pixel")]
    InvalidBucketSize,

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It follows the ray through
/// the scene, multiplying in each surface's attenuation at every bounce,
/// until the ray escapes to the sky, is absorbed, or `depth` bounces are
/// used up. Runs in constant stack space for any `depth`.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;

    for _ in 0..depth {
        let Some(rec) = world.hit(&ray, Interval::new(MIN_HIT_DISTANCE, f64::INFINITY)) else {
            return throughput * sky_gradient(&ray);
        };

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            // Absorbed
            None => return Color::ZERO,
        }
    }

    // Out of bounces: no light gathered
    Color::ZERO
}

/// Compute sky gradient background.
///
/// Blends white (looking down) into sky blue (looking up).
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = unit_vector(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    const INTENSITY: Interval = Interval::new(0.0, 1.0);

    let channel = |c: f64| (255.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Render a single pixel with multi-sampling. Returns the linear average.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth(), rng);
    }

    pixel_color * camera.samples_scale()
}

/// Row-major grid of 8-bit RGB pixels. `(0, 0)` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl PixelBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let index = self.index(x, y);
        self.pixels[index] = rgb;
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Flat RGB bytes in row-major order (for display or saving).
    pub fn as_raw(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    /// Convert to an `image` crate buffer.
    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| image::Rgb(self.get(x, y)))
    }

    /// Encode the buffer as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        self.to_image()
            .save_with_format(path.as_ref(), image::ImageFormat::Png)
    }
}

/// Render the entire scene single-threaded.
///
/// Every pixel of the returned buffer is written. The camera must have been
/// initialized since its last configuration change.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
) -> Result<PixelBuffer, RenderError> {
    if !camera.is_initialized() {
        return Err(RenderError::CameraNotInitialized);
    }

    let start = Instant::now();
    let mut image = PixelBuffer::new(camera.image_width(), camera.image_height());

    for y in 0..camera.image_height() {
        for x in 0..camera.image_width() {
            let color = render_pixel(camera, world, x, y, rng);
            image.set(x, y, color_to_rgb(color));
        }
    }

    log::info!(
        "Rendered {}x{} @ {} spp in {:?}",
        image.width(),
        image.height(),
        camera.samples_per_pixel(),
        start.elapsed()
    );

    Ok(image)
}
