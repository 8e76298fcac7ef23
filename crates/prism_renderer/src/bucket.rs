//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon. Each bucket draws from its
//! own random stream, seeded from the render seed and the bucket's index,
//! so a given seed produces the same image on any number of threads.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::renderer::{color_to_rgb, render_pixel, PixelBuffer, RenderError};
use crate::{Camera, Hittable};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets closer to the center are rendered first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    if bucket_size == 0 {
        return buckets;
    }

    let mut index = 0;
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center (spiral order).
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f64 + b.width as f64 / 2.0;
        let by = b.y as f64 + b.height as f64 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    // Stable sort keeps row-major order between equidistant buckets
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order within the bucket
    pub pixels: Vec<[u8; 3]>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<[u8; 3]>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy the bucket's pixels into their place in `image`.
    pub fn write_into(&self, image: &mut PixelBuffer) {
        let mut pixels = self.pixels.iter();
        for local_y in 0..self.bucket.height {
            for local_x in 0..self.bucket.width {
                if let Some(&rgb) = pixels.next() {
                    image.set(self.bucket.x + local_x, self.bucket.y + local_y, rgb);
                }
            }
        }
    }
}

/// Render a single bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(camera, world, bucket.x + local_x, bucket.y + local_y, rng);
            pixels.push(color_to_rgb(color));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Options for [`render_parallel`].
#[derive(Debug, Clone)]
pub struct ParallelRender {
    /// Base seed; bucket streams are derived from it
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Worker count, or `None` for rayon's global pool
    pub threads: Option<usize>,
}

impl Default for ParallelRender {
    fn default() -> Self {
        Self {
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            threads: None,
        }
    }
}

/// Seed for a bucket's private stream (splitmix64 finalizer over seed and index).
fn bucket_seed(seed: u64, index: usize) -> u64 {
    let mut z = seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Render the scene in parallel buckets.
///
/// The scene and camera are shared read-only; every bucket owns its random
/// stream and a disjoint region of the output. `cancel` is polled before
/// each bucket starts; once set, remaining buckets are skipped and the
/// render returns [`RenderError::Cancelled`].
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    options: &ParallelRender,
    cancel: Option<&AtomicBool>,
) -> Result<PixelBuffer, RenderError> {
    if !camera.is_initialized() {
        return Err(RenderError::CameraNotInitialized);
    }
    if options.bucket_size == 0 {
        return Err(RenderError::InvalidBucketSize);
    }

    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width(), camera.image_height(), options.bucket_size);
    let total = buckets.len();
    let completed = AtomicUsize::new(0);

    log::info!(
        "Rendering {}x{} @ {} spp in {} buckets",
        camera.image_width(),
        camera.image_height(),
        camera.samples_per_pixel(),
        total
    );

    let is_cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));

    let render_all = || -> Vec<Option<BucketResult>> {
        buckets
            .par_iter()
            .map(|bucket| {
                if is_cancelled() {
                    return None;
                }
                let mut rng = StdRng::seed_from_u64(bucket_seed(options.seed, bucket.index));
                let result = render_bucket(bucket, camera, world, &mut rng);

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                log::debug!("Bucket {} done ({}/{})", bucket.index, done, total);
                Some(result)
            })
            .collect()
    };

    let results = match options.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(render_all),
        None => render_all(),
    };

    if is_cancelled() || results.iter().any(Option::is_none) {
        log::info!("Render cancelled after {}/{} buckets", completed.load(Ordering::Relaxed), total);
        return Err(RenderError::Cancelled);
    }

    let mut image = PixelBuffer::new(camera.image_width(), camera.image_height());
    for result in results.iter().flatten() {
        result.write_into(&mut image);
    }

    log::info!("Rendered {} buckets in {:?}", total, start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Dielectric, HittableList, Lambertian, Metal, Sphere};
    use prism_math::Vec3;
    use std::sync::Arc;

    fn small_scene() -> (Camera, HittableList) {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0))),
        )));
        world.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5))),
        )));
        world.add(Arc::new(Sphere::new(
            Vec3::new(-1.0, 0.0, -1.0),
            0.5,
            Arc::new(Dielectric::new(1.5)),
        )));
        world.add(Arc::new(Sphere::new(
            Vec3::new(1.0, 0.0, -1.0),
            0.5,
            Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.3)),
        )));

        let mut camera = Camera::new().with_resolution(40, 16.0 / 9.0).with_quality(2, 5);
        camera.initialize().expect("valid settings");
        (camera, world)
    }

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 37, 16);
        assert_eq!(buckets.len(), 7 * 3);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 37);
        assert!(buckets.iter().all(|b| b.x + b.width <= 100 && b.y + b.height <= 37));
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!((first.x, first.y), (64, 64));
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_zero_bucket_size() {
        assert!(generate_buckets(10, 10, 0).is_empty());

        let (camera, world) = small_scene();
        let options = ParallelRender {
            bucket_size: 0,
            ..Default::default()
        };
        let result = render_parallel(&camera, &world, &options, None);
        assert!(matches!(result, Err(RenderError::InvalidBucketSize)));
    }

    #[test]
    fn test_bucket_seeds_differ() {
        let seeds: Vec<u64> = (0..64).map(|i| bucket_seed(7, i)).collect();
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_ne!(bucket_seed(1, 0), bucket_seed(2, 0));
    }

    #[test]
    fn test_parallel_render_is_deterministic_across_thread_counts() {
        let (camera, world) = small_scene();
        let base = ParallelRender {
            seed: 1234,
            bucket_size: 8,
            threads: Some(1),
        };

        let single = render_parallel(&camera, &world, &base, None).expect("render");
        let multi = render_parallel(
            &camera,
            &world,
            &ParallelRender {
                threads: Some(4),
                ..base.clone()
            },
            None,
        )
        .expect("render");

        assert_eq!(single, multi);
        assert_eq!((single.width(), single.height()), (40, 22));
    }

    #[test]
    fn test_parallel_matches_bucket_by_bucket_render() {
        let (camera, world) = small_scene();
        let options = ParallelRender {
            seed: 99,
            bucket_size: 16,
            threads: None,
        };
        let image = render_parallel(&camera, &world, &options, None).expect("render");

        let mut expected = PixelBuffer::new(camera.image_width(), camera.image_height());
        for bucket in generate_buckets(camera.image_width(), camera.image_height(), 16) {
            let mut rng = StdRng::seed_from_u64(bucket_seed(99, bucket.index));
            render_bucket(&bucket, &camera, &world, &mut rng).write_into(&mut expected);
        }

        assert_eq!(image, expected);
    }

    #[test]
    fn test_cancelled_before_start() {
        let (camera, world) = small_scene();
        let cancel = AtomicBool::new(true);

        let result = render_parallel(&camera, &world, &ParallelRender::default(), Some(&cancel));
        assert!(matches!(result, Err(RenderError::Cancelled)));
    }

    #[test]
    fn test_stale_camera_rejected() {
        let (camera, world) = small_scene();
        let camera = camera.with_quality(1, 1);

        let result = render_parallel(&camera, &world, &ParallelRender::default(), None);
        assert!(matches!(result, Err(RenderError::CameraNotInitialized)));
    }
}
