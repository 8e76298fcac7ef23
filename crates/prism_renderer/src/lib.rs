//! Prism Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for sphere scenes with diffuse,
//! metallic and glass materials.
//!
//! Rendering either walks the image one pixel at a time ([`render`]) or
//! splits it into buckets rendered in parallel ([`render_parallel`]).

mod bucket;
mod camera;
mod hittable;
mod material;
mod renderer;
pub mod sampling;
mod scene;
mod sphere;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, ParallelRender,
    DEFAULT_BUCKET_SIZE,
};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render, render_pixel, sky_gradient, PixelBuffer,
    RenderError, MIN_HIT_DISTANCE,
};
pub use scene::{build_world, random_spheres, three_spheres, World};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from prism_math
pub use prism_math::{Color, Interval, Ray, Vec3};
