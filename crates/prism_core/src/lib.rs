//! Prism Core - renderer-agnostic scene description.
//!
//! This crate provides:
//!
//! - **Camera settings**: `CameraSettings`, the configuration surface consumed
//!   by the renderer, with fail-fast validation
//! - **Scene description**: `SceneDescription`, named materials and spheres
//! - **Scene files**: JSON loading and saving
//!
//! # Example
//!
//! ```ignore
//! use prism_core::load_scene;
//!
//! let scene = load_scene("scenes/three_spheres.json")?;
//! println!("Loaded {} materials, {} spheres",
//!     scene.material_count(),
//!     scene.sphere_count());
//! ```

pub mod loader;
pub mod scene;
pub mod settings;

// Re-export commonly used types
pub use loader::{load_scene, load_scene_from_str, save_scene, SceneError};
pub use scene::{MaterialDesc, SceneDescription, SphereDesc};
pub use settings::{CameraSettings, SettingsError, MAX_IMAGE_HEIGHT};
