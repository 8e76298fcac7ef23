//! JSON scene files.
//!
//! ```json
//! {
//!   "camera": { "image_width": 400, "vfov": 90.0 },
//!   "materials": {
//!     "ground": { "type": "lambertian", "albedo": [0.8, 0.8, 0.0] },
//!     "glass": { "type": "dielectric", "refraction_index": 1.5 }
//!   },
//!   "spheres": [
//!     { "center": [0.0, -100.5, -1.0], "radius": 100.0, "material": "ground" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::scene::SceneDescription;
use crate::settings::SettingsError;

/// Errors that can occur while loading or validating a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Sphere {sphere} references unknown material '{name}'")]
    UnknownMaterial { sphere: usize, name: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid camera settings: {0}")]
    Settings(#[from] SettingsError),
}

/// Load and validate a scene from a JSON file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneDescription, SceneError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let scene = load_scene_from_str(&content)?;

    log::info!(
        "Loaded scene {}: {} materials, {} spheres",
        path.display(),
        scene.material_count(),
        scene.sphere_count()
    );

    Ok(scene)
}

/// Parse and validate a scene from a JSON string.
pub fn load_scene_from_str(content: &str) -> Result<SceneDescription, SceneError> {
    let scene: SceneDescription = serde_json::from_str(content)?;
    scene.validate()?;
    Ok(scene)
}

/// Write a scene as pretty-printed JSON.
pub fn save_scene<P: AsRef<Path>>(path: P, scene: &SceneDescription) -> Result<(), SceneError> {
    let json = serde_json::to_string_pretty(scene)?;
    fs::write(path.as_ref(), json)?;
    log::debug!("Saved scene to {}", path.as_ref().display());
    Ok(())
}
