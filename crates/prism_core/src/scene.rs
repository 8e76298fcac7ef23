//! Scene description types for Prism.
//!
//! A scene is a set of named materials, a list of spheres that refer to
//! those materials by name, and the camera settings to render it with.
//! Names let many spheres share one material; the renderer turns each name
//! into a single shared handle.

use std::collections::BTreeMap;

use prism_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::{loader::SceneError, settings::CameraSettings};

/// Surface material parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    /// Diffuse surface
    Lambertian { albedo: Color },

    /// Specular surface, `fuzz` in [0, 1] roughens the reflection
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f64,
    },

    /// Transparent surface (glass, water, air bubbles)
    Dielectric { refraction_index: f64 },
}

impl MaterialDesc {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MaterialDesc::Lambertian { .. } => "lambertian",
            MaterialDesc::Metal { .. } => "metal",
            MaterialDesc::Dielectric { .. } => "dielectric",
        }
    }

    fn validate(&self, name: &str) -> Result<(), SceneError> {
        let ok = match self {
            MaterialDesc::Lambertian { albedo } => albedo.is_finite(),
            MaterialDesc::Metal { albedo, fuzz } => albedo.is_finite() && fuzz.is_finite(),
            MaterialDesc::Dielectric { refraction_index } => {
                refraction_index.is_finite() && *refraction_index > 0.0
            }
        };

        if ok {
            Ok(())
        } else {
            Err(SceneError::InvalidValue(format!(
                "{} material '{}' has out-of-range parameters",
                self.kind(),
                name
            )))
        }
    }
}

/// A sphere placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Vec3,
    pub radius: f64,
    /// Name of an entry in [`SceneDescription::materials`]
    pub material: String,
}

impl SphereDesc {
    pub fn new(center: Vec3, radius: f64, material: impl Into<String>) -> Self {
        Self {
            center,
            radius,
            material: material.into(),
        }
    }
}

/// A complete renderable scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraSettings,

    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDesc>,

    #[serde(default)]
    pub spheres: Vec<SphereDesc>,
}

impl SceneDescription {
    /// Create an empty scene with default camera settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a named material.
    pub fn add_material(&mut self, name: impl Into<String>, material: MaterialDesc) {
        self.materials.insert(name.into(), material);
    }

    /// Add a sphere.
    pub fn add_sphere(&mut self, sphere: SphereDesc) {
        self.spheres.push(sphere);
    }

    /// Number of named materials.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of spheres.
    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    /// Check references and parameter domains.
    ///
    /// Negative radii are accepted here; the renderer floors them at zero.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (name, material) in &self.materials {
            material.validate(name)?;
        }

        for (index, sphere) in self.spheres.iter().enumerate() {
            if !self.materials.contains_key(&sphere.material) {
                return Err(SceneError::UnknownMaterial {
                    sphere: index,
                    name: sphere.material.clone(),
                });
            }
            if !(sphere.center.is_finite() && sphere.radius.is_finite()) {
                return Err(SceneError::InvalidValue(format!(
                    "sphere {index} has a non-finite center or radius"
                )));
            }
        }

        self.camera.validate()?;
        Ok(())
    }
}
