//! Scene building: turns a [`SceneDescription`] into renderable objects.
//!
//! Also provides the built-in preset scenes.

use std::collections::HashMap;
use std::sync::Arc;

use prism_core::{CameraSettings, MaterialDesc, SceneDescription, SceneError, SphereDesc};
use prism_math::{Color, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Camera, Dielectric, HittableList, Lambertian, Material, Metal, Sphere};

/// Renderable objects plus the camera configured for them.
///
/// The camera is built from the description's settings but not initialized.
#[derive(Debug, Clone)]
pub struct World {
    pub objects: HittableList,
    pub camera: Camera,
}

fn build_material(desc: &MaterialDesc) -> Arc<dyn Material> {
    match *desc {
        MaterialDesc::Lambertian { albedo } => Arc::new(Lambertian::new(albedo)),
        MaterialDesc::Metal { albedo, fuzz } => Arc::new(Metal::new(albedo, fuzz)),
        MaterialDesc::Dielectric { refraction_index } => Arc::new(Dielectric::new(refraction_index)),
    }
}

/// Build the world for a scene description.
///
/// Each named material is instantiated once; every sphere naming it holds a
/// handle to that same instance.
pub fn build_world(desc: &SceneDescription) -> Result<World, SceneError> {
    desc.validate()?;

    let materials: HashMap<&str, Arc<dyn Material>> = desc
        .materials
        .iter()
        .map(|(name, material)| (name.as_str(), build_material(material)))
        .collect();

    let mut objects = HittableList::new();
    for (index, sphere) in desc.spheres.iter().enumerate() {
        let material = materials
            .get(sphere.material.as_str())
            .ok_or_else(|| SceneError::UnknownMaterial {
                sphere: index,
                name: sphere.material.clone(),
            })?;
        objects.add(Arc::new(Sphere::new(sphere.center, sphere.radius, Arc::clone(material))));
    }

    log::info!(
        "Built world: {} spheres sharing {} materials",
        objects.len(),
        materials.len()
    );

    Ok(World {
        objects,
        camera: Camera::from_settings(desc.camera.clone()),
    })
}

/// Ground, a matte center sphere, a hollow glass sphere on the left and a
/// rough metal sphere on the right, seen with the default camera.
pub fn three_spheres() -> SceneDescription {
    let mut scene = SceneDescription::new();

    scene.add_material(
        "ground",
        MaterialDesc::Lambertian {
            albedo: Color::new(0.8, 0.8, 0.0),
        },
    );
    scene.add_material(
        "center",
        MaterialDesc::Lambertian {
            albedo: Color::new(0.1, 0.2, 0.5),
        },
    );
    scene.add_material("left", MaterialDesc::Dielectric { refraction_index: 1.5 });
    // Air inside glass
    scene.add_material(
        "bubble",
        MaterialDesc::Dielectric {
            refraction_index: 1.0 / 1.5,
        },
    );
    scene.add_material(
        "right",
        MaterialDesc::Metal {
            albedo: Color::ONE,
            fuzz: 1.0,
        },
    );

    scene.add_sphere(SphereDesc::new(Vec3::new(0.0, 0.0, -1.0), 0.5, "center"));
    scene.add_sphere(SphereDesc::new(Vec3::new(0.0, -100.5, -1.0), 100.0, "ground"));
    scene.add_sphere(SphereDesc::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, "left"));
    scene.add_sphere(SphereDesc::new(Vec3::new(-1.0, 0.0, -1.0), 0.4, "bubble"));
    scene.add_sphere(SphereDesc::new(Vec3::new(1.0, 0.0, -1.0), 0.5, "right"));

    scene
}

/// A field of small random spheres around three large ones.
///
/// The same seed always produces the same scene.
pub fn random_spheres(seed: u64) -> SceneDescription {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = SceneDescription::new();

    scene.camera = CameraSettings {
        vfov: 20.0,
        look_from: Vec3::new(13.0, 2.0, 3.0),
        look_at: Vec3::ZERO,
        vup: Vec3::Y,
        defocus_angle: 0.6,
        focus_dist: 10.0,
        samples_per_pixel: 100,
        max_depth: 50,
        ..CameraSettings::default()
    };

    scene.add_material(
        "ground",
        MaterialDesc::Lambertian {
            albedo: Color::splat(0.5),
        },
    );
    scene.add_material("glass", MaterialDesc::Dielectric { refraction_index: 1.5 });
    scene.add_sphere(SphereDesc::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, "ground"));

    let clearance = Vec3::new(4.0, 0.2, 0.0);
    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f64 = rng.gen();
            let center = Vec3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            if (center - clearance).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.95 {
                let name = format!("small_{}_{}", a + 11, b + 11);
                let material = if choose_mat < 0.8 {
                    let albedo = random_color(&mut rng, 0.0, 1.0) * random_color(&mut rng, 0.0, 1.0);
                    MaterialDesc::Lambertian { albedo }
                } else {
                    MaterialDesc::Metal {
                        albedo: random_color(&mut rng, 0.5, 1.0),
                        fuzz: rng.gen_range(0.0..0.5),
                    }
                };
                scene.add_material(name.clone(), material);
                scene.add_sphere(SphereDesc::new(center, 0.2, name));
            } else {
                scene.add_sphere(SphereDesc::new(center, 0.2, "glass"));
            }
        }
    }

    scene.add_material(
        "matte",
        MaterialDesc::Lambertian {
            albedo: Color::new(0.4, 0.2, 0.1),
        },
    );
    scene.add_material(
        "mirror",
        MaterialDesc::Metal {
            albedo: Color::new(0.7, 0.6, 0.5),
            fuzz: 0.0,
        },
    );
    scene.add_sphere(SphereDesc::new(Vec3::new(0.0, 1.0, 0.0), 1.0, "glass"));
    scene.add_sphere(SphereDesc::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, "matte"));
    scene.add_sphere(SphereDesc::new(Vec3::new(4.0, 1.0, 0.0), 1.0, "mirror"));

    scene
}

fn random_color(rng: &mut StdRng, min: f64, max: f64) -> Color {
    Color::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}
