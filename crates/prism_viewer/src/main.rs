use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use prism_core::{load_scene, save_scene, CameraSettings, SceneDescription};
use prism_renderer::{
    build_world, random_spheres, render_parallel, three_spheres, ParallelRender, World,
    DEFAULT_BUCKET_SIZE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod present;

/// Built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Ground, matte, hollow glass and rough metal spheres
    ThreeSpheres,
    /// Field of small random spheres around three large ones
    Random,
}

/// Render a sphere scene with the Prism path tracer.
#[derive(Debug, Parser)]
#[command(name = "prism", version, about)]
struct Args {
    /// Scene file (JSON). Overrides --preset.
    #[arg(long)]
    scene: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Preset::ThreeSpheres)]
    preset: Preset,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum ray bounces
    #[arg(long)]
    depth: Option<u32>,

    /// Render seed (also seeds the random preset)
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    bucket_size: u32,

    /// Render on one thread, pixel by pixel
    #[arg(long)]
    sequential: bool,

    /// Write the resolved scene description to this path
    #[arg(long)]
    dump_scene: Option<PathBuf>,

    /// Show the result in a window (requires the `window` feature)
    #[arg(long)]
    window: bool,
}

impl Args {
    fn load_description(&self) -> Result<SceneDescription> {
        match &self.scene {
            Some(path) => {
                load_scene(path).with_context(|| format!("Failed to load {}", path.display()))
            }
            None => Ok(match self.preset {
                Preset::ThreeSpheres => three_spheres(),
                Preset::Random => random_spheres(self.seed),
            }),
        }
    }

    fn apply_overrides(&self, settings: &mut CameraSettings) {
        if let Some(width) = self.width {
            settings.image_width = width;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            settings.max_depth = depth;
        }
    }

    fn parallel_options(&self) -> ParallelRender {
        ParallelRender {
            seed: self.seed,
            bucket_size: self.bucket_size,
            threads: self.threads,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let mut description = args.load_description()?;
    args.apply_overrides(&mut description.camera);

    if let Some(path) = &args.dump_scene {
        save_scene(path, &description)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Scene written to {}", path.display());
    }

    let World { objects, mut camera } = build_world(&description)?;
    camera.initialize()?;

    let image = if args.sequential {
        let mut rng = StdRng::seed_from_u64(args.seed);
        camera.render(&objects, &mut rng)?
    } else {
        render_parallel(&camera, &objects, &args.parallel_options(), None)?
    };

    image
        .save_png(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Image written to {}", args.output.display());

    if args.window {
        present::show(&image)?;
    }

    Ok(())
}
