//! Ember CLI - renders the demo scene to an image file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ember_core::{Mesh, RenderSettings};
use ember_math::{Color, Vec3};
use ember_renderer::{
    Camera, Coefficients, ConstantMaterial, GradientMaterial, PhongShader, PointLight,
    PolygonObject, Raytracer, Renderer, Scene, Shading, SimpleShader, SkyGradientEnvironment,
    Sphere,
};

/// Ember - tile-based CPU raytracer
#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Render the Ember demo scene to an image", long_about = None)]
struct Cli {
    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Worker threads (defaults to the number of available cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Maximum reflection depth
    #[arg(long)]
    depth: Option<u32>,

    /// Shading model
    #[arg(long, value_enum, default_value_t = ShaderKind::Phong)]
    shader: ShaderKind,

    /// Render unlit material colors
    #[arg(long)]
    no_lighting: bool,

    /// JSON render settings; flags override its values
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output image, format chosen by extension
    #[arg(short, long, default_value = "ember.png")]
    output: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ShaderKind {
    Simple,
    Phong,
}

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let start = Instant::now();
    let scene = Arc::new(build_demo_scene());
    log::info!(
        "Scene built in {:.2?}: {} objects, {} lights",
        start.elapsed(),
        scene.objects().len(),
        scene.lights().len()
    );

    let raytracer = match cli.shader {
        ShaderKind::Simple => Raytracer::new(scene, settings, SimpleShader),
        ShaderKind::Phong => Raytracer::new(scene, settings, PhongShader::default()),
    };

    let mut renderer = Renderer::new(raytracer);
    let framebuffer = renderer
        .start_rendering()
        .context("Failed to start render")?;

    while renderer.is_rendering() {
        thread::sleep(PROGRESS_INTERVAL);
        log::info!("Progress: {:.0}%", renderer.progress() * 100.0);
    }
    renderer.wait_for_finish().context("Render failed")?;

    save_bgr(&framebuffer.snapshot(), settings.width(), settings.height(), &cli.output)?;
    log::info!("Saved to {}", cli.output.display());

    Ok(())
}

/// Merge the optional settings file with command line overrides.
fn load_settings(cli: &Cli) -> Result<RenderSettings> {
    let mut settings = match &cli.settings {
        Some(path) => RenderSettings::from_json_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => {
            let cores = thread::available_parallelism().map_or(1, |n| n.get());
            RenderSettings::default().with_threads(cores)?
        }
    };

    if cli.width.is_some() || cli.height.is_some() {
        let width = cli.width.unwrap_or(settings.width());
        let height = cli.height.unwrap_or(settings.height());
        settings = settings
            .with_resolution(width, height)
            .context("Invalid resolution")?;
    }
    if let Some(threads) = cli.threads {
        settings = settings.with_threads(threads).context("Invalid thread count")?;
    }
    if let Some(depth) = cli.depth {
        settings = settings
            .with_recursion_depth(depth)
            .context("Invalid recursion depth")?;
    }
    if cli.no_lighting {
        settings = settings.with_lighting(false);
    }

    log::debug!("Render settings: {:?}", settings);
    Ok(settings)
}

/// Two spheres, a cube and a floor under two point lights.
fn build_demo_scene() -> Scene {
    let camera = Camera::looking_at(
        Vec3::new(0.0, 2.5, -8.0),
        Vec3::new(0.0, 0.8, 0.0),
        Vec3::Y,
        45.0,
    );
    let mut scene = Scene::new(SkyGradientEnvironment::default(), Arc::new(camera));

    let chrome = ConstantMaterial::new(Color::new(0.9, 0.9, 0.95))
        .with_coefficients(Coefficients::new(0.05, 0.25, 0.7, 0.8, 0.0));
    scene.add_object(Sphere::new(Vec3::new(-1.6, 1.0, 0.5), 1.0, Arc::new(chrome)));

    let gradient = GradientMaterial::new(Coefficients::new(0.1, 0.8, 0.3, 0.0, 0.0), Shading::Flat);
    scene.add_object(Sphere::new(Vec3::new(0.4, 0.6, -1.5), 0.6, Arc::new(gradient)));

    let clay = ConstantMaterial::new(Color::new(0.85, 0.35, 0.2))
        .with_coefficients(Coefficients::new(0.1, 0.8, 0.4, 0.0, 0.0))
        .with_shading(Shading::Smooth);
    scene.add_object(PolygonObject::from_mesh(
        &Mesh::cube(Vec3::new(1.4, 1.4, 1.4)),
        Arc::new(clay),
        Vec3::new(1.9, 0.7, 0.8),
    ));

    let floor = ConstantMaterial::new(Color::new(0.7, 0.7, 0.7))
        .with_coefficients(Coefficients::new(0.1, 0.9, 0.0, 0.15, 0.0));
    scene.add_object(PolygonObject::from_mesh(
        &Mesh::plane(20.0, 20.0),
        Arc::new(floor),
        Vec3::ZERO,
    ));

    scene.add_light(PointLight::new(Vec3::new(4.0, 8.0, -4.0), Color::splat(90.0)));
    scene.add_light(PointLight::new(Vec3::new(-5.0, 4.0, -3.0), Color::new(20.0, 22.0, 30.0)));

    scene
}

/// Write tightly packed BGR bytes to an image file.
fn save_bgr(bgr: &[u8], width: u32, height: u32, path: &Path) -> Result<()> {
    let rgb: Vec<u8> = bgr
        .chunks_exact(3)
        .flat_map(|pixel| [pixel[2], pixel[1], pixel[0]])
        .collect();

    let image = image::RgbImage::from_raw(width, height, rgb)
        .context("Framebuffer does not match the image resolution")?;
    image
        .save(path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(())
}
