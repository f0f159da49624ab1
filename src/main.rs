mod error;
mod format;
mod scene_file;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use error::CliError;
use format::FormattedDuration;

/// A CPU ray tracer: renders a JSON scene description to a PNG image.
#[derive(Parser, Debug)]
#[command(name = "raytracer", version, about)]
struct Args {
    /// Path to the scene description (JSON).
    scene: PathBuf,

    /// Path to write the rendered image (PNG).
    output: PathBuf,

    /// Number of render worker threads (defaults to all available cores).
    #[arg(short, long)]
    threads: Option<u32>,

    /// Raise the log level to debug.
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<(), CliError> {
    log::info!("loading scene from {}", args.scene.display());
    let load_start = Instant::now();
    let (scene, camera) = scene_file::load_scene(&args.scene)?;
    log::info!(
        "scene loaded and prepared in {}",
        FormattedDuration(load_start.elapsed())
    );

    log::info!(
        "rendering {}x{} image",
        camera.image_width(),
        camera.image_height()
    );
    let render_start = Instant::now();
    let image = raytracer_core::camera::render(&scene, &camera, args.threads);
    log::info!("render completed in {}", FormattedDuration(render_start.elapsed()));

    let buffer = image::RgbaImage::from_raw(camera.image_width(), camera.image_height(), image.as_raw().to_vec())
        .expect("image buffer dimensions must match pixel count");
    buffer.save(&args.output)?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
