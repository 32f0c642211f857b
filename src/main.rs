use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use emoblob::App;
use emoblob::config::SceneConfig;
use emoblob::preset::EXPORT_FILE_NAME;
use emoblob::store::{FileStore, KeyValueStore, MemoryStore};
use emoblob::texture::Texture;

#[derive(Parser)]
#[command(name = "emoblob", about = "Headless driver for the emotion blob")]
struct Args {
    /// Frames to simulate.
    #[arg(short, long, default_value_t = 120)]
    frames: u32,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Preset to apply before running.
    #[arg(short, long)]
    preset: Option<String>,

    /// Control edit, e.g. `--set amplitude=0.4 --set modifier=Ribbed`.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    sets: Vec<String>,

    /// Texture file or data URL for both materials.
    #[arg(long)]
    texture: Option<String>,

    /// Save the current look as a preset after applying edits.
    #[arg(long)]
    save_as: Option<String>,

    /// Delete a preset.
    #[arg(long = "delete", value_name = "NAME")]
    deletes: Vec<String>,

    /// Write the preset collection as pretty JSON.
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = EXPORT_FILE_NAME)]
    export: Option<PathBuf>,

    /// Print preset names and controls, then exit.
    #[arg(long)]
    list: bool,

    /// Directory of the local preset store.
    #[arg(long, default_value = ".emoblob")]
    store: PathBuf,

    /// Keep presets in memory only.
    #[arg(long)]
    no_persist: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Mesh resolution (width and height segments).
    #[arg(long, default_value_t = 64)]
    segments: usize,

    /// Point cloud size.
    #[arg(long, default_value_t = 50_000)]
    points: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "emoblob=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = SceneConfig {
        width_segments: args.segments,
        height_segments: args.segments,
        point_count: args.points,
        seed: args.seed,
        ..SceneConfig::default()
    };
    let store: Box<dyn KeyValueStore> = if args.no_persist {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::new(&args.store))
    };

    let (mut app, timings) = App::new(&config, store);
    for t in &timings {
        info!("{:12} {:8.1} ms", t.name, t.ms);
    }

    if args.list {
        let active = app.controller.active().to_string();
        for name in app.controller.presets().names() {
            let marker = if name == active { "*" } else { " " };
            println!("{marker} {name}");
        }
        for control in app.controller.panel().controls() {
            println!(
                "  {:20} {:?} = {:?}",
                control.key,
                control.kind,
                control.value(app.controller.params())
            );
        }
        return Ok(());
    }

    let controller = &mut app.controller;
    let scene = &mut app.scene;

    if let Some(name) = &args.preset {
        controller.apply_preset(name, &mut *scene);
    }
    for assignment in &args.sets {
        if let Err(e) = controller.set_control_text(assignment, &mut *scene) {
            warn!(error = %e, "ignoring control edit");
        }
    }
    if let Some(source) = &args.texture {
        match Texture::load(source) {
            Ok(texture) => controller.set_texture(texture, &mut *scene),
            Err(e) => warn!(error = %e, "texture not loaded"),
        }
    }
    if let Some(name) = &args.save_as {
        if let Err(e) = controller.save_preset(name, &mut *scene) {
            warn!(error = %e, "preset not saved");
        }
    }
    for name in &args.deletes {
        if let Err(e) = controller.delete_preset(name, &mut *scene) {
            warn!(preset = %name, error = %e, "preset not deleted");
        }
    }

    let dt = 1.0 / args.fps.max(1.0);
    let report_every = (args.fps.round() as u32).max(1);
    let start = Instant::now();
    for frame in 1..=args.frames {
        app.tick(dt);
        if frame % report_every == 0 || frame == args.frames {
            let stats = app.scene.last_frame;
            info!(
                frame,
                t = app.blob.elapsed(),
                vertices = stats.vertices,
                min_r = stats.min_radius,
                max_r = stats.max_radius,
                "rendered"
            );
        }
    }
    let ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        frames = args.frames,
        preset = %app.controller.active(),
        "{:.2} ms/frame",
        ms / args.frames.max(1) as f64
    );

    if let Some(path) = &args.export {
        app.controller.export_presets_to(path)?;
    }
    Ok(())
}
