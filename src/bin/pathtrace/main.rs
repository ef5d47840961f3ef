//! pathtrace-host CLI - build a scene and run headless frames against the
//! recording backend.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use pathtrace_host::prelude::*;
use pathtrace_host::render::BackendCommand;
use tracing_subscriber::EnvFilter;

struct Args {
    scene: PathBuf,
    settings: Option<PathBuf>,
    assets: Option<PathBuf>,
    ticks: u32,
    accumulate: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "warn",
            "-h" | "--help" => {
                print_help();
                return;
            }
            _ => filtered_args.push(arg),
        }
    }
    init_tracing(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = parse_args(&filtered_args).and_then(|a| run(&a));
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over the command line level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn parse_args(args: &[&str]) -> anyhow::Result<Args> {
    let mut scene = None;
    let mut settings = None;
    let mut assets = None;
    let mut ticks = 60;
    let mut accumulate = false;

    let mut iter = args.iter();
    while let Some(&arg) = iter.next() {
        match arg {
            "--settings" | "-s" => settings = Some(PathBuf::from(value(&mut iter, arg)?)),
            "--assets" | "-a" => assets = Some(PathBuf::from(value(&mut iter, arg)?)),
            "--ticks" | "-n" => {
                let v = value(&mut iter, arg)?;
                ticks = v.parse().with_context(|| format!("invalid tick count '{v}'"))?;
            }
            "--accumulate" => accumulate = true,
            other if other.starts_with('-') => bail!("unknown option '{other}'"),
            other if scene.is_none() => scene = Some(PathBuf::from(other)),
            other => bail!("unexpected argument '{other}'"),
        }
    }

    let Some(scene) = scene else { bail!("missing scene file argument") };
    Ok(Args { scene, settings, assets, ticks, accumulate })
}

fn value<'a>(iter: &mut std::slice::Iter<'_, &'a str>, flag: &str) -> anyhow::Result<&'a str> {
    iter.next().copied().with_context(|| format!("{flag} expects a value"))
}

fn run(args: &Args) -> anyhow::Result<()> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Settings::load_or_default()?,
    };

    let desc = SceneDesc::load(&args.scene).with_context(|| format!("loading {}", args.scene.display()))?;
    let asset_root = match &args.assets {
        Some(dir) => dir.clone(),
        None => default_asset_root(&args.scene),
    };
    let assets = FsAssets::new(asset_root);

    let mut builder = SceneBuilder::new(&assets);
    let report = builder.build_from_desc(&desc).context("building scene")?;
    let scene = builder.into_buffers();

    let mut ctx = RendererContext::setup(settings, scene, RecordingBackend::new())?;
    if args.accumulate {
        ctx.set_accumulating(true);
    }

    let dt = 1.0 / 60.0;
    let input = InputState::default();
    let mut last = None;
    for _ in 0..args.ticks {
        last = Some(ctx.tick(dt, &input));
    }

    let scene = ctx.scene();
    let [tri_slots, mesh_slots, sphere_slots] = scene.slot_counts();
    println!("scene:    {}", args.scene.display());
    println!("models:   {}", report.models.len());
    println!("rooms:    {}", report.rooms.len());
    println!("triangles {:>8} records {:>10} floats", scene.triangles().len(), tri_slots);
    println!("meshes    {:>8} records {:>10} floats", scene.meshes().len(), mesh_slots);
    println!("spheres   {:>8} records {:>10} floats", scene.spheres().len(), sphere_slots);

    let backend = ctx.backend();
    let dispatches = backend.count(|c| matches!(c, BackendCommand::Dispatch { .. }));
    let clears = backend.count(|c| matches!(c, BackendCommand::ClearHistory));
    println!("ticks:    {} ({dispatches} dispatches, {clears} history clears)", args.ticks);
    if let Some(plan) = last {
        let mode = if plan.accumulating { "accumulating" } else { "preview" };
        println!("final:    {mode}, frame {}", plan.frame_count);
    }
    Ok(())
}

/// `<scene dir>/../meshes`, matching the `data/` layout.
fn default_asset_root(scene: &Path) -> PathBuf {
    scene
        .parent()
        .and_then(Path::parent)
        .map(|p| p.join("meshes"))
        .unwrap_or_else(|| PathBuf::from("meshes"))
}

fn print_help() {
    println!("pathtrace-host - scene packer and headless frame loop");
    println!();
    println!("USAGE:");
    println!("    pathtrace-host [OPTIONS] <scene.json>");
    println!();
    println!("OPTIONS:");
    println!("    -s, --settings <file>   Settings JSON (default: user config dir)");
    println!("    -a, --assets <dir>      Mesh directory (default: <scene dir>/../meshes)");
    println!("    -n, --ticks <N>         Frames to run (default: 60)");
    println!("        --accumulate        Start in accumulation mode");
    println!("    -v, --verbose           Show debug output");
    println!("    -vv, --trace            Show trace output (very verbose)");
    println!("    -q, --quiet             Warnings and errors only");
    println!();
    println!("EXAMPLES:");
    println!("    pathtrace-host data/scenes/room.json");
    println!("    pathtrace-host -n 500 --accumulate data/scenes/room.json");
}
