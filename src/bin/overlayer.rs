use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use overlayer::{
    Affordance, BackgroundRaster, ContainerBounds, DirAssetSource, DirSink, Editor, EditorConfig,
    ImageFile, NullView, OverlayTransform, PointerInput,
};

#[derive(Parser, Debug)]
#[command(name = "overlayer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flatten one overlay onto a background at an explicit placement.
    Compose(ComposeArgs),
    /// Replay a recorded gesture script through an editor session.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Background image.
    #[arg(long)]
    background: PathBuf,

    /// Overlay image.
    #[arg(long)]
    overlay: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Width of the container the background is fitted into.
    #[arg(long)]
    container_width: f64,

    /// Optional container height bound.
    #[arg(long)]
    container_height: Option<f64>,

    /// Overlay left edge, display pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    x: f64,

    /// Overlay top edge, display pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    y: f64,

    /// Overlay width, display pixels (default from config).
    #[arg(long)]
    width: Option<f64>,

    /// Overlay height, display pixels (default follows the overlay's aspect).
    #[arg(long)]
    height: Option<f64>,

    /// Clockwise rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotation: f64,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Gesture script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Output directory; the export lands here under the configured file name.
    #[arg(long)]
    out: PathBuf,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// A recorded editing session. Relative paths resolve against the script's
/// directory.
#[derive(serde::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct Script {
    background: PathBuf,
    /// Root the gallery paths are read from.
    #[serde(default)]
    assets_root: Option<PathBuf>,
    #[serde(default)]
    container: Option<ContainerBounds>,
    #[serde(default)]
    cheat_code: Option<String>,
    slot: usize,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Down {
        affordance: Affordance,
        x: f64,
        y: f64,
        #[serde(default)]
        touch: Option<u64>,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        touch: Option<u64>,
    },
    Up,
    /// Hide the overlay again.
    Clear,
}

fn pointer(x: f64, y: f64, touch: Option<u64>) -> PointerInput {
    match touch {
        Some(id) => PointerInput::touch(id, x, y),
        None => PointerInput::mouse(x, y),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn init_tracing() {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EditorConfig> {
    Ok(match path {
        Some(p) => EditorConfig::load(p)?,
        None => EditorConfig::default(),
    })
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let bounds = match args.container_height {
        Some(h) => ContainerBounds::new(args.container_width, h),
        None => ContainerBounds::width(args.container_width),
    };
    bounds.validate()?;

    let bg_file = ImageFile::read(&args.background)?;
    overlayer::check_image_mime(&bg_file.mime)?;
    let bg_image = overlayer::decode_image(&bg_file.bytes)?;
    let background = BackgroundRaster::fit(bg_image, bounds, bg_file.name)?;

    let overlay_file = ImageFile::read(&args.overlay)?;
    overlayer::check_image_mime(&overlay_file.mime)?;
    let overlay = overlayer::decode_image(&overlay_file.bytes)?;

    let width = args.width.unwrap_or(config.default_overlay_width_px);
    let mut transform = OverlayTransform::reset_with_aspect(width, Some(overlay.aspect()));
    transform.x = args.x;
    transform.y = args.y;
    if let Some(h) = args.height {
        transform.height = h;
    }
    transform.rotation_deg = args.rotation;
    if !transform.is_finite() || transform.width <= 0.0 || transform.height <= 0.0 {
        anyhow::bail!("overlay placement must be finite with a positive size");
    }

    let result = overlayer::compose(Some(&background), Some(&overlay), &transform)?;
    let png = result.encode_png()?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        result.width,
        result.height
    );
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("read script '{}'", args.script.display()))?;
    let script: Script = serde_json::from_str(&text)
        .with_context(|| format!("parse script '{}'", args.script.display()))?;
    let base = args
        .script
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bounds) = script.container {
        config.container = bounds;
    }

    let assets_root = base.join(script.assets_root.as_deref().unwrap_or(Path::new(".")));
    let mut editor = Editor::new(config, DirAssetSource::new(assets_root))?;

    editor.upload_background(ImageFile::read(&base.join(&script.background))?)?;
    editor.preload_gallery();
    let mut errors = editor.pump_blocking();
    if let Some(code) = &script.cheat_code
        && editor.type_cheat_code(code).is_some()
    {
        errors.extend(editor.pump_blocking());
    }
    if let Some(e) = errors.into_iter().next() {
        return Err(e.into());
    }

    if !editor.choose_overlay(script.slot)? {
        anyhow::bail!("gallery slot {} failed to load", script.slot);
    }

    let mut view = NullView;
    for step in &script.steps {
        match *step {
            Step::Down {
                affordance,
                x,
                y,
                touch,
            } => {
                editor.pointer_down(affordance, pointer(x, y, touch));
            }
            Step::Move { x, y, touch } => {
                editor.pointer_move(pointer(x, y, touch), &mut view);
            }
            Step::Up => {
                editor.pointer_up();
            }
            Step::Clear => editor.clear_overlay(),
        }
    }

    let mut sink = DirSink::new(args.out.clone());
    let receipt = editor.export(&mut sink)?;
    eprintln!(
        "wrote {} ({}x{})",
        sink.path_for(&receipt.file_name).display(),
        receipt.width,
        receipt.height
    );
    Ok(())
}
