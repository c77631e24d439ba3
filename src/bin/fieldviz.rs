use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use fieldviz::{FieldData, Visualizer, VizConfig};

#[derive(Parser, Debug)]
#[command(name = "fieldviz", version, about = "Contour plots and animations of u(x, y, t)")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one time step as a PNG.
    Static(StaticArgs),
    /// Animate every time step (GIF, falling back to MP4 via `ffmpeg`).
    Animate(AnimateArgs),
    /// Compose several time steps into one PNG grid.
    Snapshots(SnapshotsArgs),
    /// Write a static plot, an animation and a snapshot grid of the sample field.
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct DataArgs {
    /// JSON config file; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sample grid points along x.
    #[arg(long, default_value_t = 60)]
    nx: usize,

    /// Sample grid points along y.
    #[arg(long, default_value_t = 60)]
    ny: usize,

    /// Sample time steps.
    #[arg(long, default_value_t = 25)]
    nt: usize,
}

impl DataArgs {
    fn load(&self) -> anyhow::Result<(VizConfig, FieldData)> {
        let config = match &self.config {
            Some(path) => VizConfig::from_path(path)?,
            None => VizConfig::default(),
        };
        let data = fieldviz::field::sample::generate(self.nx, self.ny, self.nt)?;
        Ok((config, data))
    }
}

#[derive(Args, Debug)]
struct StaticArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Time index; negative counts from the end.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    time_index: isize,

    /// Plot title.
    #[arg(long, default_value = "PDE Solution")]
    title: String,

    /// Output PNG path.
    #[arg(long, default_value = "static_contour.png")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct AnimateArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Output path; `.mp4` prefers MP4, anything else GIF.
    #[arg(long, default_value = "pde_evolution.gif")]
    out: PathBuf,

    /// Frame interval in milliseconds (overrides the config).
    #[arg(long)]
    interval_ms: Option<u32>,

    /// Skip the preferred encoder.
    #[arg(long, default_value_t = false)]
    force_fallback: bool,
}

#[derive(Args, Debug)]
struct SnapshotsArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Comma-separated time indices (negative counts from the end).
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    indices: Option<Vec<isize>>,

    /// Output PNG path.
    #[arg(long, default_value = "snapshots.png")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct DemoArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Directory for the generated files.
    #[arg(long, default_value = "fieldviz_demo")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Static(args) => cmd_static(args),
        Command::Animate(args) => cmd_animate(args),
        Command::Snapshots(args) => cmd_snapshots(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_static(args: StaticArgs) -> anyhow::Result<()> {
    let (config, data) = args.data.load()?;
    let viz = Visualizer::new(config)?;
    viz.render_static(&data, args.time_index, &args.title, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let (mut config, data) = args.data.load()?;
    if let Some(ms) = args.interval_ms {
        config.interval_ms = ms;
    }
    config.force_fallback |= args.force_fallback;
    let viz = Visualizer::new(config)?;
    let artifact = viz.animate(&data, &args.out)?;
    if artifact.fallback {
        eprintln!(
            "wrote {} (fallback encoder '{}')",
            artifact.path.display(),
            artifact.encoder
        );
    } else {
        eprintln!("wrote {}", artifact.path.display());
    }
    Ok(())
}

fn cmd_snapshots(args: SnapshotsArgs) -> anyhow::Result<()> {
    let (mut config, data) = args.data.load()?;
    if let Some(indices) = args.indices {
        config.snapshot_indices = Some(indices);
    }
    let viz = Visualizer::new(config)?;
    viz.snapshots(&data, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let (config, data) = args.data.load()?;
    let out = |name: &str| -> PathBuf { Path::new(&args.out_dir).join(name) };

    let viz = Visualizer::new(config.clone())?;
    let t = 10.min(data.nt() as isize - 1);
    viz.render_static(&data, t, "PDE Solution", out("static_contour.png"))?;
    eprintln!("wrote {}", out("static_contour.png").display());

    let anim = Visualizer::new(VizConfig {
        levels: 25,
        interval_ms: 150,
        ..config
    })?;
    let artifact = anim.animate(&data, out("pde_evolution.gif"))?;
    eprintln!("wrote {}", artifact.path.display());

    viz.snapshots(&data, out("snapshots/snapshots.png"))?;
    eprintln!("wrote {}", out("snapshots/snapshots.png").display());
    Ok(())
}
