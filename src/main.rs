use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use retro_dither::NamedPalette;
use retroloop::export::{render_still, EffectChain, ExportOutcome, ExportPlan, ExportScheduler};
use retroloop::models::{AppConfig, EffectMode, EffectOverrides, ExportFormat, Quality};
use retroloop::rendering::{write_png, LoopScene};
use retroloop::server;
use retroloop::services::{create_encoder, discard_partial_output};

#[derive(Parser)]
#[command(name = "retroloop")]
#[command(about = "Retroloop - generative loops through retro palette, dither and ASCII effects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP preview/export server
    Serve {
        /// Listen address (overrides BIND_ADDR and the config file)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Export the loop to MP4, WebM, GIF or a PNG sequence
    Export {
        /// Output file (directory for png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// mp4, webm, gif or png
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// good, excellent or maximum
        #[arg(short, long)]
        quality: Option<Quality>,

        /// Loop length in seconds
        #[arg(short, long)]
        duration: Option<f64>,

        /// Number of loops to export
        #[arg(long)]
        loops: Option<u32>,

        #[arg(long)]
        fps: Option<u32>,

        #[command(flatten)]
        frame: FrameArgs,

        #[command(flatten)]
        effects: EffectArgs,
    },
    /// Render one processed frame to a PNG file
    Still {
        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Scene time in seconds
        #[arg(short, long, default_value_t = 0.0)]
        time: f64,

        #[command(flatten)]
        frame: FrameArgs,

        #[command(flatten)]
        effects: EffectArgs,
    },
    /// List the built-in palettes
    Palettes,
}

#[derive(Args)]
struct FrameArgs {
    /// Output width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Scratch surface scale for dither effects, (0, 1]
    #[arg(long)]
    scratch_scale: Option<f32>,

    /// Scene seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct EffectArgs {
    /// none, dither or ascii
    #[arg(short, long, value_parser = parse_mode)]
    mode: Option<EffectMode>,

    /// Named palette (see `retroloop palettes`)
    #[arg(short, long)]
    palette: Option<String>,

    /// Custom palette as comma-separated hex RGB (e.g. "#000000,#FFFFFF,#FF004D")
    #[arg(long)]
    colors: Option<String>,

    /// bayer, floyd-steinberg, jarvis-judice-ninke, stucki or sierra
    #[arg(short, long)]
    algorithm: Option<String>,

    /// Dither strength, 0-1
    #[arg(short, long)]
    intensity: Option<f32>,

    /// Dither working resolution, 0.05-1
    #[arg(short, long)]
    resolution: Option<f32>,

    /// Pixelation block size
    #[arg(long)]
    pixel_size: Option<u32>,
}

impl EffectArgs {
    fn overrides(&self) -> EffectOverrides {
        EffectOverrides {
            mode: self.mode,
            palette: self.palette.clone(),
            colors: self.colors.as_ref().map(|c| {
                c.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
            algorithm: self.algorithm.clone(),
            intensity: self.intensity,
            resolution: self.resolution,
            pixel_size: self.pixel_size,
        }
    }
}

fn parse_mode(s: &str) -> Result<EffectMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "none" => Ok(EffectMode::None),
        "dither" => Ok(EffectMode::Dither),
        "ascii" => Ok(EffectMode::Ascii),
        other => Err(format!("unknown mode '{other}' (none, dither, ascii)")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => run_server(bind).await,
        Commands::Export {
            output,
            format,
            quality,
            duration,
            loops,
            fps,
            frame,
            effects,
        } => {
            init_cli_tracing();
            let mut config = AppConfig::load();
            apply_frame_args(&mut config, &frame);
            effects.overrides().apply(&mut config.effects);
            let export = &mut config.export;
            if let Some(v) = output {
                export.output = v;
            }
            if let Some(v) = format {
                export.format = v;
            }
            if let Some(v) = quality {
                export.quality = v;
            }
            if let Some(v) = duration {
                export.loop_duration = v;
            }
            if let Some(v) = loops {
                export.loop_count = v;
            }
            if let Some(v) = fps {
                export.fps = v;
            }
            run_export(config).await
        }
        Commands::Still {
            output,
            time,
            frame,
            effects,
        } => {
            init_cli_tracing();
            let mut config = AppConfig::load();
            apply_frame_args(&mut config, &frame);
            effects.overrides().apply(&mut config.effects);
            run_still(&config, &output, time)
        }
        Commands::Palettes => {
            run_palettes_command();
            Ok(())
        }
    }
}

/// Minimal logging for one-shot commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retroloop=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn apply_frame_args(config: &mut AppConfig, frame: &FrameArgs) {
    if let Some(v) = frame.width {
        config.export.width = v;
    }
    if let Some(v) = frame.height {
        config.export.height = v;
    }
    if let Some(v) = frame.scratch_scale {
        config.export.scratch_scale = v;
    }
    if let Some(v) = frame.seed {
        config.scene.seed = v;
    }
}

/// Export the loop without a server
async fn run_export(config: AppConfig) -> anyhow::Result<()> {
    let settings = &config.export;
    settings.validate()?;
    let plan = ExportPlan::new(settings.loop_duration, settings.loop_count, settings.fps)?;
    let chain = EffectChain::from_settings(&config.effects)?;
    let output = settings.resolved_output();
    let encoder = create_encoder(settings, &output)?;
    let scene = LoopScene::from_config(&config.scene, settings.loop_duration);

    let scheduler = ExportScheduler::new(
        plan,
        settings.width,
        settings.height,
        settings.scratch_scale,
        chain,
    );

    let abort = scheduler.abort_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            abort.abort();
        }
    });

    let mut progress = scheduler.subscribe();
    let reporter = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let p = *progress.borrow_and_update();
            eprint!(
                "\r{:>5.1}%  {}/{} frames",
                p.fraction * 100.0,
                p.frames,
                p.target_frames
            );
            if p.done {
                break;
            }
        }
        eprintln!();
    });

    let outcome = scheduler.run(scene, encoder).await;
    let _ = reporter.await;

    match outcome.with_context(|| format!("export to {} failed", output.display()))? {
        ExportOutcome::Completed { frames } => {
            println!("Exported {frames} frames to {}", output.display());
        }
        ExportOutcome::Cancelled { frames } => {
            discard_partial_output(&output);
            println!("Export cancelled after {frames} frames");
        }
    }

    Ok(())
}

/// Render one processed frame to a PNG file
fn run_still(config: &AppConfig, output: &Path, t: f64) -> anyhow::Result<()> {
    let mut scene = LoopScene::from_config(&config.scene, config.export.loop_duration);
    let frame = render_still(
        &mut scene,
        &config.effects,
        config.export.width,
        config.export.height,
        config.export.scratch_scale,
        t,
    )?;
    write_png(output, &frame)?;
    println!(
        "Rendered {} ({}x{}, t={t})",
        output.display(),
        frame.width(),
        frame.height()
    );
    Ok(())
}

fn run_palettes_command() {
    for named in NamedPalette::ALL {
        let colors: Vec<String> = named.colors().iter().map(|c| c.to_string()).collect();
        println!("{:<12} {:>2} colors  {}", named.name(), colors.len(), colors.join(" "));
    }
}

/// Run the HTTP server
async fn run_server(bind: Option<String>) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retroloop=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load();
    let bind_addr = bind
        .or_else(|| std::env::var("BIND_ADDR").ok())
        .unwrap_or_else(|| config.server.bind.clone());

    let state = server::create_app_state(config);
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Retroloop server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
