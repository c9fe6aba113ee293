//! Air Canvas command-line entry point

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use air_canvas::app::cli::{Cli, Commands};
use air_canvas::app::replay::replay;
use air_canvas::config::AppConfig;
use air_canvas::input::RecordingReader;
use air_canvas::CanvasController;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = AppConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;

    match cli.command {
        Commands::Replay { input, output } => run_replay(&input, &output, config),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn run_replay(input: &Path, output: &Path, mut config: AppConfig) -> anyhow::Result<()> {
    config.output.capture_dir = output.join("captures");
    let mut controller = CanvasController::new(&config)?;

    let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    info!("replaying {}", input.display());
    let summary = replay(&mut controller, RecordingReader::new(BufReader::new(file)))?;

    std::fs::create_dir_all(output).with_context(|| format!("creating {}", output.display()))?;
    let canvas_path = output.join("canvas.png");
    std::fs::write(&canvas_path, controller.surface().encode_png()?)
        .with_context(|| format!("writing {}", canvas_path.display()))?;
    let gallery = controller.gallery().export_to(&output.join("gallery"))?;

    info!(
        frames = summary.frames,
        rejected = summary.rejected,
        segments = summary.segments,
        snapshots = summary.snapshots,
        captures = summary.captures,
        "replay finished"
    );
    info!(
        "wrote {} and {} gallery image(s)",
        canvas_path.display(),
        gallery.len()
    );
    Ok(())
}
