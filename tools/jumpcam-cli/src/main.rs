//! jumpcam CLI: play a platformer by moving in front of the webcam.
//!
//! Usage:
//!   jumpcam run [OPTIONS]      Control the game from the live camera
//!   jumpcam replay <DIR>       Run the pipeline over recorded frames
//!   jumpcam simulate           Run the built-in synthetic scene
//!   jumpcam check              Check camera and key injection support
//!   jumpcam config [--write]   Show or write the effective configuration

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use jumpcam_common::config::AppConfig;

mod commands;
mod presenter;

#[derive(Parser)]
#[command(
    name = "jumpcam",
    about = "Turn webcam motion into arrow-key and space-bar presses",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the standard location
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Control the game from the live camera
    Run {
        /// V4L2 device, e.g. /dev/video0 (auto-detected by default)
        #[arg(short, long)]
        device: Option<String>,

        /// Capture width
        #[arg(long)]
        width: Option<u32>,

        /// Capture height
        #[arg(long)]
        height: Option<u32>,

        /// Capture frame rate
        #[arg(long)]
        fps: Option<u32>,

        /// Keep the raw camera orientation instead of the selfie view
        #[arg(long)]
        no_mirror: bool,

        /// Log key transitions instead of injecting them
        #[arg(long)]
        dry_run: bool,

        /// Write annotated frames to this directory
        #[arg(long)]
        dump_dir: Option<PathBuf>,

        /// Write every Nth frame when dumping
        #[arg(long, default_value = "15")]
        dump_every: u64,

        /// Stop after this many frames
        #[arg(long)]
        max_frames: Option<u64>,
    },

    /// Run the pipeline over a directory of recorded frames
    Replay {
        /// Directory of PNG/JPEG frames, played in file-name order
        dir: PathBuf,

        /// Mirror frames before processing
        #[arg(long)]
        mirror: bool,

        /// Inject keys through uinput instead of only logging them
        #[arg(long)]
        inject: bool,

        /// Write annotated frames to this directory
        #[arg(long)]
        dump_dir: Option<PathBuf>,

        /// Write every Nth frame when dumping
        #[arg(long, default_value = "1")]
        dump_every: u64,
    },

    /// Run the built-in synthetic scene and report the key transitions
    Simulate {
        /// Frame width
        #[arg(long, default_value = "320")]
        width: u32,

        /// Frame height
        #[arg(long, default_value = "240")]
        height: u32,

        /// Write annotated frames to this directory
        #[arg(long)]
        dump_dir: Option<PathBuf>,
    },

    /// Check camera and key injection support
    Check,

    /// Show the effective configuration
    Config {
        /// Save it to the standard location
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    jumpcam_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Run {
            device,
            width,
            height,
            fps,
            no_mirror,
            dry_run,
            dump_dir,
            dump_every,
            max_frames,
        } => {
            let camera = &mut config.camera;
            if device.is_some() {
                camera.device = device;
            }
            camera.width = width.unwrap_or(camera.width);
            camera.height = height.unwrap_or(camera.height);
            camera.fps = fps.unwrap_or(camera.fps);
            if no_mirror {
                camera.mirror = false;
            }
            config.validate()?;

            commands::run::run(
                config,
                commands::run::RunOptions {
                    dry_run,
                    dump_dir,
                    dump_every,
                    max_frames,
                },
            )
            .await
        }
        Commands::Replay {
            dir,
            mirror,
            inject,
            dump_dir,
            dump_every,
        } => commands::replay::run(config, dir, mirror, inject, dump_dir, dump_every).await,
        Commands::Simulate {
            width,
            height,
            dump_dir,
        } => commands::simulate::run(config, width, height, dump_dir).await,
        Commands::Check => commands::check::run(),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "jumpcam",
            "--verbose",
            "run",
            "--dry-run",
            "--no-mirror",
            "--max-frames",
            "90",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run {
                dry_run,
                no_mirror,
                max_frames,
                dump_every,
                ..
            } => {
                assert!(dry_run);
                assert!(no_mirror);
                assert_eq!(max_frames, Some(90));
                assert_eq!(dump_every, 15);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn replay_requires_a_directory() {
        assert!(Cli::try_parse_from(["jumpcam", "replay"]).is_err());
    }
}
