//! Control the game from the live camera.

use std::path::PathBuf;

use anyhow::Context;
use jumpcam_capture_engine::GstCameraSource;
use jumpcam_common::config::AppConfig;
use jumpcam_input_injector::{detect_best_sink, SinkKind};
use jumpcam_motion_core::{ControlLoop, MotionPipeline};

use crate::presenter::build_presenter;

pub struct RunOptions {
    pub dry_run: bool,
    pub dump_dir: Option<PathBuf>,
    pub dump_every: u64,
    pub max_frames: Option<u64>,
}

pub async fn run(config: AppConfig, options: RunOptions) -> anyhow::Result<()> {
    let camera = &config.camera;
    println!("Starting jumpcam");
    println!(
        "  Camera: {}",
        camera.device.as_deref().unwrap_or("auto-detect")
    );
    println!(
        "  Mode: {}x{} @ {}fps{}",
        camera.width,
        camera.height,
        camera.fps,
        if camera.mirror { " (mirrored)" } else { "" }
    );
    println!(
        "  Debounce: {} frames to press, {} to release",
        config.debounce.frames_to_enter, config.debounce.frames_to_leave
    );
    println!();

    let source = GstCameraSource::open(camera).context("Could not open the camera")?;
    let kind = if options.dry_run {
        SinkKind::Log
    } else {
        SinkKind::Uinput
    };
    let sink = detect_best_sink(kind);
    let presenter = build_presenter(options.dump_dir.as_deref(), options.dump_every)?;

    let control =
        ControlLoop::new(MotionPipeline::from_config(&config)).with_max_frames(options.max_frames);

    println!("Move left, right, or raise your hands to jump.");
    println!("Press q + Enter or Ctrl+C to quit...");

    let summary = super::drive(control, Box::new(source), sink, presenter, true).await?;
    super::print_summary(&summary);
    Ok(())
}
