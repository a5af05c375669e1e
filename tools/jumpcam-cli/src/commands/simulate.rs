//! Run the built-in synthetic scene.

use std::path::PathBuf;

use jumpcam_capture_engine::SyntheticSource;
use jumpcam_common::config::AppConfig;
use jumpcam_input_injector::RecordingSink;
use jumpcam_motion_core::{ControlLoop, MotionPipeline};

use crate::presenter::build_presenter;

pub async fn run(
    config: AppConfig,
    width: u32,
    height: u32,
    dump_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let source = SyntheticSource::demo(width, height, &config.zones);
    println!("Synthetic scene ({width}x{height}):");
    for step in source.script() {
        println!("  {:?} for {} frames", step.scene, step.frames);
    }

    let recorder = RecordingSink::new();
    let presenter = build_presenter(dump_dir.as_deref(), 1)?;
    let control = ControlLoop::new(MotionPipeline::from_config(&config));

    let summary = super::drive(
        control,
        Box::new(source),
        Box::new(recorder.clone()),
        presenter,
        false,
    )
    .await?;

    println!();
    println!("Key transitions:");
    for transition in recorder.transitions() {
        println!("  {transition}");
    }
    super::print_summary(&summary);
    Ok(())
}
