//! Run the pipeline over recorded frames.

use std::path::PathBuf;

use anyhow::Context;
use jumpcam_capture_engine::ImageSequenceSource;
use jumpcam_common::config::AppConfig;
use jumpcam_input_injector::{detect_best_sink, RecordingSink, SinkKind};
use jumpcam_motion_core::{ControlLoop, InputSink, MotionPipeline};

use crate::presenter::build_presenter;

pub async fn run(
    config: AppConfig,
    dir: PathBuf,
    mirror: bool,
    inject: bool,
    dump_dir: Option<PathBuf>,
    dump_every: u64,
) -> anyhow::Result<()> {
    let source = ImageSequenceSource::open(&dir, mirror)
        .with_context(|| format!("Could not open frames in {}", dir.display()))?;
    println!("Replaying {} frames from {}", source.len(), dir.display());

    let recorder = RecordingSink::new();
    let sink: Box<dyn InputSink> = if inject {
        detect_best_sink(SinkKind::Uinput)
    } else {
        Box::new(recorder.clone())
    };
    let presenter = build_presenter(dump_dir.as_deref(), dump_every)?;
    let control = ControlLoop::new(MotionPipeline::from_config(&config));

    let summary = super::drive(control, Box::new(source), sink, presenter, false).await?;

    if !inject {
        println!();
        for transition in recorder.transitions() {
            println!("  {transition}");
        }
    }
    super::print_summary(&summary);
    Ok(())
}
