//! The frame loop.
//!
//! Pulls frames, runs the pipeline, forwards key transitions and hands the
//! overlay to the presenter, one frame per cycle on the calling thread.
//! Whatever ends the loop, every key still held is released through the
//! sink before [`ControlLoop::run`] returns.
//!
//! "Held" means held according to the sink: a key counts as pressed only
//! once `key_down` succeeded, and stays pressed until a `key_up` succeeds.
//! A failed release during the run is retried at shutdown.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use jumpcam_common::clock::{FrameRateMeter, StatusTicker};
use jumpcam_common::error::{JumpcamError, JumpcamResult};
use serde::Serialize;

use crate::keys::{GameKey, KeyAction, KeyTransition};
use crate::overlay::OverlayModel;
use crate::pipeline::MotionPipeline;
use crate::ports::{FrameSource, InputSink, Presenter};

const STATUS_INTERVAL: Duration = Duration::from_secs(5);

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The stop flag was raised.
    StopRequested,
    /// The source reported no more frames.
    SourceExhausted,
    /// A frame read failed.
    SourceFailed,
    /// The configured frame limit was reached.
    FrameLimit,
}

/// Totals for one run of the loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub key_presses: u64,
    /// Releases decided by the debouncer or forced at shutdown.
    pub key_releases: u64,
    pub end_reason: EndReason,
    pub average_fps: f64,
}

#[derive(Debug, Default)]
struct LoopStats {
    frames: u64,
    presses: u64,
    releases: u64,
}

/// Owns the pipeline for the lifetime of one session.
pub struct ControlLoop {
    pipeline: MotionPipeline,
    stop_flag: Arc<AtomicBool>,
    max_frames: Option<u64>,
    /// Keys the sink has acknowledged as down.
    pressed: BTreeSet<GameKey>,
}

impl ControlLoop {
    pub fn new(pipeline: MotionPipeline) -> Self {
        Self {
            pipeline,
            stop_flag: Arc::new(AtomicBool::new(false)),
            max_frames: None,
            pressed: BTreeSet::new(),
        }
    }

    /// Stop after this many frames.
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Ask the loop to finish after the current cycle.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    pub fn pipeline(&self) -> &MotionPipeline {
        &self.pipeline
    }

    /// Keys currently down on the sink side.
    pub fn pressed_keys(&self) -> Vec<GameKey> {
        self.pressed.iter().copied().collect()
    }

    /// Run until stopped or the source ends, then release all held keys.
    ///
    /// Returns an error only if a held key could not be released.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn InputSink,
        presenter: &mut dyn Presenter,
    ) -> JumpcamResult<RunSummary> {
        tracing::info!(
            source = %source.name(),
            sink = %sink.name(),
            "Control loop started"
        );

        let mut stats = LoopStats::default();
        let mut meter = FrameRateMeter::start();
        let end_reason = self.drive(source, sink, presenter, &mut stats, &mut meter);
        let released = self.shutdown(sink, &mut stats);

        let summary = RunSummary {
            frames_processed: stats.frames,
            key_presses: stats.presses,
            key_releases: stats.releases,
            end_reason,
            average_fps: meter.average_fps(),
        };
        tracing::info!(
            frames = summary.frames_processed,
            presses = summary.key_presses,
            releases = summary.key_releases,
            reason = ?summary.end_reason,
            "Control loop stopped"
        );

        released.map(|()| summary)
    }

    fn drive(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn InputSink,
        presenter: &mut dyn Presenter,
        stats: &mut LoopStats,
        meter: &mut FrameRateMeter,
    ) -> EndReason {
        let mut ticker = StatusTicker::new(STATUS_INTERVAL);

        loop {
            if self.stop_flag.load(Ordering::SeqCst) {
                tracing::info!("Stop requested");
                return EndReason::StopRequested;
            }
            if self.max_frames.is_some_and(|limit| stats.frames >= limit) {
                return EndReason::FrameLimit;
            }

            let frame = match source.read() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::info!(source = %source.name(), "Frame source exhausted");
                    return EndReason::SourceExhausted;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Frame read failed; shutting down");
                    return EndReason::SourceFailed;
                }
            };

            let outcome = self.pipeline.process(&frame);
            for transition in &outcome.transitions {
                self.forward(sink, *transition, stats);
            }

            let overlay = OverlayModel::from_cycle(&outcome, self.pipeline.debouncers());
            if let Err(e) = presenter.present(&frame, &overlay) {
                tracing::warn!(error = %e, "Presenter failed");
            }

            stats.frames += 1;
            meter.record_frame();
            if ticker.should_tick(meter.elapsed().as_nanos() as u64) {
                tracing::info!(
                    frames = stats.frames,
                    fps = format!("{:.1}", meter.roll_window()),
                    held = ?self.pressed,
                    "Status"
                );
            }
        }
    }

    fn forward(
        &mut self,
        sink: &mut dyn InputSink,
        transition: KeyTransition,
        stats: &mut LoopStats,
    ) {
        let key = transition.key;
        let result = match transition.action {
            KeyAction::Down => sink.key_down(key),
            KeyAction::Up if self.pressed.contains(&key) => sink.key_up(key),
            KeyAction::Up => {
                tracing::debug!(key = %key, "Skipping release of a key the sink never pressed");
                return;
            }
        };
        match result {
            Ok(()) => {
                tracing::info!("{transition}");
                match transition.action {
                    KeyAction::Down => {
                        self.pressed.insert(key);
                        stats.presses += 1;
                    }
                    KeyAction::Up => {
                        self.pressed.remove(&key);
                        stats.releases += 1;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %transition.key, "Failed to send {transition}");
            }
        }
    }

    /// Release every key the sink still holds and reset the debouncers.
    /// Attempts all keys even if one fails and reports the first failure.
    fn shutdown(&mut self, sink: &mut dyn InputSink, stats: &mut LoopStats) -> JumpcamResult<()> {
        self.pipeline.release_all();
        let mut first_error: Option<JumpcamError> = None;

        for key in self.pressed_keys() {
            match sink.key_up(key) {
                Ok(()) => {
                    tracing::info!(key = %key, "Released held key on shutdown");
                    self.pressed.remove(&key);
                    stats.releases += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, key = %key, "Failed to release held key");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
