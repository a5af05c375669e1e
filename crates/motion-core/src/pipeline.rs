//! One frame cycle: detect, classify, debounce.

use image::RgbImage;
use jumpcam_common::config::{AppConfig, DebounceSettings, DetectorSettings, ZoneSettings};

use crate::debounce::DebounceBank;
use crate::detector::{MotionDetector, MotionReport};
use crate::keys::KeyTransition;
use crate::zones::{ZoneClassifier, ZoneLayout, ZoneSignals};

/// Everything decided during one cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub layout: ZoneLayout,

    /// `None` on warm-up cycles.
    pub report: Option<MotionReport>,

    pub signals: ZoneSignals,

    /// Key edges to forward to the input sink, in key order.
    pub transitions: Vec<KeyTransition>,
}

impl CycleOutcome {
    pub fn is_warmup(&self) -> bool {
        self.report.is_none()
    }
}

/// All state that persists between frames.
pub struct MotionPipeline {
    detector: MotionDetector,
    classifier: ZoneClassifier,
    debouncers: DebounceBank,
    cycles: u64,
}

impl MotionPipeline {
    pub fn new(
        detector: &DetectorSettings,
        zones: &ZoneSettings,
        debounce: &DebounceSettings,
    ) -> Self {
        Self {
            detector: MotionDetector::new(detector),
            classifier: ZoneClassifier::new(zones),
            debouncers: DebounceBank::new(debounce),
            cycles: 0,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.detector, &config.zones, &config.debounce)
    }

    pub fn with_defaults() -> Self {
        Self::from_config(&AppConfig::default())
    }

    /// Replace the debounce bank, e.g. to give one key its own thresholds.
    pub fn with_debouncers(mut self, debouncers: DebounceBank) -> Self {
        self.debouncers = debouncers;
        self
    }

    /// Run one cycle on the next frame.
    ///
    /// Warm-up cycles leave the debouncers untouched.
    pub fn process(&mut self, frame: &RgbImage) -> CycleOutcome {
        self.cycles += 1;
        let (width, height) = frame.dimensions();
        let layout = self.classifier.layout(width, height);

        let Some(report) = self.detector.detect(frame) else {
            return CycleOutcome {
                layout,
                report: None,
                signals: ZoneSignals::default(),
                transitions: Vec::new(),
            };
        };

        let signals = self.classifier.classify(&layout, &report);
        let transitions = self.debouncers.update(&signals);

        if !transitions.is_empty() {
            tracing::debug!(
                cycle = self.cycles,
                ?signals,
                regions = report.regions.len(),
                "Key transitions decided"
            );
        }

        CycleOutcome {
            layout,
            report: Some(report),
            signals,
            transitions,
        }
    }

    /// Force every held key up, returning a release for each key the
    /// debouncers considered held.
    pub fn release_all(&mut self) -> Vec<KeyTransition> {
        self.debouncers.release_all()
    }

    pub fn debouncers(&self) -> &DebounceBank {
        &self.debouncers
    }

    /// Cycles processed so far, warm-up included.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::GameKey;

    #[test]
    fn warmup_cycle_does_not_touch_debouncers() {
        let mut pipeline = MotionPipeline::with_defaults();
        let outcome = pipeline.process(&RgbImage::new(320, 240));
        assert!(outcome.is_warmup());
        assert!(outcome.transitions.is_empty());
        assert_eq!(pipeline.debouncers().state(GameKey::Left).counter(), 0);
        assert_eq!(pipeline.cycles(), 1);
    }

    #[test]
    fn still_cycles_count_down() {
        let mut pipeline = MotionPipeline::with_defaults();
        let frame = RgbImage::new(320, 240);
        pipeline.process(&frame);
        let outcome = pipeline.process(&frame);
        assert!(!outcome.is_warmup());
        assert!(!outcome.signals.any());
        assert_eq!(pipeline.debouncers().state(GameKey::Jump).counter(), -1);
    }

    #[test]
    fn layout_tracks_frame_size() {
        let mut pipeline = MotionPipeline::with_defaults();
        let outcome = pipeline.process(&RgbImage::new(640, 480));
        assert_eq!(outcome.layout.jump_line_y, 192);
        let outcome = pipeline.process(&RgbImage::new(320, 240));
        assert_eq!(outcome.layout.jump_line_y, 96);
        assert!(outcome.is_warmup());
    }
}
