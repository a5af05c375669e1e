//! Frame differencing motion detector.
//!
//! Keeps the previous blurred frame and compares each new frame against it.
//! The very first frame (and any frame whose size differs from its
//! predecessor) only primes the reference and yields no report.

use image::{GrayImage, RgbImage};
use jumpcam_common::config::DetectorSettings;
use serde::Serialize;

use crate::contour::{external_regions, MotionRegion};
use crate::frame::{gaussian_kernel, motion_mask, preprocess};

/// Motion found between two consecutive frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionReport {
    /// Regions at or above the minimum contour area.
    pub regions: Vec<MotionRegion>,

    /// Smallest bounding-box top across `regions`, or the frame height
    /// when there are none.
    pub highest_motion_y: u32,

    pub found_significant_motion: bool,

    pub frame_width: u32,
    pub frame_height: u32,
}

impl MotionReport {
    /// Summarize significant regions for a frame of the given size.
    pub fn from_regions(regions: Vec<MotionRegion>, frame_width: u32, frame_height: u32) -> Self {
        let highest_motion_y = regions
            .iter()
            .map(|r| r.bounds.y)
            .min()
            .unwrap_or(frame_height);

        Self {
            found_significant_motion: !regions.is_empty(),
            regions,
            highest_motion_y,
            frame_width,
            frame_height,
        }
    }

    /// A report with no motion at all.
    pub fn still(frame_width: u32, frame_height: u32) -> Self {
        Self::from_regions(Vec::new(), frame_width, frame_height)
    }
}

/// Stateful detector comparing each frame with the one before it.
pub struct MotionDetector {
    settings: DetectorSettings,
    kernel: Vec<f32>,
    previous: Option<GrayImage>,
}

impl MotionDetector {
    pub fn new(settings: &DetectorSettings) -> Self {
        Self {
            kernel: gaussian_kernel(settings.blur_kernel_size),
            settings: settings.clone(),
            previous: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&DetectorSettings::default())
    }

    /// Feed the next raw frame.
    ///
    /// Returns `None` while warming up; otherwise the motion between the
    /// previous frame and this one. Either way this frame becomes the new
    /// reference.
    pub fn detect(&mut self, frame: &RgbImage) -> Option<MotionReport> {
        let current = preprocess(frame, &self.kernel);

        let report = match self.previous.as_ref() {
            Some(previous) if previous.dimensions() == current.dimensions() => {
                Some(self.compare(previous, &current))
            }
            Some(previous) => {
                tracing::debug!(
                    from = ?previous.dimensions(),
                    to = ?current.dimensions(),
                    "Frame size changed; re-priming motion reference"
                );
                None
            }
            None => {
                tracing::debug!("Priming motion reference with first frame");
                None
            }
        };

        self.previous = Some(current);
        report
    }

    fn compare(&self, previous: &GrayImage, current: &GrayImage) -> MotionReport {
        let mask = motion_mask(previous, current, self.settings.threshold_sensitivity);
        let regions: Vec<MotionRegion> = external_regions(&mask)
            .into_iter()
            .filter(|r| r.is_significant(self.settings.min_contour_area))
            .collect();

        tracing::trace!(
            regions = regions.len(),
            largest = regions.iter().map(|r| r.area).fold(0.0_f64, f64::max),
            "Frame compared"
        );

        MotionReport::from_regions(regions, current.width(), current.height())
    }

    /// Whether a reference frame is stored.
    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }

    /// Drop the reference frame; the next frame warms up again.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }
}
