//! Zone geometry and motion classification.
//!
//! Two lateral rectangles (left, right) sit at the vertical center of the
//! frame, inset from each edge by a margin. The jump zone is everything
//! above a horizontal line near the top.
//!
//! A region's centroid is tested against the lateral zones in a fixed
//! priority order, first match wins, so one region can never drive both
//! lateral keys. Left is tested before right. With the default ratios the
//! two rectangles cannot overlap, so the order only matters for custom
//! geometry; it is kept as a deterministic tie-break.

use jumpcam_common::config::ZoneSettings;
use serde::Serialize;

use crate::detector::MotionReport;
use crate::keys::GameKey;

/// Rectangle in frame pixels. Containment tests are strict on all edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ZoneRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the point lies strictly inside (edges excluded).
    pub fn contains_strict(&self, px: i32, py: i32) -> bool {
        self.x < px && px < self.x + self.width && self.y < py && py < self.y + self.height
    }
}

/// Zone geometry for one frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneLayout {
    pub frame_width: u32,
    pub frame_height: u32,
    pub left: ZoneRect,
    pub right: ZoneRect,
    pub jump_line_y: i32,
}

impl ZoneLayout {
    /// Derive the layout from ratios. Products are truncated to whole pixels.
    pub fn compute(frame_width: u32, frame_height: u32, settings: &ZoneSettings) -> Self {
        let w = frame_width as f64;
        let h = frame_height as f64;

        let zone_w = (w * settings.zone_width_ratio) as i32;
        let zone_h = (h * settings.zone_height_ratio) as i32;
        let margin_x = (w * settings.margin_x_ratio) as i32;
        let zone_y = (frame_height as i32 / 2) - (zone_h / 2);
        let right_x = frame_width as i32 - zone_w - margin_x;

        Self {
            frame_width,
            frame_height,
            left: ZoneRect::new(margin_x, zone_y, zone_w, zone_h),
            right: ZoneRect::new(right_x, zone_y, zone_w, zone_h),
            jump_line_y: (h * settings.jump_line_y_ratio) as i32,
        }
    }

    /// Lateral zones in classification priority order.
    pub fn lateral_zones(&self) -> [(GameKey, ZoneRect); 2] {
        [(GameKey::Left, self.left), (GameKey::Right, self.right)]
    }

    /// The lateral key whose zone claims this point, if any.
    pub fn lateral_key_at(&self, px: i32, py: i32) -> Option<GameKey> {
        self.lateral_zones()
            .into_iter()
            .find(|(_, rect)| rect.contains_strict(px, py))
            .map(|(key, _)| key)
    }
}

/// Per-frame zone signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ZoneSignals {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl ZoneSignals {
    pub fn get(&self, key: GameKey) -> bool {
        match key {
            GameKey::Left => self.left,
            GameKey::Right => self.right,
            GameKey::Jump => self.jump,
        }
    }

    pub fn set(&mut self, key: GameKey, value: bool) {
        match key {
            GameKey::Left => self.left = value,
            GameKey::Right => self.right = value,
            GameKey::Jump => self.jump = value,
        }
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.jump
    }
}

/// Maps motion reports onto zone signals.
#[derive(Debug, Clone)]
pub struct ZoneClassifier {
    settings: ZoneSettings,
}

impl ZoneClassifier {
    pub fn new(settings: &ZoneSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&ZoneSettings::default())
    }

    /// Geometry for a frame of the given size.
    pub fn layout(&self, frame_width: u32, frame_height: u32) -> ZoneLayout {
        ZoneLayout::compute(frame_width, frame_height, &self.settings)
    }

    /// Classify one frame's motion.
    ///
    /// Regions without a centroid can still trigger a jump but never a
    /// lateral zone.
    pub fn classify(&self, layout: &ZoneLayout, report: &MotionReport) -> ZoneSignals {
        let mut signals = ZoneSignals::default();
        if !report.found_significant_motion {
            return signals;
        }

        for region in &report.regions {
            let Some((cx, cy)) = region.centroid else {
                continue;
            };
            if let Some(key) = layout.lateral_key_at(cx, cy) {
                signals.set(key, true);
            }
        }

        signals.jump = (report.highest_motion_y as i64) < layout.jump_line_y as i64;
        signals
    }
}
