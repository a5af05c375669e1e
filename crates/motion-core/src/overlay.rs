//! Visual feedback: what a presenter should draw over the frame.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use serde::Serialize;

use crate::contour::BoundingBox;
use crate::debounce::DebounceBank;
use crate::keys::GameKey;
use crate::pipeline::CycleOutcome;
use crate::zones::{ZoneLayout, ZoneRect};

pub const HELD_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const IDLE_ZONE_COLOR: Rgb<u8> = Rgb([100, 100, 255]);
pub const IDLE_JUMP_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const REGION_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const STROKE: i32 = 2;

/// Snapshot of one cycle for display. Read-only: nothing drawn here feeds
/// back into decisions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayModel {
    pub layout: ZoneLayout,
    pub left_held: bool,
    pub right_held: bool,
    pub jump_held: bool,
    pub regions: Vec<BoundingBox>,
}

impl OverlayModel {
    pub fn from_cycle(outcome: &CycleOutcome, debouncers: &DebounceBank) -> Self {
        Self {
            layout: outcome.layout,
            left_held: debouncers.is_held(GameKey::Left),
            right_held: debouncers.is_held(GameKey::Right),
            jump_held: debouncers.is_held(GameKey::Jump),
            regions: outcome
                .report
                .as_ref()
                .map(|r| r.regions.iter().map(|region| region.bounds).collect())
                .unwrap_or_default(),
        }
    }

    pub fn is_held(&self, key: GameKey) -> bool {
        match key {
            GameKey::Left => self.left_held,
            GameKey::Right => self.right_held,
            GameKey::Jump => self.jump_held,
        }
    }
}

/// Draw zones, jump line and motion boxes onto `frame`.
pub fn draw_overlay(frame: &mut RgbImage, overlay: &OverlayModel) {
    for region in &overlay.regions {
        if region.width > 0 && region.height > 0 {
            let rect = Rect::at(region.x as i32, region.y as i32).of_size(region.width, region.height);
            draw_hollow_rect_mut(frame, rect, REGION_COLOR);
        }
    }

    let zone_color = |held: bool| if held { HELD_COLOR } else { IDLE_ZONE_COLOR };
    draw_zone(frame, &overlay.layout.left, zone_color(overlay.left_held));
    draw_zone(frame, &overlay.layout.right, zone_color(overlay.right_held));

    let jump_color = if overlay.jump_held {
        HELD_COLOR
    } else {
        IDLE_JUMP_COLOR
    };
    let right_edge = frame.width().saturating_sub(1) as f32;
    for offset in 0..STROKE {
        let y = (overlay.layout.jump_line_y + offset) as f32;
        draw_line_segment_mut(frame, (0.0, y), (right_edge, y), jump_color);
    }
}

fn draw_zone(frame: &mut RgbImage, zone: &ZoneRect, color: Rgb<u8>) {
    for inset in 0..STROKE {
        let width = zone.width - 2 * inset;
        let height = zone.height - 2 * inset;
        if width <= 0 || height <= 0 {
            break;
        }
        let rect = Rect::at(zone.x + inset, zone.y + inset).of_size(width as u32, height as u32);
        draw_hollow_rect_mut(frame, rect, color);
    }
}
