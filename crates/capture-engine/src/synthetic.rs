//! Scripted scenes for exercising the pipeline without a camera.
//!
//! Each step shows one scene for a number of frames. Active scenes blink a
//! white block on and off every frame so that consecutive frames always
//! differ inside the target zone.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use jumpcam_common::config::ZoneSettings;
use jumpcam_common::error::JumpcamResult;
use jumpcam_motion_core::{FrameSource, ZoneLayout};
use serde::Serialize;

const BACKGROUND: Rgb<u8> = Rgb([40, 40, 40]);
const BLOCK: Rgb<u8> = Rgb([255, 255, 255]);

/// Where the moving subject is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    Idle,
    Left,
    Right,
    Jump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScriptStep {
    pub scene: Scene,
    pub frames: u32,
}

impl ScriptStep {
    pub fn new(scene: Scene, frames: u32) -> Self {
        Self { scene, frames }
    }
}

/// Frame source rendering a fixed script, then reporting end of stream.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    layout: ZoneLayout,
    script: Vec<ScriptStep>,
    step: usize,
    frame_in_step: u32,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, zones: &ZoneSettings, script: Vec<ScriptStep>) -> Self {
        Self {
            width,
            height,
            layout: ZoneLayout::compute(width, height, zones),
            script,
            step: 0,
            frame_in_step: 0,
        }
    }

    /// Idle, left, idle, right, idle, jump, idle.
    pub fn demo(width: u32, height: u32, zones: &ZoneSettings) -> Self {
        Self::new(width, height, zones, demo_script())
    }

    pub fn script(&self) -> &[ScriptStep] {
        &self.script
    }

    pub fn total_frames(&self) -> u64 {
        self.script.iter().map(|s| s.frames as u64).sum()
    }

    /// Render one frame of `scene`; `lit` selects the blink phase.
    pub fn render(&self, scene: Scene, lit: bool) -> RgbImage {
        let mut frame = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        if lit {
            if let Some(rect) = self.block_for(scene) {
                draw_filled_rect_mut(&mut frame, rect, BLOCK);
            }
        }
        frame
    }

    fn block_for(&self, scene: Scene) -> Option<Rect> {
        let zone_w = self.layout.left.width;
        let zone_h = self.layout.left.height;
        // Small enough that the blurred lateral blocks stay below the jump line.
        let side = (zone_w.min(zone_h) / 3).max(1);

        let (cx, cy) = match scene {
            Scene::Idle => return None,
            Scene::Left => center(&self.layout.left),
            Scene::Right => center(&self.layout.right),
            Scene::Jump => (self.width as i32 / 2, self.layout.jump_line_y / 2),
        };
        Some(Rect::at(cx - side / 2, cy - side / 2).of_size(side as u32, side as u32))
    }
}

impl FrameSource for SyntheticSource {
    fn read(&mut self) -> JumpcamResult<Option<RgbImage>> {
        while let Some(step) = self.script.get(self.step) {
            if self.frame_in_step < step.frames {
                let lit = self.frame_in_step % 2 == 1;
                self.frame_in_step += 1;
                return Ok(Some(self.render(step.scene, lit)));
            }
            self.step += 1;
            self.frame_in_step = 0;
            if let Some(next) = self.script.get(self.step) {
                tracing::debug!(scene = ?next.scene, frames = next.frames, "Synthetic scene");
            }
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

fn center(zone: &jumpcam_motion_core::ZoneRect) -> (i32, i32) {
    (zone.x + zone.width / 2, zone.y + zone.height / 2)
}

fn demo_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep::new(Scene::Idle, 10),
        ScriptStep::new(Scene::Left, 20),
        ScriptStep::new(Scene::Idle, 15),
        ScriptStep::new(Scene::Right, 20),
        ScriptStep::new(Scene::Idle, 15),
        ScriptStep::new(Scene::Jump, 10),
        ScriptStep::new(Scene::Idle, 15),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_plays_every_frame_then_ends() {
        let mut source = SyntheticSource::new(
            320,
            240,
            &ZoneSettings::default(),
            vec![ScriptStep::new(Scene::Left, 3), ScriptStep::new(Scene::Idle, 2)],
        );
        let mut count = 0;
        while source.read().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 5);
        assert_eq!(source.total_frames(), 5);
        assert!(source.read().unwrap().is_none());
    }

    #[test]
    fn left_block_sits_in_left_zone() {
        let source = SyntheticSource::demo(320, 240, &ZoneSettings::default());
        let frame = source.render(Scene::Left, true);
        // Left zone centre is (56, 120).
        assert_eq!(*frame.get_pixel(56, 120), BLOCK);
        assert_eq!(*frame.get_pixel(264, 120), BACKGROUND);
    }

    #[test]
    fn jump_block_is_above_the_line() {
        let source = SyntheticSource::demo(320, 240, &ZoneSettings::default());
        let frame = source.render(Scene::Jump, true);
        assert_eq!(*frame.get_pixel(160, 48), BLOCK);
        assert_eq!(*frame.get_pixel(160, 100), BACKGROUND);
    }

    #[test]
    fn idle_and_unlit_frames_are_background() {
        let source = SyntheticSource::demo(64, 48, &ZoneSettings::default());
        assert!(source.render(Scene::Idle, true).pixels().all(|p| *p == BACKGROUND));
        assert!(source.render(Scene::Left, false).pixels().all(|p| *p == BACKGROUND));
    }
}
