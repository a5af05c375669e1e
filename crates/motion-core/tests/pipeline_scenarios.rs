//! End-to-end scenarios over synthetic 320x240 frames.
//!
//! At this size the left zone spans x 16..96, the right zone x 224..304
//! (both y 72..168) and the jump line sits at y 96.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use jumpcam_common::config::DebounceSettings;
use jumpcam_motion_core::{
    DebounceBank, GameKey, KeyAction, KeyTransition, MotionDetector, MotionPipeline,
};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;

fn blank() -> RgbImage {
    RgbImage::new(WIDTH, HEIGHT)
}

fn with_blocks(blocks: &[(i32, i32)]) -> RgbImage {
    let mut frame = blank();
    for &(x, y) in blocks {
        draw_filled_rect_mut(&mut frame, Rect::at(x, y).of_size(40, 40), Rgb([255, 255, 255]));
    }
    frame
}

const LEFT_BLOCK: (i32, i32) = (36, 110);
const RIGHT_BLOCK: (i32, i32) = (244, 110);
const HIGH_BLOCK: (i32, i32) = (140, 20);

/// `active` flickering frames followed by `still` identical blank frames.
fn flicker_then_still(blocks: &[(i32, i32)], active: usize, still: usize) -> Vec<RgbImage> {
    let lit = with_blocks(blocks);
    let mut frames: Vec<RgbImage> = (0..active)
        .map(|i| if i % 2 == 0 { blank() } else { lit.clone() })
        .collect();
    // Still frames repeat the last active frame exactly.
    let last = frames.last().cloned().unwrap_or_else(blank);
    frames.extend(std::iter::repeat(last).take(still));
    frames
}

fn transitions(pipeline: &mut MotionPipeline, frames: &[RgbImage]) -> Vec<(usize, KeyTransition)> {
    frames
        .iter()
        .enumerate()
        .flat_map(|(i, frame)| {
            pipeline
                .process(frame)
                .transitions
                .into_iter()
                .map(move |t| (i, t))
        })
        .collect()
}

#[test]
fn left_motion_presses_then_releases_left() {
    // Frame 0 warms up; frames 1 and 2 both show motion on the left.
    let frames = flicker_then_still(&[LEFT_BLOCK], 3, 8);
    let mut pipeline = MotionPipeline::with_defaults();

    let events = transitions(&mut pipeline, &frames);

    // Frame 3 is the first still frame, the release lands on the sixth (frame 8).
    assert_eq!(
        events,
        vec![
            (2, KeyTransition::down(GameKey::Left)),
            (8, KeyTransition::up(GameKey::Left)),
        ]
    );
}

#[test]
fn right_motion_presses_right_only() {
    let frames = flicker_then_still(&[RIGHT_BLOCK], 3, 0);
    let mut pipeline = MotionPipeline::with_defaults();

    let events = transitions(&mut pipeline, &frames);

    assert_eq!(events, vec![(2, KeyTransition::down(GameKey::Right))]);
    assert!(pipeline.debouncers().is_held(GameKey::Right));
    assert!(!pipeline.debouncers().is_held(GameKey::Left));
}

#[test]
fn motion_above_the_line_jumps() {
    let frames = flicker_then_still(&[HIGH_BLOCK], 3, 0);
    let mut pipeline = MotionPipeline::with_defaults();

    let events = transitions(&mut pipeline, &frames);

    assert_eq!(events, vec![(2, KeyTransition::down(GameKey::Jump))]);
}

#[test]
fn both_zones_press_in_key_order() {
    let frames = flicker_then_still(&[LEFT_BLOCK, RIGHT_BLOCK], 3, 0);
    let mut pipeline = MotionPipeline::with_defaults();

    let events = transitions(&mut pipeline, &frames);

    assert_eq!(
        events,
        vec![
            (2, KeyTransition::down(GameKey::Left)),
            (2, KeyTransition::down(GameKey::Right)),
        ]
    );
}

#[test]
fn short_still_gap_keeps_key_held() {
    let lit = with_blocks(&[LEFT_BLOCK]);
    let mut frames = flicker_then_still(&[LEFT_BLOCK], 3, 3);
    // Motion resumes before the counter reaches the bottom.
    frames.push(lit.clone());
    frames.push(blank());

    let mut pipeline = MotionPipeline::with_defaults();
    let events = transitions(&mut pipeline, &frames);

    assert_eq!(events, vec![(2, KeyTransition::down(GameKey::Left))]);
    assert!(pipeline.debouncers().is_held(GameKey::Left));
}

#[test]
fn identical_frames_yield_no_regions() {
    let mut detector = MotionDetector::with_defaults();
    let frame = with_blocks(&[LEFT_BLOCK, HIGH_BLOCK]);

    assert!(detector.detect(&frame).is_none());
    let report = detector.detect(&frame).unwrap();

    assert!(report.regions.is_empty());
    assert!(!report.found_significant_motion);
    assert_eq!(report.highest_motion_y, HEIGHT);
}

#[test]
fn changed_block_is_found_with_blurred_bounds() {
    let mut detector = MotionDetector::with_defaults();
    detector.detect(&blank());
    let report = detector.detect(&with_blocks(&[LEFT_BLOCK])).unwrap();

    assert_eq!(report.regions.len(), 1);
    let region = &report.regions[0];
    assert!(region.area >= 1600.0);
    let (cx, cy) = region.centroid.unwrap();
    assert!((cx - 56).abs() <= 1, "centroid x {cx}");
    assert!((cy - 130).abs() <= 1, "centroid y {cy}");
    assert!(region.bounds.y <= 110);
    assert!(report.highest_motion_y > 96);
}

#[test]
fn release_all_after_scenario_reports_held_keys() {
    let frames = flicker_then_still(&[LEFT_BLOCK, HIGH_BLOCK], 3, 0);
    let mut pipeline = MotionPipeline::with_defaults();
    transitions(&mut pipeline, &frames);

    let released = pipeline.release_all();
    assert_eq!(
        released,
        vec![KeyTransition::up(GameKey::Left), KeyTransition::up(GameKey::Jump)]
    );
    assert!(released.iter().all(|t| t.action == KeyAction::Up));
    assert!(pipeline.release_all().is_empty());
}

#[test]
fn tuned_jump_debouncer_reacts_on_first_motion_frame() {
    let bank = DebounceBank::new(&DebounceSettings::default()).with_key_thresholds(GameKey::Jump, 1, 4);
    let mut pipeline = MotionPipeline::with_defaults().with_debouncers(bank);
    let frames = flicker_then_still(&[HIGH_BLOCK], 2, 0);

    let events = transitions(&mut pipeline, &frames);

    assert_eq!(events, vec![(1, KeyTransition::down(GameKey::Jump))]);
}
