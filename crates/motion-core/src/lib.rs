//! Jumpcam Motion Core: the motion-to-input decision pipeline
//!
//! Turns a stream of webcam frames into stable key transitions:
//! - **Motion detection:** blur, difference and threshold consecutive frames,
//!   then trace external contours into [`MotionRegion`]s
//! - **Zone classification:** map regions onto the left/right zones and the
//!   jump line
//! - **Debouncing:** per-key hysteresis counters that emit exactly one
//!   key-down or key-up per stable change
//!
//! The decision pipeline is pure computation. Frame acquisition, key
//! injection and presentation are reached only through the traits in
//! [`ports`], driven by the [`ControlLoop`].

pub mod contour;
pub mod controller;
pub mod debounce;
pub mod detector;
pub mod frame;
pub mod keys;
pub mod overlay;
pub mod pipeline;
pub mod ports;
pub mod zones;

pub use contour::{BoundingBox, MotionRegion};
pub use controller::{ControlLoop, EndReason, RunSummary};
pub use debounce::{DebounceBank, KeyDebouncer};
pub use detector::{MotionDetector, MotionReport};
pub use keys::{GameKey, KeyAction, KeyTransition};
pub use overlay::{draw_overlay, OverlayModel};
pub use pipeline::{CycleOutcome, MotionPipeline};
pub use ports::{FrameSource, InputSink, NullPresenter, Presenter};
pub use zones::{ZoneClassifier, ZoneLayout, ZoneRect, ZoneSignals};
