//! Boundaries to the outside world.
//!
//! The control loop talks to cameras, keyboards and displays only through
//! these traits, so the decision pipeline can be driven by recorded frames
//! and observed through a recording sink.

use image::RgbImage;
use jumpcam_common::error::JumpcamResult;

use crate::keys::GameKey;
use crate::overlay::OverlayModel;

/// Supplies frames, one per cycle.
pub trait FrameSource: Send {
    /// Block until the next frame is available.
    ///
    /// `Ok(None)` means the source is exhausted. An error means this read
    /// failed; the loop treats both as the end of the stream.
    fn read(&mut self) -> JumpcamResult<Option<RgbImage>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Receives key presses and releases.
pub trait InputSink: Send {
    fn key_down(&mut self, key: GameKey) -> JumpcamResult<()>;

    fn key_up(&mut self, key: GameKey) -> JumpcamResult<()>;

    /// Sink name for logging.
    fn name(&self) -> &str;
}

/// Shows each frame with its overlay.
pub trait Presenter: Send {
    fn present(&mut self, frame: &RgbImage, overlay: &OverlayModel) -> JumpcamResult<()>;
}

/// Presenter that shows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: &RgbImage, _overlay: &OverlayModel) -> JumpcamResult<()> {
        Ok(())
    }
}
