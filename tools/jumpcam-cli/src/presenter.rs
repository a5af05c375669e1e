//! Presenters available from the command line.

use std::path::{Path, PathBuf};

use image::RgbImage;
use jumpcam_common::error::{JumpcamError, JumpcamResult};
use jumpcam_motion_core::{draw_overlay, NullPresenter, OverlayModel, Presenter};

/// Writes every Nth frame, with the overlay drawn on it, as a PNG.
pub struct FrameDumpPresenter {
    dir: PathBuf,
    every: u64,
    seen: u64,
    written: u64,
}

impl FrameDumpPresenter {
    pub fn new(dir: &Path, every: u64) -> JumpcamResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            every: every.max(1),
            seen: 0,
            written: 0,
        })
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl Presenter for FrameDumpPresenter {
    fn present(&mut self, frame: &RgbImage, overlay: &OverlayModel) -> JumpcamResult<()> {
        let index = self.seen;
        self.seen += 1;
        if index % self.every != 0 {
            return Ok(());
        }

        let mut annotated = frame.clone();
        draw_overlay(&mut annotated, overlay);

        let path = self.dir.join(format!("frame_{index:06}.png"));
        annotated
            .save(&path)
            .map_err(|e| JumpcamError::presenter(format!("{}: {e}", path.display())))?;
        self.written += 1;
        Ok(())
    }
}

/// The dump presenter when a directory was given, otherwise nothing.
pub fn build_presenter(dump_dir: Option<&Path>, every: u64) -> JumpcamResult<Box<dyn Presenter>> {
    match dump_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), every, "Dumping annotated frames");
            Ok(Box::new(FrameDumpPresenter::new(dir, every)?))
        }
        None => Ok(Box::new(NullPresenter)),
    }
}
