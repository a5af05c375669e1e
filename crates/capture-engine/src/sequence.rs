//! Replay a directory of still frames.

use std::path::{Path, PathBuf};

use image::RgbImage;
use jumpcam_common::error::{JumpcamError, JumpcamResult};
use jumpcam_motion_core::FrameSource;

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Frames read from image files in lexicographic file-name order.
pub struct ImageSequenceSource {
    name: String,
    frames: Vec<PathBuf>,
    next: usize,
    mirror: bool,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path, mirror: bool) -> JumpcamResult<Self> {
        if !dir.is_dir() {
            return Err(JumpcamError::FileNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_frame_file(path))
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(JumpcamError::source_unavailable(format!(
                "No image frames in {}",
                dir.display()
            )));
        }

        tracing::info!(dir = %dir.display(), frames = frames.len(), "Opened frame sequence");
        Ok(Self {
            name: dir.display().to_string(),
            frames,
            next: 0,
            mirror,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn read(&mut self) -> JumpcamResult<Option<RgbImage>> {
        let Some(path) = self.frames.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;

        let frame = image::open(path)
            .map_err(|e| JumpcamError::frame_read(format!("{}: {e}", path.display())))?
            .to_rgb8();

        Ok(Some(if self.mirror {
            image::imageops::flip_horizontal(&frame)
        } else {
            frame
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            FRAME_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
