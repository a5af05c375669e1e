//! Live webcam frames through GStreamer.
//!
//! The pipeline decodes whatever the camera produces, scales and rate-limits
//! it to the configured size, optionally mirrors it, and hands packed RGB
//! frames to an `appsink` that keeps only the newest buffer.

use std::sync::OnceLock;

use gst::prelude::*;
use gstreamer as gst;
use image::RgbImage;
use jumpcam_common::config::CameraSettings;
use jumpcam_common::error::{JumpcamError, JumpcamResult};
use jumpcam_motion_core::FrameSource;

use crate::device::detect_default_webcam_device;

const APPSINK_NAME: &str = "sink";
const STATE_TIMEOUT_SECS: u64 = 10;
const PULL_TIMEOUT_SECS: u64 = 5;

/// Webcam source backed by a `v4l2src ! … ! appsink` pipeline.
pub struct GstCameraSource {
    name: String,
    pipeline: gst::Pipeline,
    appsink: gst::Element,
}

impl GstCameraSource {
    /// Open the configured device, or the best detected one, and start
    /// streaming.
    pub fn open(settings: &CameraSettings) -> JumpcamResult<Self> {
        let device = match settings.device.clone() {
            Some(device) => device,
            None => detect_default_webcam_device().ok_or_else(|| {
                JumpcamError::source_unavailable(
                    "No webcam device found (expected /dev/video0 or another /dev/video* node)",
                )
            })?,
        };

        let launch = camera_launch(&device, settings);
        tracing::debug!(%launch, "Building camera pipeline");
        let mut source = Self::from_launch(device, &launch)?;
        source.start()?;

        tracing::info!(
            device = %source.name,
            width = settings.width,
            height = settings.height,
            fps = settings.fps,
            mirror = settings.mirror,
            "Camera opened"
        );
        Ok(source)
    }

    /// Build (but do not start) a pipeline whose sink element is named `sink`.
    pub fn from_launch(name: impl Into<String>, launch: &str) -> JumpcamResult<Self> {
        init_gstreamer()?;

        let element = gst::parse::launch(launch).map_err(|e| {
            JumpcamError::source_unavailable(format!("Failed to build pipeline: {e}"))
        })?;

        let pipeline = element.dynamic_cast::<gst::Pipeline>().map_err(|_| {
            JumpcamError::source_unavailable("Launch string did not produce a pipeline")
        })?;

        let appsink = pipeline.by_name(APPSINK_NAME).ok_or_else(|| {
            JumpcamError::source_unavailable(format!(
                "Pipeline has no element named '{APPSINK_NAME}'"
            ))
        })?;

        Ok(Self {
            name: name.into(),
            pipeline,
            appsink,
        })
    }

    fn start(&mut self) -> JumpcamResult<()> {
        if let Err(e) = self.pipeline.set_state(gst::State::Playing) {
            let detail = self.bus_error().unwrap_or_else(|| format!("{e:?}"));
            let _ = self.pipeline.set_state(gst::State::Null);
            return Err(JumpcamError::source_unavailable(format!(
                "Failed to start camera {}: {detail}",
                self.name
            )));
        }

        // Live sources only report Playing once the device delivers.
        match self
            .pipeline
            .state(gst::ClockTime::from_seconds(STATE_TIMEOUT_SECS))
        {
            (Ok(_), gst::State::Playing, _) => Ok(()),
            (Ok(_), state, _) => {
                tracing::warn!(
                    device = %self.name,
                    ?state,
                    "Camera did not reach Playing state within timeout"
                );
                Ok(())
            }
            (Err(e), _, _) => {
                let detail = self.bus_error().unwrap_or_else(|| format!("{e:?}"));
                let _ = self.pipeline.set_state(gst::State::Null);
                Err(JumpcamError::source_unavailable(format!(
                    "Camera {} failed to reach Playing state: {detail}",
                    self.name
                )))
            }
        }
    }

    /// First pending error message on the bus, if any.
    fn bus_error(&self) -> Option<String> {
        let bus = self.pipeline.bus()?;
        let msg = bus.pop_filtered(&[gst::MessageType::Error])?;
        match msg.view() {
            gst::MessageView::Error(e) => Some(match e.debug() {
                Some(debug) => format!("{} ({debug})", e.error()),
                None => e.error().to_string(),
            }),
            _ => None,
        }
    }

    fn is_eos(&self) -> bool {
        self.appsink.property::<bool>("eos")
    }
}

impl FrameSource for GstCameraSource {
    fn read(&mut self) -> JumpcamResult<Option<RgbImage>> {
        let timeout = gst::ClockTime::from_seconds(PULL_TIMEOUT_SECS);
        let sample = self
            .appsink
            .emit_by_name::<Option<gst::Sample>>("try-pull-sample", &[&timeout]);

        let Some(sample) = sample else {
            if let Some(error) = self.bus_error() {
                return Err(JumpcamError::frame_read(format!("{}: {error}", self.name)));
            }
            if self.is_eos() {
                return Ok(None);
            }
            return Err(JumpcamError::frame_read(format!(
                "{}: no frame within {PULL_TIMEOUT_SECS}s",
                self.name
            )));
        };

        sample_to_rgb(&sample).map(Some)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for GstCameraSource {
    fn drop(&mut self) {
        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            tracing::warn!(device = %self.name, error = ?e, "Failed to stop camera pipeline");
        } else {
            tracing::debug!(device = %self.name, "Camera pipeline stopped");
        }
    }
}

/// Launch string for a V4L2 camera delivering packed RGB at the configured size.
pub fn camera_launch(device: &str, settings: &CameraSettings) -> String {
    let device = escape(device);
    let fps = settings.fps.max(1);
    let flip = if settings.mirror {
        " ! videoflip method=horizontal-flip"
    } else {
        ""
    };
    format!(
        "v4l2src device=\"{device}\" ! videoconvert ! videoscale ! videorate{flip} ! video/x-raw,format=RGB,width={w},height={h},framerate={fps}/1 ! appsink name={APPSINK_NAME} max-buffers=1 drop=true sync=false",
        w = settings.width,
        h = settings.height,
    )
}

/// Copy a packed-RGB sample into an image, dropping row padding.
fn sample_to_rgb(sample: &gst::Sample) -> JumpcamResult<RgbImage> {
    let caps = sample
        .caps()
        .ok_or_else(|| JumpcamError::frame_read("Sample has no caps"))?;
    let structure = caps
        .structure(0)
        .ok_or_else(|| JumpcamError::frame_read("Sample caps are empty"))?;
    let width = structure
        .get::<i32>("width")
        .map_err(|e| JumpcamError::frame_read(format!("Sample caps lack width: {e}")))?;
    let height = structure
        .get::<i32>("height")
        .map_err(|e| JumpcamError::frame_read(format!("Sample caps lack height: {e}")))?;

    let buffer = sample
        .buffer()
        .ok_or_else(|| JumpcamError::frame_read("Sample has no buffer"))?;
    let map = buffer
        .map_readable()
        .map_err(|e| JumpcamError::frame_read(format!("Failed to map buffer: {e}")))?;

    pack_rgb_rows(map.as_slice(), width.max(0) as u32, height.max(0) as u32)
}

/// GStreamer pads RGB rows to a 4-byte stride.
fn pack_rgb_rows(data: &[u8], width: u32, height: u32) -> JumpcamResult<RgbImage> {
    let row = width as usize * 3;
    let stride = (row + 3) & !3;
    let needed = stride * height.saturating_sub(1) as usize + row;
    if height == 0 || data.len() < needed {
        return Err(JumpcamError::frame_read(format!(
            "Buffer of {} bytes too small for {width}x{height} RGB",
            data.len()
        )));
    }

    let mut pixels = Vec::with_capacity(row * height as usize);
    for y in 0..height as usize {
        let start = y * stride;
        pixels.extend_from_slice(&data[start..start + row]);
    }

    RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| JumpcamError::frame_read("Frame buffer size mismatch"))
}

/// GStreamer version string, initializing the library if needed.
pub fn gstreamer_version() -> JumpcamResult<String> {
    init_gstreamer()?;
    Ok(gst::version_string().to_string())
}

/// Whether a GStreamer element factory is installed.
pub fn element_available(factory: &str) -> bool {
    init_gstreamer().is_ok() && gst::ElementFactory::find(factory).is_some()
}

/// Elements the camera pipeline is built from.
pub const CAMERA_ELEMENTS: &[&str] = &[
    "v4l2src",
    "videoconvert",
    "videoscale",
    "videorate",
    "videoflip",
    "appsink",
];

fn init_gstreamer() -> JumpcamResult<()> {
    static GST_INIT: OnceLock<Result<(), String>> = OnceLock::new();
    let init_res = GST_INIT.get_or_init(|| gst::init().map_err(|e| e.to_string()));
    match init_res {
        Ok(()) => Ok(()),
        Err(e) => Err(JumpcamError::source_unavailable(format!(
            "Failed to initialize GStreamer: {e}"
        ))),
    }
}

fn escape(value: &str) -> String {
    value.replace('"', "\\\"")
}
