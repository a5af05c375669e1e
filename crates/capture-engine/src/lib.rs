//! Jumpcam Capture Engine
//!
//! Frame sources feeding the motion pipeline.
//!
//! ```text
//! ┌──────────────────┐   ┌─────────────────────┐   ┌─────────────────┐
//! │ GstCameraSource  │   │ ImageSequenceSource │   │ SyntheticSource │
//! │ v4l2src→appsink  │   │ PNG/JPEG directory  │   │ scripted blocks │
//! └────────┬─────────┘   └──────────┬──────────┘   └────────┬────────┘
//!          └────────────────────────┼───────────────────────┘
//!                                   ▼
//!                        dyn FrameSource (RgbImage)
//! ```

pub mod camera;
pub mod device;
pub mod sequence;
pub mod synthetic;

pub use camera::{element_available, gstreamer_version, GstCameraSource, CAMERA_ELEMENTS};
pub use device::{detect_default_webcam_device, list_video_devices, VideoDevice};
pub use sequence::ImageSequenceSource;
pub use synthetic::{Scene, ScriptStep, SyntheticSource};
