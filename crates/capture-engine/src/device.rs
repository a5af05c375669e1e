//! V4L2 webcam discovery.
//!
//! Candidates are `/dev/video0` to `/dev/video15`. Each is scored from its
//! sysfs name and, when `v4l2-ctl` is installed, its reported capabilities.
//! Capture cards and tuners score zero.

use std::path::Path;

use serde::Serialize;

const MAX_VIDEO_NODES: u32 = 16;

const WEBCAM_KEYWORDS: &[&str] = &[
    "webcam",
    "camera",
    "cam",
    "facetime",
    "logitech",
    "microsoft",
    "creative",
    "razer",
    "elgato",
    "obs",
    "virtual",
    "v4l2loopback",
];

const NON_WEBCAM_KEYWORDS: &[&str] = &[
    "tuner",
    "tv",
    "dvb",
    "hdmi",
    "capture",
    "encoder",
    "decoder",
    "hauppauge",
    "blackmagic",
    "magewell",
];

/// A `/dev/videoN` node and how likely it is to be a webcam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoDevice {
    pub path: String,
    /// sysfs name, lowercased. Empty when unavailable.
    pub name: String,
    pub supports_capture: Option<bool>,
    pub priority: u32,
}

/// All existing video nodes, best webcam candidate first.
pub fn list_video_devices() -> Vec<VideoDevice> {
    let mut devices: Vec<VideoDevice> = (0..MAX_VIDEO_NODES)
        .filter_map(|idx| {
            let path = format!("/dev/video{idx}");
            if !Path::new(&path).exists() {
                return None;
            }

            let name = std::fs::read_to_string(format!("/sys/class/video4linux/video{idx}/name"))
                .unwrap_or_default()
                .trim()
                .to_lowercase();
            let supports_capture = probe_v4l2_capture_capability(&path);
            let priority = webcam_priority(&name, supports_capture);
            if priority == 0 && !name.is_empty() {
                tracing::debug!(device = %path, name = %name, "Skipping non-webcam V4L2 device");
            }

            Some(VideoDevice {
                path,
                name,
                supports_capture,
                priority,
            })
        })
        .collect();

    // Stable sort keeps node order among equal scores.
    devices.sort_by(|a, b| b.priority.cmp(&a.priority));
    devices
}

/// Pick the most webcam-like device, falling back to the first node found.
pub fn detect_default_webcam_device() -> Option<String> {
    let devices = list_video_devices();
    let best = devices.first()?;

    if best.priority == 0 {
        // No positive evidence for any node; take the lowest-numbered one.
        return devices
            .iter()
            .min_by_key(|d| video_index(&d.path))
            .map(|d| d.path.clone());
    }

    tracing::info!(
        device = %best.path,
        priority = best.priority,
        "Selected webcam device"
    );
    Some(best.path.clone())
}

/// Score a device from its name and capture capability. Zero means
/// "definitely not a webcam".
pub fn webcam_priority(name: &str, supports_capture: Option<bool>) -> u32 {
    let name = name.to_lowercase();
    if NON_WEBCAM_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        return 0;
    }

    let named_webcam = WEBCAM_KEYWORDS.iter().any(|kw| name.contains(kw));
    match (named_webcam, supports_capture) {
        (true, Some(true)) => 100,
        (true, _) => 80,
        (false, Some(true)) => 50,
        (false, Some(false)) => 0,
        (false, None) => 10,
    }
}

/// `Some(true)` if `v4l2-ctl --info` lists Video Capture, `None` if the tool
/// is missing.
fn probe_v4l2_capture_capability(dev_path: &str) -> Option<bool> {
    let output = std::process::Command::new("v4l2-ctl")
        .args(["--device", dev_path, "--info"])
        .output()
        .ok()?;

    if !output.status.success() {
        return Some(false);
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_lowercase();
    Some(stdout.contains("video capture"))
}

fn video_index(path: &str) -> u32 {
    path.trim_start_matches("/dev/video")
        .parse()
        .unwrap_or(u32::MAX)
}
