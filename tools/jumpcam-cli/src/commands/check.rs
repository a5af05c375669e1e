//! Check camera and key injection support.

use jumpcam_capture_engine::{
    element_available, gstreamer_version, list_video_devices, CAMERA_ELEMENTS,
};
use jumpcam_common::config::config_file_path;
use jumpcam_input_injector::{uinput_device_diagnostic, UinputSink};

pub fn run() -> anyhow::Result<()> {
    println!("jumpcam System Check");
    println!("{}", "=".repeat(50));

    let mut ready = true;

    // GStreamer
    match gstreamer_version() {
        Ok(version) => println!("[OK] {version}"),
        Err(e) => {
            println!("[FAIL] GStreamer: {e}");
            ready = false;
        }
    }
    for element in CAMERA_ELEMENTS {
        if element_available(element) {
            println!("[OK] GStreamer element: {element}");
        } else {
            println!("[FAIL] GStreamer element missing: {element}");
            ready = false;
        }
    }

    // Cameras
    let devices = list_video_devices();
    if devices.is_empty() {
        println!("[FAIL] No /dev/video* devices found");
        ready = false;
    } else {
        println!("[OK] Video devices detected: {}", devices.len());
        for d in &devices {
            println!(
                "     {} {} (score: {}){}",
                d.path,
                if d.name.is_empty() { "<unnamed>" } else { d.name.as_str() },
                d.priority,
                if d.priority == 0 { " skipped" } else { "" }
            );
        }
    }

    // Key injection
    if UinputSink::is_supported() {
        println!("[OK] /dev/uinput is writable");
    } else {
        println!("[WARN] Cannot write /dev/uinput; keys will only be logged");
        println!("     {}", uinput_device_diagnostic());
    }

    // Configuration
    let config_path = config_file_path();
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!(
            "[OK] Config: defaults ({} not found)",
            config_path.display()
        );
    }

    println!();
    if ready {
        println!("Camera capture is available. jumpcam is ready.");
    } else {
        println!("Camera capture is not available. See above for details.");
    }

    Ok(())
}
