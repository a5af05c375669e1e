//! Virtual keyboard through the Linux uinput subsystem.

use std::collections::BTreeSet;
use std::os::unix::fs::MetadataExt;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};
use jumpcam_common::error::{JumpcamError, JumpcamResult};
use jumpcam_motion_core::{GameKey, InputSink};

const UINPUT_PATH: &str = "/dev/uinput";
const DEVICE_NAME: &str = "jumpcam virtual keyboard";

const KEY_PRESSED: i32 = 1;
const KEY_RELEASED: i32 = 0;

pub struct UinputSink {
    device: VirtualDevice,
    held: BTreeSet<GameKey>,
}

impl UinputSink {
    pub fn new() -> JumpcamResult<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for key in GameKey::ALL {
            keys.insert(evdev_key(key));
        }

        let device = VirtualDeviceBuilder::new()
            .and_then(|builder| builder.name(DEVICE_NAME).with_keys(&keys))
            .and_then(|builder| builder.build())
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    JumpcamError::permission_denied(format!(
                        "Cannot open {UINPUT_PATH}: {e}"
                    ))
                } else {
                    JumpcamError::input(format!("Failed to create virtual keyboard: {e}"))
                }
            })?;

        Ok(Self {
            device,
            held: BTreeSet::new(),
        })
    }

    pub fn is_supported() -> bool {
        std::fs::OpenOptions::new()
            .write(true)
            .open(UINPUT_PATH)
            .is_ok()
    }

    fn emit(&mut self, key: GameKey, value: i32) -> JumpcamResult<()> {
        let event = InputEvent::new(EventType::KEY, evdev_key(key).code(), value);
        self.device
            .emit(&[event])
            .map_err(|e| JumpcamError::input(format!("Failed to emit {}: {e}", key.key_name())))
    }
}

impl InputSink for UinputSink {
    fn key_down(&mut self, key: GameKey) -> JumpcamResult<()> {
        self.emit(key, KEY_PRESSED)?;
        self.held.insert(key);
        Ok(())
    }

    fn key_up(&mut self, key: GameKey) -> JumpcamResult<()> {
        self.emit(key, KEY_RELEASED)?;
        self.held.remove(&key);
        Ok(())
    }

    fn name(&self) -> &str {
        "uinput"
    }
}

impl Drop for UinputSink {
    fn drop(&mut self) {
        // Keys left down when the device disappears can stay stuck in the game.
        let held: Vec<GameKey> = self.held.iter().copied().collect();
        for key in held {
            if let Err(e) = self.key_up(key) {
                tracing::warn!(error = %e, key = %key, "Failed to release key on drop");
            }
        }
    }
}

fn evdev_key(key: GameKey) -> Key {
    match key {
        GameKey::Left => Key::KEY_LEFT,
        GameKey::Right => Key::KEY_RIGHT,
        GameKey::Jump => Key::KEY_SPACE,
    }
}

/// Describe why `/dev/uinput` may be unusable for this process.
pub fn uinput_device_diagnostic() -> String {
    let uid = unsafe { libc::geteuid() };
    let gid = unsafe { libc::getegid() };

    match std::fs::metadata(UINPUT_PATH) {
        Ok(meta) => {
            let mode = meta.mode() & 0o777;
            let owner = meta.uid();
            let group = meta.gid();
            format!(
                "device={UINPUT_PATH} mode={mode:o} owner_uid={owner} owner_gid={group} process_uid={uid} process_gid={gid}; write access is required. Fix: sudo usermod -aG input $USER and add a udev rule KERNEL==\"uinput\", GROUP=\"input\", MODE=\"0660\", then log out/in"
            )
        }
        Err(err) => format!(
            "device={UINPUT_PATH} unavailable ({err}); load the module with 'sudo modprobe uinput'"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_keys_map_to_arrow_keys_and_space() {
        assert_eq!(evdev_key(GameKey::Left), Key::KEY_LEFT);
        assert_eq!(evdev_key(GameKey::Right), Key::KEY_RIGHT);
        assert_eq!(evdev_key(GameKey::Jump), Key::KEY_SPACE);
    }

    #[test]
    fn diagnostic_names_the_device() {
        assert!(uinput_device_diagnostic().contains(UINPUT_PATH));
    }
}
