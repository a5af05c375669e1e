//! Platforms without uinput.

use jumpcam_common::error::{JumpcamError, JumpcamResult};
use jumpcam_motion_core::{GameKey, InputSink};

pub struct UinputSink {
    _private: (),
}

impl UinputSink {
    pub fn new() -> JumpcamResult<Self> {
        Err(JumpcamError::unsupported(
            "Virtual keyboard injection is only implemented for Linux uinput",
        ))
    }

    pub fn is_supported() -> bool {
        false
    }
}

impl InputSink for UinputSink {
    fn key_down(&mut self, _key: GameKey) -> JumpcamResult<()> {
        Err(JumpcamError::unsupported("uinput"))
    }

    fn key_up(&mut self, _key: GameKey) -> JumpcamResult<()> {
        Err(JumpcamError::unsupported("uinput"))
    }

    fn name(&self) -> &str {
        "uinput"
    }
}

pub fn uinput_device_diagnostic() -> String {
    "uinput is not available on this platform".to_string()
}
