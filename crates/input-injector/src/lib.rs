//! Jumpcam Input Injector
//!
//! Turns key transitions into keyboard input. Sinks are pluggable:
//!
//! - **Uinput:** a virtual keyboard created through `/dev/uinput` (Linux,
//!   requires write access to the device)
//! - **Log:** dry run, transitions are only logged
//! - **Recording:** keeps every transition in memory for inspection

pub mod sinks;

pub use sinks::{
    detect_best_sink, uinput_device_diagnostic, LogSink, RecordingSink, SinkKind, UinputSink,
};
