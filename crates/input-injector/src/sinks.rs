//! Input sink implementations.

use std::sync::{Arc, Mutex};

use jumpcam_common::error::{JumpcamError, JumpcamResult};
use jumpcam_motion_core::{GameKey, InputSink, KeyAction, KeyTransition};
use serde::Serialize;

#[cfg(target_os = "linux")]
mod uinput;
#[cfg(target_os = "linux")]
pub use uinput::{uinput_device_diagnostic, UinputSink};

#[cfg(not(target_os = "linux"))]
mod non_linux;
#[cfg(not(target_os = "linux"))]
pub use non_linux::{uinput_device_diagnostic, UinputSink};

/// Which sink the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    Uinput,
    Log,
}

/// Dry-run sink: logs each transition and injects nothing.
#[derive(Debug, Default)]
pub struct LogSink {
    sent: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions logged so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl InputSink for LogSink {
    fn key_down(&mut self, key: GameKey) -> JumpcamResult<()> {
        self.sent += 1;
        tracing::info!(key = key.key_name(), "[dry-run] {}", KeyTransition::down(key));
        Ok(())
    }

    fn key_up(&mut self, key: GameKey) -> JumpcamResult<()> {
        self.sent += 1;
        tracing::info!(key = key.key_name(), "[dry-run] {}", KeyTransition::up(key));
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Keeps every transition it receives. Clones share the same log, so a
/// test can hand one clone to the loop and read the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Arc<Mutex<Vec<KeyTransition>>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every call fails without recording.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn transitions(&self) -> Vec<KeyTransition> {
        match self.log.lock() {
            Ok(log) => log.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Keys pressed and not yet released, in press order.
    pub fn held(&self) -> Vec<GameKey> {
        let mut held = Vec::new();
        for t in self.transitions() {
            match t.action {
                KeyAction::Down => held.push(t.key),
                KeyAction::Up => held.retain(|k| *k != t.key),
            }
        }
        held
    }

    fn record(&mut self, transition: KeyTransition) -> JumpcamResult<()> {
        if self.fail {
            return Err(JumpcamError::input(format!("recording sink rejected {transition}")));
        }
        self.log
            .lock()
            .map_err(|_| JumpcamError::input("recording sink lock poisoned"))?
            .push(transition);
        Ok(())
    }
}

impl InputSink for RecordingSink {
    fn key_down(&mut self, key: GameKey) -> JumpcamResult<()> {
        self.record(KeyTransition::down(key))
    }

    fn key_up(&mut self, key: GameKey) -> JumpcamResult<()> {
        self.record(KeyTransition::up(key))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Open the requested sink. A uinput request falls back to the log sink
/// when the virtual keyboard cannot be created.
pub fn detect_best_sink(kind: SinkKind) -> Box<dyn InputSink> {
    if kind == SinkKind::Log {
        tracing::info!("Dry run: key transitions will only be logged");
        return Box::new(LogSink::new());
    }

    match UinputSink::new() {
        Ok(sink) => {
            tracing::info!("Using uinput virtual keyboard");
            Box::new(sink)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                details = %uinput_device_diagnostic(),
                "Using log sink, key presses will not reach the game"
            );
            Box::new(LogSink::new())
        }
    }
}
