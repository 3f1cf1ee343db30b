//! Best-effort haptic feedback.
//!
//! Only the countdown uses this channel. A missing or failing device is
//! never an error for the game: failures are logged at debug level and
//! dropped.

use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VibrationStyle {
    Light,
    Medium,
    Heavy,
    Rigid,
    Soft,
}

#[derive(Debug, thiserror::Error)]
pub enum HapticError {
    #[error("Haptic device unavailable")]
    Unavailable,

    #[error("Haptic output failed: {0}")]
    Io(#[from] std::io::Error),
}

pub trait HapticFeedback: Send + Sync {
    fn impact(&self, style: VibrationStyle) -> Result<(), HapticError>;
}

/// Fire a pulse and forget about it
pub fn pulse(haptics: &dyn HapticFeedback, style: VibrationStyle) {
    if let Err(e) = haptics.impact(style) {
        tracing::debug!("Ignoring haptic failure ({:?}): {}", style, e);
    }
}

/// Used when haptics are switched off
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn impact(&self, _style: VibrationStyle) -> Result<(), HapticError> {
        Err(HapticError::Unavailable)
    }
}

/// Rings the terminal bell; the closest thing a terminal has to a buzz
pub struct TerminalBell;

impl HapticFeedback for TerminalBell {
    fn impact(&self, style: VibrationStyle) -> Result<(), HapticError> {
        let rings = match style {
            VibrationStyle::Heavy | VibrationStyle::Rigid => 2,
            _ => 1,
        };
        let mut stdout = std::io::stdout().lock();
        for _ in 0..rings {
            stdout.write_all(b"\x07")?;
        }
        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<VibrationStyle>>);

    impl HapticFeedback for Recorder {
        fn impact(&self, style: VibrationStyle) -> Result<(), HapticError> {
            self.0.lock().unwrap().push(style);
            Ok(())
        }
    }

    #[test]
    fn test_pulse_swallows_failures() {
        pulse(&NoHaptics, VibrationStyle::Heavy);
    }

    #[test]
    fn test_pulse_reaches_device() {
        let recorder = Recorder(Mutex::new(Vec::new()));
        pulse(&recorder, VibrationStyle::Medium);
        pulse(&recorder, VibrationStyle::Heavy);
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![VibrationStyle::Medium, VibrationStyle::Heavy]
        );
    }
}
