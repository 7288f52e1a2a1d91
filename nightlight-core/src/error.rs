//! Fehler-Typen des Nightlight-Cores
//!
//! Hardware-Fehler sind fatal: es gibt keinen sinnvollen Degraded-Mode für
//! ein Licht/Ton-Gerät, daher werden sie bis zum Scheduler propagiert.

use crate::traits::LedError;

/// Fehler beim Zugriff auf Ausgänge oder Eingänge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwError {
    /// PWM-Ausgang der Atem-LED
    Light,
    /// PWM-Ausgang des Buzzers
    Tone,
    /// SmartLED (Neopixel)
    Pixel(LedError),
    /// Taster-Eingang konnte nicht gelesen werden
    Button,
}

impl From<LedError> for HwError {
    fn from(e: LedError) -> Self {
        HwError::Pixel(e)
    }
}

/// Ergebnis des Schedulers: der erste Fehler, der einen der drei Loops beendet hat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault<T> {
    Hardware(HwError),
    Transport(T),
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for HwError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            HwError::Light => defmt::write!(fmt, "light PWM write failed"),
            HwError::Tone => defmt::write!(fmt, "tone PWM write failed"),
            HwError::Pixel(_) => defmt::write!(fmt, "pixel write failed"),
            HwError::Button => defmt::write!(fmt, "button read failed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<T: defmt::Format> defmt::Format for Fault<T> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Fault::Hardware(e) => defmt::write!(fmt, "hardware: {}", e),
            Fault::Transport(e) => defmt::write!(fmt, "transport: {}", e),
        }
    }
}
