//! Core Types für den Nightlight
//!
//! Datenstrukturen ohne Hardware-Dependencies

/// Remote-Kommando vom Broker
///
/// Nur genau zwei Payloads werden erkannt (case-sensitive): `"on"` und `"off"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    On,
    Off,
}

impl Command {
    /// Dekodiert einen Payload als UTF-8 Text
    ///
    /// Unbekannte oder ungültige Payloads ergeben `None` (kein Fehler).
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        core::str::from_utf8(payload)
            .ok()
            .and_then(|text| Self::try_from(text).ok())
    }

    /// Zielwert für den RunState
    pub fn is_on(self) -> bool {
        matches!(self, Command::On)
    }
}

impl core::convert::TryFrom<&str> for Command {
    type Error = ();

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        match text {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => Err(()),
        }
    }
}

/// Logischer Pegel des Tasters (Pull-Down: losgelassen = low)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonLevel {
    #[default]
    Released,
    Pressed,
}

impl From<bool> for ButtonLevel {
    fn from(high: bool) -> Self {
        if high {
            ButtonLevel::Pressed
        } else {
            ButtonLevel::Released
        }
    }
}

/// Flanke zwischen zwei aufeinanderfolgenden Abfragen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// losgelassen → gedrückt
    Rising,
    /// gedrückt → losgelassen
    Falling,
}

/// Ausgelöste Rückmeldung des Button-Loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Pixel auf Zufallsfarbe, Ton an
    Activated,
    /// Pixel aus, Ton aus
    Cleared,
}

/// Ergebnis einer Iteration des Atem-Loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// RunState war false, nur gewartet
    Idle,
    /// Kompletter Zyklus hoch und runter
    Completed,
    /// RunState wurde während des Zyklus false, LED ausgeschaltet
    Interrupted,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Command::On => defmt::write!(fmt, "on"),
            Command::Off => defmt::write!(fmt, "off"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Edge {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Edge::Rising => defmt::write!(fmt, "Rising"),
            Edge::Falling => defmt::write!(fmt, "Falling"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CycleOutcome {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CycleOutcome::Idle => defmt::write!(fmt, "Idle"),
            CycleOutcome::Completed => defmt::write!(fmt, "Completed"),
            CycleOutcome::Interrupted => defmt::write!(fmt, "Interrupted"),
        }
    }
}
