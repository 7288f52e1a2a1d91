//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::types::{ButtonLevel, Edge, Feedback};

/// Maximale Helligkeit / Duty (16 Bit)
pub const BREATH_MAX: u16 = u16::MAX;

/// Helligkeits-Sequenz eines Atemzugs
///
/// Steigt in festen Schritten von 0 bis `BREATH_MAX` und fällt danach wieder
/// auf 0. Beide Extremwerte werden exakt erreicht, der letzte Schritt vor
/// einem Extremwert kann kürzer sein. Der Scheitelwert kommt genau einmal.
///
/// # Beispiele
///
/// ```
/// # use nightlight_core::BreathSweep;
/// let levels: Vec<u16> = BreathSweep::new(30000).collect();
/// assert_eq!(levels, [0, 30000, 60000, 65535, 35535, 5535, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct BreathSweep {
    step: u16,
    offset: u16,
    phase: SweepPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepPhase {
    Rising,
    Falling,
    Done,
}

impl BreathSweep {
    pub fn new(step: u16) -> Self {
        Self {
            step: step.max(1),
            offset: 0,
            phase: SweepPhase::Rising,
        }
    }
}

impl Iterator for BreathSweep {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        match self.phase {
            SweepPhase::Rising => {
                let level = self.offset;
                if level == BREATH_MAX {
                    self.phase = SweepPhase::Falling;
                    self.offset = self.step;
                } else {
                    self.offset = self.offset.saturating_add(self.step);
                }
                Some(level)
            }
            SweepPhase::Falling => {
                let level = BREATH_MAX - self.offset;
                if level == 0 {
                    self.phase = SweepPhase::Done;
                } else {
                    self.offset = self.offset.saturating_add(self.step);
                }
                Some(level)
            }
            SweepPhase::Done => None,
        }
    }
}

/// Flanken-Erkennung für den Taster
///
/// `current` ist immer der Wert der letzten Abfrage, `previous` der davor.
/// Die Flanke wird unabhängig vom RunState nachgeführt, damit beim
/// Wiedereinschalten keine veralteten Flanken ausgelöst werden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdgeState {
    previous: ButtonLevel,
    current: ButtonLevel,
}

impl ButtonEdgeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Übernimmt eine neue Abfrage und liefert die erkannte Flanke
    pub fn update(&mut self, reading: ButtonLevel) -> Option<Edge> {
        self.current = reading;
        let edge = match (self.previous, self.current) {
            (ButtonLevel::Released, ButtonLevel::Pressed) => Some(Edge::Rising),
            (ButtonLevel::Pressed, ButtonLevel::Released) => Some(Edge::Falling),
            _ => None,
        };
        self.previous = self.current;
        edge
    }

    pub fn previous(&self) -> ButtonLevel {
        self.previous
    }

    pub fn current(&self) -> ButtonLevel {
        self.current
    }
}

/// Welche Rückmeldung eine Flanke auslöst (nur wenn das System läuft)
pub fn feedback_for(edge: Option<Edge>, running: bool) -> Option<Feedback> {
    if !running {
        return None;
    }
    match edge? {
        Edge::Rising => Some(Feedback::Activated),
        Edge::Falling => Some(Feedback::Cleared),
    }
}

/// Bildet 24 Zufallsbits auf drei unabhängige 8-Bit Kanäle ab
pub fn color_from_bits(bits: u32) -> RGB8 {
    RGB8 {
        r: bits as u8,
        g: (bits >> 8) as u8,
        b: (bits >> 16) as u8,
    }
}

/// Lehnt der Broker ein Abonnement mit diesem MQTT v5 Reason Code ab?
///
/// Nur die SUBACK-Fehlercodes zählen als Ablehnung (Konfigurationsfehler).
/// Netzwerk-, Dekodier- und Timeout-Fehler während des SUBSCRIBE sind ein
/// Verbindungsverlust und führen zu einem Reconnect. 0x83 (implementation
/// specific) wird auch clientseitig für unerwartete Pakete gemeldet und
/// gilt daher nicht als Ablehnung.
pub fn is_subscribe_rejection(reason_code: u8) -> bool {
    matches!(
        reason_code,
        0x80 // Unspecified error
            | 0x87 // Not authorized
            | 0x8F // Topic Filter invalid
            | 0x97 // Quota exceeded
            | 0x9E // Shared Subscriptions not supported
            | 0xA1 // Subscription Identifiers not supported
            | 0xA2 // Wildcard Subscriptions not supported
    )
}
