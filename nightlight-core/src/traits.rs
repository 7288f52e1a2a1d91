//! Hardware Abstraction Traits
//!
//! PWM-Ausgänge und der Taster nutzen direkt die `embedded-hal` Traits
//! (`SetDutyCycle`, `InputPin`). Hier stehen nur die Schnittstellen, für
//! die es keinen passenden Standard-Trait gibt.

use rgb::RGB8;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    WriteFailed,
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf RGB LEDs (WS2812/Neopixel).
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockPixel (in-memory Mock)
pub trait SmartLedWriter {
    /// Schreibt eine RGB-Farbe auf die LED
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;
}

/// Quelle für zufällige Indikator-Farben
pub trait ColorSource {
    fn next_color(&mut self) -> RGB8;
}

/// Eingehende Kommandos vom Broker
///
/// `poll()` liefert höchstens eine Nachricht und kehrt sofort (bzw. nach
/// einem kurzen Empfangsfenster) mit `None` zurück, wenn nichts ansteht.
#[allow(async_fn_in_trait)]
pub trait CommandSource {
    type Error;

    /// Payload der nächsten Nachricht, falls vorhanden
    async fn poll(&mut self) -> Result<Option<&[u8]>, Self::Error>;
}
