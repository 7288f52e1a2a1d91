//! Retry-Backoff für WiFi-Assoziation und Broker-Reconnect
//!
//! Verdoppelt die Wartezeit bis zu einer Obergrenze. Gibt nie auf, ein
//! Nachtlicht hat keinen besseren Fallback als es weiter zu versuchen.

/// Gekappter exponentieller Backoff (Millisekunden)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    initial_ms: u64,
    max_ms: u64,
    next_ms: u64,
    attempts: u32,
}

impl Backoff {
    pub const fn new(initial_ms: u64, max_ms: u64) -> Self {
        Self {
            initial_ms,
            max_ms,
            next_ms: initial_ms,
            attempts: 0,
        }
    }

    /// Wartezeit vor dem nächsten Versuch
    pub fn next_delay_ms(&mut self) -> u64 {
        let delay = self.next_ms.min(self.max_ms);
        self.next_ms = delay.saturating_mul(2).min(self.max_ms);
        self.attempts = self.attempts.saturating_add(1);
        delay
    }

    /// Nach erfolgreicher Verbindung wieder bei `initial_ms` beginnen
    pub fn reset(&mut self) {
        self.next_ms = self.initial_ms;
        self.attempts = 0;
    }

    /// Anzahl Fehlversuche seit dem letzten `reset()`
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
