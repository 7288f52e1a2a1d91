//! Gemeinsamer RunState
//!
//! Ein einzelnes Bool: genau ein Schreiber (Command-Listener), mehrere Leser
//! (Atem- und Button-Loop). Auf dem ESP32-C6 sind Bool-Zugriffe atomar,
//! daher kein Mutex.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::types::Command;

/// Run/Stop Flag des gesamten Systems (Initial: gestoppt)
///
/// Wird einmal beim Start angelegt (z.B. via `StaticCell`) und per Referenz
/// an die Tasks übergeben. Nur der Listener bekommt `&RunState`, die
/// Device-Loops bekommen eine [`RunStateView`].
#[derive(Debug, Default)]
pub struct RunState {
    running: AtomicBool,
}

impl RunState {
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    /// Übernimmt ein Kommando, gibt den neuen Zustand zurück
    pub fn apply(&self, command: Command) -> bool {
        let running = command.is_on();
        self.set_running(running);
        running
    }

    /// Nur-Lese-Handle für die Device-Loops
    pub fn view(&self) -> RunStateView<'_> {
        RunStateView { state: self }
    }
}

/// Nur-Lese-Zugriff auf den [`RunState`]
#[derive(Debug, Clone, Copy)]
pub struct RunStateView<'a> {
    state: &'a RunState,
}

impl RunStateView<'_> {
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }
}
