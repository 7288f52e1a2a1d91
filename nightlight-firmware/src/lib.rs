// Library-Root: Hardware-Adapter, Konfiguration und Tasks der Firmware
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von nightlight-core
pub use nightlight_core::{FeedbackOutputs, RunState, scheduler};

// ============================================================================
// Testing
// ============================================================================
//
// Diese Crate kompiliert nur für riscv32imac-unknown-none-elf und hat daher
// keine Host-Tests. Die gesamte Logik (RunState, Flanken-Erkennung, Atem-
// Sequenz, Loops, Scheduler) liegt in nightlight-core und wird dort bzw. in
// nightlight-tests gegen Mock-Hardware getestet. Hier bleiben nur dünne
// Adapter auf esp-hal, rust-mqtt und die Konfiguration.
