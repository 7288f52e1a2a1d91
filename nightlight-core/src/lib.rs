//! Nightlight Core - Platform-agnostic Logic, Traits und Loops
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Die Loops sind generisch über `embedded-hal` Traits und laufen
//! auf dem ESP32 genauso wie in den Host-Tests mit Mocks.

#![no_std]

#[macro_use]
mod fmt;

pub mod backoff;
pub mod breathing;
pub mod button;
pub mod error;
pub mod listener;
pub mod logic;
pub mod scheduler;
pub mod state;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use backoff::Backoff;
pub use breathing::{BreathingConfig, BreathingLight};
pub use button::{ButtonConfig, ButtonFeedback, FeedbackOutputs};
pub use error::{Fault, HwError};
pub use listener::{CommandListener, ListenerConfig};
pub use logic::{
    BREATH_MAX, BreathSweep, ButtonEdgeState, color_from_bits, feedback_for,
    is_subscribe_rejection,
};
pub use state::{RunState, RunStateView};
pub use traits::{ColorSource, CommandSource, LedError, SmartLedWriter};
pub use types::{ButtonLevel, Command, CycleOutcome, Edge, Feedback};
