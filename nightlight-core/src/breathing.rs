//! Atem-LED Loop
//!
//! Fährt die Helligkeit eines PWM-Ausgangs hoch und runter solange das
//! System läuft. Der RunState wird vor jedem Schritt geprüft: ein Schritt
//! wird nie unterbrochen, ein neuer Zyklus startet nur wenn das System läuft.

use core::convert::Infallible;

use embedded_hal::pwm::SetDutyCycle;
use embedded_hal_async::delay::DelayNs;

use crate::error::HwError;
use crate::logic::{BREATH_MAX, BreathSweep};
use crate::state::RunStateView;
use crate::types::CycleOutcome;

/// Timing des Atem-Loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathingConfig {
    /// Helligkeits-Schritt pro Tick (von 65535)
    pub step: u16,
    /// Pause nach jedem Schritt
    pub step_delay_ms: u32,
    /// Pause wenn das System gestoppt ist
    pub idle_delay_ms: u32,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            step: 500,
            step_delay_ms: 10,
            idle_delay_ms: 100,
        }
    }
}

/// Atem-LED
///
/// # Trait-basierte Abstraktion
/// - `P: SetDutyCycle` - LEDC Kanal auf dem ESP32, Mock in Tests
/// - `D: DelayNs` - `embassy_time::Delay` auf dem ESP32, Mock in Tests
pub struct BreathingLight<'a, P, D> {
    light: P,
    delay: D,
    run_state: RunStateView<'a>,
    config: BreathingConfig,
}

impl<'a, P, D> BreathingLight<'a, P, D>
where
    P: SetDutyCycle,
    D: DelayNs,
{
    pub fn new(light: P, delay: D, run_state: RunStateView<'a>, config: BreathingConfig) -> Self {
        Self {
            light,
            delay,
            run_state,
            config,
        }
    }

    /// Läuft endlos, endet nur bei einem Hardware-Fehler
    pub async fn run(&mut self) -> Result<Infallible, HwError> {
        info!("Breath: loop started");
        loop {
            if self.cycle().await? == CycleOutcome::Interrupted {
                info!("Breath: stopped mid-sweep, light off");
            }
        }
    }

    /// Eine Iteration: ganzer Atemzug oder Idle-Wartezeit
    pub async fn cycle(&mut self) -> Result<CycleOutcome, HwError> {
        if !self.run_state.is_running() {
            self.delay.delay_ms(self.config.idle_delay_ms).await;
            return Ok(CycleOutcome::Idle);
        }

        for level in BreathSweep::new(self.config.step) {
            if !self.run_state.is_running() {
                self.set_level(0)?;
                return Ok(CycleOutcome::Interrupted);
            }
            self.set_level(level)?;
            self.delay.delay_ms(self.config.step_delay_ms).await;
        }

        Ok(CycleOutcome::Completed)
    }

    fn set_level(&mut self, level: u16) -> Result<(), HwError> {
        self.light
            .set_duty_cycle_fraction(level, BREATH_MAX)
            .map_err(|_| HwError::Light)
    }

    pub fn light(&self) -> &P {
        &self.light
    }
}
