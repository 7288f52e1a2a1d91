//! Button Feedback Loop
//!
//! Fragt den Taster in festem Intervall ab, unabhängig vom RunState.
//! Nur wenn das System läuft lösen Flanken eine Rückmeldung aus:
//! - Drücken: Neopixel auf Zufallsfarbe, Buzzer an
//! - Loslassen: Neopixel aus, Buzzer aus

use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal_async::delay::DelayNs;
use rgb::RGB8;

use crate::error::HwError;
use crate::logic::{ButtonEdgeState, feedback_for};
use crate::state::RunStateView;
use crate::traits::{ColorSource, SmartLedWriter};
use crate::types::{ButtonLevel, Feedback};

/// Timing und Ton-Lautstärke des Button-Loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonConfig {
    /// Abfrage-Intervall des Tasters
    pub poll_interval_ms: u32,
    /// Buzzer-Duty solange gedrückt (von 65535)
    pub tone_duty: u16,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            tone_duty: 1000,
        }
    }
}

/// Ausgänge des Button-Loops
pub struct FeedbackOutputs<L, T, C> {
    pub pixel: L,
    pub tone: T,
    pub colors: C,
}

/// Taster mit Neopixel- und Buzzer-Rückmeldung
pub struct ButtonFeedback<'a, B, L, T, C, D> {
    button: B,
    outputs: FeedbackOutputs<L, T, C>,
    delay: D,
    edges: ButtonEdgeState,
    run_state: RunStateView<'a>,
    config: ButtonConfig,
}

impl<'a, B, L, T, C, D> ButtonFeedback<'a, B, L, T, C, D>
where
    B: InputPin,
    L: SmartLedWriter,
    T: SetDutyCycle,
    C: ColorSource,
    D: DelayNs,
{
    pub fn new(
        button: B,
        outputs: FeedbackOutputs<L, T, C>,
        delay: D,
        run_state: RunStateView<'a>,
        config: ButtonConfig,
    ) -> Self {
        Self {
            button,
            outputs,
            delay,
            edges: ButtonEdgeState::new(),
            run_state,
            config,
        }
    }

    /// Läuft endlos, endet nur bei einem Hardware-Fehler
    pub async fn run(&mut self) -> Result<Infallible, HwError> {
        // Startzustand: Pixel aus, Buzzer stumm
        self.clear()?;
        info!("Button: loop started");
        loop {
            self.poll()?;
            self.delay.delay_ms(self.config.poll_interval_ms).await;
        }
    }

    /// Eine Abfrage ohne Wartezeit
    ///
    /// Die Flanke wird immer nachgeführt, auch wenn das System gestoppt ist.
    pub fn poll(&mut self) -> Result<Option<Feedback>, HwError> {
        let high = self.button.is_high().map_err(|_| HwError::Button)?;
        let edge = self.edges.update(ButtonLevel::from(high));

        let feedback = feedback_for(edge, self.run_state.is_running());
        match feedback {
            Some(Feedback::Activated) => self.activate()?,
            Some(Feedback::Cleared) => self.clear()?,
            None => {
                if let Some(edge) = edge {
                    debug!("Button: {} edge ignored (stopped)", edge);
                }
            }
        }
        Ok(feedback)
    }

    fn activate(&mut self) -> Result<(), HwError> {
        let color = self.outputs.colors.next_color();
        self.outputs.pixel.write(color)?;
        self.outputs
            .tone
            .set_duty_cycle_fraction(self.config.tone_duty, u16::MAX)
            .map_err(|_| HwError::Tone)?;
        info!(
            "Button: pressed, color ({}, {}, {}), tone on",
            color.r, color.g, color.b
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HwError> {
        self.outputs.pixel.write(RGB8::default())?;
        self.outputs
            .tone
            .set_duty_cycle_fully_off()
            .map_err(|_| HwError::Tone)?;
        debug!("Button: pixel off, tone off");
        Ok(())
    }

    pub fn edges(&self) -> &ButtonEdgeState {
        &self.edges
    }

    pub fn outputs(&self) -> &FeedbackOutputs<L, T, C> {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut FeedbackOutputs<L, T, C> {
        &mut self.outputs
    }

    pub fn button_mut(&mut self) -> &mut B {
        &mut self.button
    }
}
