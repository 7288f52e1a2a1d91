// Atem-LED - verbindet den LEDC Kanal mit dem Loop aus nightlight-core
use core::convert::Infallible;

use embassy_time::Delay;
use embedded_hal::pwm::SetDutyCycle;
use nightlight_core::{BreathingConfig, BreathingLight, HwError, RunStateView};

use crate::config::{BREATH_IDLE_DELAY_MS, BREATH_STEP, BREATH_STEP_DELAY_MS};

/// Atem-Loop mit der Firmware-Konfiguration
///
/// # Parameter
/// - `light`: PWM-Kanal der LED (LEDC, 1000 Hz)
/// - `run_state`: Nur-Lese-Zugriff auf den RunState
pub async fn breathing_loop<P: SetDutyCycle>(
    light: P,
    run_state: RunStateView<'_>,
) -> Result<Infallible, HwError> {
    let config = BreathingConfig {
        step: BREATH_STEP,
        step_delay_ms: BREATH_STEP_DELAY_MS,
        idle_delay_ms: BREATH_IDLE_DELAY_MS,
    };
    let mut breathing = BreathingLight::new(light, Delay, run_state, config);
    breathing.run().await
}
