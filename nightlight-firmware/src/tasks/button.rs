// Button Feedback - Taster, Neopixel und Buzzer
use core::convert::Infallible;

use embassy_time::Delay;
use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use nightlight_core::{
    ButtonConfig, ButtonFeedback, ColorSource, FeedbackOutputs, HwError, RunStateView,
    SmartLedWriter,
};

use crate::config::{BUTTON_POLL_INTERVAL_MS, TONE_DUTY};

/// Button-Loop mit der Firmware-Konfiguration
///
/// # Parameter
/// - `button`: GPIO Input mit Pull-Down
/// - `outputs`: Neopixel (RMT), Buzzer (LEDC, 440 Hz) und Farbquelle (RNG)
/// - `run_state`: Nur-Lese-Zugriff auf den RunState
pub async fn button_loop<B, L, T, C>(
    button: B,
    outputs: FeedbackOutputs<L, T, C>,
    run_state: RunStateView<'_>,
) -> Result<Infallible, HwError>
where
    B: InputPin,
    L: SmartLedWriter,
    T: SetDutyCycle,
    C: ColorSource,
{
    let config = ButtonConfig {
        poll_interval_ms: BUTTON_POLL_INTERVAL_MS,
        tone_duty: TONE_DUTY,
    };
    let mut feedback = ButtonFeedback::new(button, outputs, Delay, run_state, config);
    feedback.run().await
}
