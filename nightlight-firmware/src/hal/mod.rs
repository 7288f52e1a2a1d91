// Hardware Abstraction Layer (HAL) Module
//
// Adapter von esp-hal Peripherals auf die Traits aus nightlight-core.
// PWM (LEDC) und Taster (GPIO Input) implementieren bereits die
// embedded-hal Traits und brauchen keinen eigenen Adapter.

pub mod led_writer;
pub mod rng_colors;

pub use led_writer::RmtLedWriter;
pub use rng_colors::HwRngColors;
