// Zufallsfarben aus dem Hardware-RNG des ESP32-C6

use esp_hal::rng::Rng;
use nightlight_core::{ColorSource, color_from_bits};
use rgb::RGB8;

/// Liefert pro Aufruf eine neue Farbe mit drei unabhängigen 8-Bit Kanälen
pub struct HwRngColors {
    rng: Rng,
}

impl HwRngColors {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }
}

impl ColorSource for HwRngColors {
    fn next_color(&mut self) -> RGB8 {
        color_from_bits(self.rng.random())
    }
}
