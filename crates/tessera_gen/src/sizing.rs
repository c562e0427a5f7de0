//! Data-width selection and clock-domain classification for endpoints.

use tessera_common::Frequency;

/// Widths a generated node may take, in ascending order.
pub const WIDTH_CANDIDATES: [u32; 5] = [32, 64, 128, 256, 512];

/// Bandwidth threshold above which a component is clocked fast, in GB/s.
pub const FAST_THRESHOLD: f64 = 10.0;

/// Bandwidth below which a component is clocked slow, in GB/s.
pub const SLOW_THRESHOLD: f64 = 2.0;

/// Returns the narrowest candidate width carrying `bandwidth` GB/s at
/// `frequency`, saturating at 512 bits.
///
/// The required width is `bandwidth * 8000 / MHz` bits.
pub fn select_width(bandwidth: f64, frequency: Frequency) -> u32 {
    let required_bits = bandwidth * 8_000.0 / frequency.mhz();
    WIDTH_CANDIDATES
        .into_iter()
        .find(|&w| f64::from(w) >= required_bits)
        .unwrap_or(WIDTH_CANDIDATES[WIDTH_CANDIDATES.len() - 1])
}

/// The two generated clock classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClockClass {
    /// The `fast` domain.
    Fast,
    /// The `slow` domain.
    Slow,
}

impl ClockClass {
    /// Classifies a component by its peak throughput in GB/s.
    pub fn classify(throughput: f64) -> Self {
        if throughput > FAST_THRESHOLD {
            ClockClass::Fast
        } else if throughput < SLOW_THRESHOLD {
            ClockClass::Slow
        } else {
            ClockClass::Fast
        }
    }

    /// Domain name used in node attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            ClockClass::Fast => "fast",
            ClockClass::Slow => "slow",
        }
    }
}
