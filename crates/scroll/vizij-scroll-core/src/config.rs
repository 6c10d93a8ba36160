//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Engine-wide settings. Every field has a default so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiet period (ms) a burst of resize notifications must settle for
    /// before tracked instances are recalculated.
    pub resize_debounce_ms: f64,
    /// Decimal places kept when formatting interpolated values, at most
    /// [`MAX_PRECISION`](crate::value::MAX_PRECISION).
    pub precision: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 50.0,
            precision: 4,
        }
    }
}
