//! Component score scale shared across stage boundaries.
//!
//! Every analyzer's headline figure crosses into the report generator as a
//! [`NormalizedScore`]. The conversion from each analyzer's native bundle lives
//! next to the generator (`report::normalize`) so that mixing raw figures of
//! different scales is a type error.
//!
//! # Examples
//!
//! ```rust
//! use qualitymap::core::NormalizedScore;
//!
//! let score = NormalizedScore::new(85.0);
//! assert_eq!(score.value(), 85.0);
//!
//! // Out-of-bounds and non-finite values are pinned
//! assert_eq!(NormalizedScore::new(150.0).value(), 100.0);
//! assert_eq!(NormalizedScore::new(f64::NAN).value(), 0.0);
//! ```

use serde::{Deserialize, Serialize};

/// Score on a 0-100 scale, higher is healthier.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedScore(f64);

impl NormalizedScore {
    pub const PERFECT: NormalizedScore = NormalizedScore(100.0);

    /// Create a new score, clamping to [0.0, 100.0]. NaN maps to 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 100.0))
    }

    /// Get the raw score value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Value rounded to two decimals for presentation.
    pub fn rounded(self) -> f64 {
        super::round_to(self.0, 2)
    }
}

impl Default for NormalizedScore {
    fn default() -> Self {
        Self::PERFECT
    }
}

impl std::fmt::Display for NormalizedScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn always_in_bounds(value in -1000.0..1000.0f64) {
            let score = NormalizedScore::new(value);
            prop_assert!(score.value() >= 0.0 && score.value() <= 100.0);
        }

        #[test]
        fn preserves_ordering(a in 0.0..100.0f64, b in 0.0..100.0f64) {
            let (sa, sb) = (NormalizedScore::new(a), NormalizedScore::new(b));
            prop_assert_eq!(a < b, sa < sb);
        }
    }
}
