//! Clustering thresholds and the directory labels derived from them.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    num::ParseFloatError,
    str::FromStr,
};

use crate::{Result, error::SweepError};

/// Similarity cutoff forwarded to the external clustering program.
///
/// Values are parsed but not range-checked; anything outside `(0, 1]` is
/// passed through unchanged and left for the external program to reject.
///
/// # Examples
/// ```
/// use ctsweep_core::Threshold;
///
/// let threshold: Threshold = "0.97".parse().expect("valid float");
/// assert_eq!(threshold.value(), 0.97);
/// assert_eq!(threshold.to_string(), "0.97");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// Wraps a raw threshold value.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the raw threshold value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Maps the threshold to its integer percentage label.
    ///
    /// The percentage is rounded half-to-even, so `0.125` maps to `12`. Large
    /// values keep every digit of the rounded percentage.
    ///
    /// # Errors
    /// Returns [`SweepError::NonFiniteThreshold`] for `NaN`, infinities and
    /// values whose percentage overflows.
    ///
    /// # Examples
    /// ```
    /// use ctsweep_core::Threshold;
    ///
    /// let label = Threshold::new(0.75).label().expect("finite threshold");
    /// assert_eq!(label.to_string(), "75");
    /// ```
    #[expect(
        clippy::float_arithmetic,
        reason = "percentage labels are rounded from the scaled threshold"
    )]
    pub fn label(self) -> Result<ThresholdLabel> {
        let percent = (self.0 * 100.0).round_ties_even();
        if !percent.is_finite() {
            return Err(SweepError::NonFiniteThreshold { value: self.0 });
        }
        // Adding zero folds -0 into 0.
        Ok(ThresholdLabel(percent + 0.0))
    }
}

impl FromStr for Threshold {
    type Err = ParseFloatError;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        raw.trim().parse::<f64>().map(Self)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer percentage used as the per-threshold directory name.
///
/// Holds a finite, integral value without a negative zero, so equality and
/// ordering follow the numeric value.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdLabel(f64);

impl ThresholdLabel {
    /// Returns the rounded percentage.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for ThresholdLabel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for ThresholdLabel {}

impl PartialOrd for ThresholdLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ThresholdLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for ThresholdLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for ThresholdLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::half(0.5, "50")]
    #[case::three_quarters(0.75, "75")]
    #[case::one(1.0, "100")]
    #[case::representation_error(0.29, "29")]
    #[case::rounds_down(0.501, "50")]
    #[case::rounds_up(0.506, "51")]
    #[case::tie_to_even_down(0.125, "12")]
    #[case::negative_zero(-0.001, "0")]
    #[case::negative(-0.5, "-50")]
    #[case::out_of_range(1.5, "150")]
    #[case::beyond_i64(1e20, "10000000000000000000000")]
    #[case::beyond_i64_larger(1e21, "99999999999999991611392")]
    fn label_rounds_percentage(#[case] value: f64, #[case] expected: &str) {
        let label = Threshold::new(value)
            .label()
            .expect("finite thresholds must label");
        assert_eq!(label.to_string(), expected);
    }

    #[rstest]
    fn large_thresholds_keep_distinct_labels() {
        let small = Threshold::new(1e20).label().expect("finite");
        let large = Threshold::new(1e21).label().expect("finite");
        assert_ne!(small, large);
        assert!(small < large);
    }

    #[rstest]
    fn labels_compare_by_rounded_value() {
        let low = Threshold::new(0.501).label().expect("finite");
        let high = Threshold::new(0.504).label().expect("finite");
        assert_eq!(low, high);
        assert_eq!(low.value(), 50.0);
    }

    #[rstest]
    fn scaling_overflow_is_non_finite() {
        let err = Threshold::new(f64::MAX)
            .label()
            .expect_err("overflowing percentages must fail");
        assert!(matches!(err, SweepError::NonFiniteThreshold { .. }));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn label_rejects_non_finite(#[case] value: f64) {
        let err = Threshold::new(value)
            .label()
            .expect_err("non-finite thresholds must fail");
        assert!(matches!(err, SweepError::NonFiniteThreshold { .. }));
    }

    #[rstest]
    #[case("0.97", 0.97)]
    #[case(" 0.5 ", 0.5)]
    #[case("1", 1.0)]
    #[case("-3", -3.0)]
    fn parse_accepts_floats(#[case] raw: &str, #[case] expected: f64) {
        let threshold: Threshold = raw.parse().expect("valid float must parse");
        assert_eq!(threshold.value(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("0,5")]
    fn parse_rejects_non_floats(#[case] raw: &str) {
        assert!(raw.parse::<Threshold>().is_err());
    }
}
