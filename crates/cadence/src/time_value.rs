//! Score time
//!
//! A `TimeValue` is a duration or an instant measured in seconds. It is never
//! negative, and it may be infinite: an interval without an upper bound has an
//! infinite max duration. Infinity absorbs finite values under addition and
//! dominates under min/max.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Duration or instant in seconds, possibly infinite
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "f64")]
pub struct TimeValue(f64);

impl TimeValue {
    pub const ZERO: TimeValue = TimeValue(0.0);
    pub const INFINITE: TimeValue = TimeValue(f64::INFINITY);

    /// Build from seconds. Negative and NaN inputs collapse to zero.
    pub fn from_secs(secs: f64) -> Self {
        if secs.is_nan() || secs <= 0.0 {
            Self::ZERO
        } else {
            Self(secs)
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::from_secs(millis as f64 / 1000.0)
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn infinite() -> Self {
        Self::INFINITE
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    pub fn is_infinite(self) -> bool {
        self.0.is_infinite()
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Ratio of `self` over `total`, clamped to `[0, 1]`.
    ///
    /// Returns `None` when `total` is zero or infinite; a normalized position
    /// inside an unbounded span is undefined.
    pub fn ratio_of(self, total: TimeValue) -> Option<f64> {
        if total.is_infinite() || total.is_zero() {
            return None;
        }
        Some((self.0 / total.0).clamp(0.0, 1.0))
    }
}

impl PartialEq for TimeValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeValue {}

impl PartialOrd for TimeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        // Constructors never produce NaN
        self.0.total_cmp(&other.0)
    }
}

impl Add for TimeValue {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        TimeValue(self.0 + rhs.0)
    }
}

impl AddAssign for TimeValue {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for TimeValue {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        if self.is_infinite() && rhs.is_infinite() {
            return TimeValue::ZERO;
        }
        TimeValue((self.0 - rhs.0).max(0.0))
    }
}

impl From<f64> for TimeValue {
    fn from(secs: f64) -> Self {
        TimeValue::from_secs(secs)
    }
}

impl From<Duration> for TimeValue {
    fn from(duration: Duration) -> Self {
        TimeValue::from_secs(duration.as_secs_f64())
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            write!(f, "inf")
        } else {
            write!(f, "{}s", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_input_floors_at_zero() {
        assert_eq!(TimeValue::from_secs(-3.0), TimeValue::ZERO);
        assert_eq!(TimeValue::from_secs(f64::NAN), TimeValue::ZERO);
    }

    #[test]
    fn test_subtract_never_negative() {
        let a = TimeValue::from_secs(1.0);
        let b = TimeValue::from_secs(2.5);
        assert_eq!(a - b, TimeValue::ZERO);
        assert_eq!(b - a, TimeValue::from_secs(1.5));
    }

    #[test]
    fn test_infinite_absorbs_addition() {
        let inf = TimeValue::INFINITE;
        assert!((inf + TimeValue::from_secs(10.0)).is_infinite());
        assert!((inf + inf).is_infinite());
        assert!((inf - TimeValue::from_secs(10.0)).is_infinite());
        assert_eq!(inf - inf, TimeValue::ZERO);
    }

    #[test]
    fn test_infinite_dominates_ordering() {
        let inf = TimeValue::INFINITE;
        let big = TimeValue::from_secs(1e300);
        assert!(inf > big);
        assert_eq!(inf.max(big), inf);
        assert_eq!(inf.min(big), big);
    }

    #[test]
    fn test_ratio_of() {
        let total = TimeValue::from_secs(4.0);
        assert_eq!(TimeValue::from_secs(1.0).ratio_of(total), Some(0.25));
        assert_eq!(TimeValue::from_secs(8.0).ratio_of(total), Some(1.0));
        assert_eq!(TimeValue::ZERO.ratio_of(TimeValue::INFINITE), None);
        assert_eq!(TimeValue::ZERO.ratio_of(TimeValue::ZERO), None);
    }

    #[test]
    fn test_from_duration() {
        let t: TimeValue = Duration::from_millis(250).into();
        assert_eq!(t, TimeValue::from_secs(0.25));
        assert_eq!(TimeValue::from_millis(250), t);
    }

    #[test]
    fn test_deserialize_floors_negative() {
        let t: TimeValue = serde_json::from_str("-2.5").unwrap();
        assert_eq!(t, TimeValue::ZERO);

        let t: TimeValue = serde_json::from_str("1.5").unwrap();
        assert_eq!(t, TimeValue::from_secs(1.5));
        assert_eq!(serde_json::to_string(&t).unwrap(), "1.5");
    }
}
