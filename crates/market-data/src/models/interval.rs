use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Cadence label identifiers
pub const INTERVAL_SECONDS: &str = "s";
pub const INTERVAL_MINUTES: &str = "m";
pub const INTERVAL_TEN_MINUTES: &str = "mm";
pub const INTERVAL_HOURS: &str = "h";
pub const INTERVAL_DAILY: &str = "d";

// =============================================================================
// Interval
// =============================================================================

/// Refresh cadence label carried on subscriptions.
///
/// The label is advisory for storage: it does not change how quotes are
/// persisted. The simulated provider uses [`step_seconds`](Self::step_seconds)
/// to advance quote timestamps between walk steps.
///
/// Serialized as its short label ("s", "m", "mm", "h", "d"); unknown labels
/// deserialize to [`Interval::Daily`] rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Interval {
    /// Every second
    Seconds,
    /// Every simulated minute (8s steps)
    Minutes,
    /// Every ten simulated minutes (48s steps)
    TenMinutes,
    /// Hourly
    Hours,
    /// Daily session cadence; also the fallback for unknown labels
    #[default]
    Daily,
}

impl Interval {
    /// Returns the string label for this cadence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Seconds => INTERVAL_SECONDS,
            Interval::Minutes => INTERVAL_MINUTES,
            Interval::TenMinutes => INTERVAL_TEN_MINUTES,
            Interval::Hours => INTERVAL_HOURS,
            Interval::Daily => INTERVAL_DAILY,
        }
    }

    /// Seconds a quote timestamp advances per step at this cadence.
    pub fn step_seconds(&self) -> i64 {
        match self {
            Interval::Seconds => 1,
            Interval::Minutes => 8,
            Interval::TenMinutes => 48,
            Interval::Hours => 3600,
            Interval::Daily => 28800,
        }
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.as_str().to_string()
    }
}

impl From<&str> for Interval {
    fn from(s: &str) -> Self {
        match s {
            INTERVAL_SECONDS => Interval::Seconds,
            INTERVAL_MINUTES => Interval::Minutes,
            INTERVAL_TEN_MINUTES => Interval::TenMinutes,
            INTERVAL_HOURS => Interval::Hours,
            _ => Interval::Daily,
        }
    }
}

impl From<String> for Interval {
    fn from(s: String) -> Self {
        Interval::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for interval in [
            Interval::Seconds,
            Interval::Minutes,
            Interval::TenMinutes,
            Interval::Hours,
            Interval::Daily,
        ] {
            assert_eq!(Interval::from(interval.as_str()), interval);
        }
    }

    #[test]
    fn test_unknown_label_falls_back_to_daily() {
        assert_eq!(Interval::from("weekly"), Interval::Daily);
        assert_eq!(Interval::from(""), Interval::Daily);
    }

    #[test]
    fn test_step_seconds() {
        assert_eq!(Interval::Seconds.step_seconds(), 1);
        assert_eq!(Interval::Minutes.step_seconds(), 8);
        assert_eq!(Interval::TenMinutes.step_seconds(), 48);
        assert_eq!(Interval::Hours.step_seconds(), 3600);
        assert_eq!(Interval::Daily.step_seconds(), 28800);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Interval::TenMinutes).unwrap();
        assert_eq!(json, "\"mm\"");
        let parsed: Interval = serde_json::from_str("\"h\"").unwrap();
        assert_eq!(parsed, Interval::Hours);
    }

    #[test]
    fn test_serde_unknown_label_falls_back() {
        let parsed: Interval = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(parsed, Interval::Daily);
    }
}
