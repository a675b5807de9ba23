use std::fmt;
use std::str::FromStr;

use chrono::{Local, Months, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Wire format of every timestamp stored on the ledger.
pub const LEDGER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Second-resolution wall-clock timestamp encoded as `YYYY-MM-DD HH:MM:SS`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LedgerTime(NaiveDateTime);

impl LedgerTime {
    /// The current local time, truncated to whole seconds.
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    pub fn from_naive(value: NaiveDateTime) -> Self {
        // The wire format has no fractional seconds.
        Self(value.with_nanosecond(0).unwrap_or(value))
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar arithmetic: `2024-02-29` plus 12 months is `2025-02-28`.
    pub fn plus_months(&self, months: u32) -> Result<Self, TypeError> {
        self.0
            .checked_add_months(Months::new(months))
            .map(Self)
            .ok_or(TypeError::TimeOverflow { months })
    }
}

impl fmt::Display for LedgerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(LEDGER_TIME_FORMAT))
    }
}

impl fmt::Debug for LedgerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerTime({self})")
    }
}

impl FromStr for LedgerTime {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts single-digit fields; the wire format is fixed width.
        if s.len() != 19 {
            return Err(TypeError::InvalidTime { value: s.to_string() });
        }
        NaiveDateTime::parse_from_str(s, LEDGER_TIME_FORMAT)
            .map(Self)
            .map_err(|_| TypeError::InvalidTime { value: s.to_string() })
    }
}

impl Serialize for LedgerTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LedgerTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_fixed_width() {
        let t: LedgerTime = "2020-05-27 15:04:05".parse().unwrap();
        assert_eq!(t.to_string(), "2020-05-27 15:04:05");
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in ["2020-5-27 15:04:05", "2020-05-27T15:04:05", "2020-05-27", ""] {
            assert!(bad.parse::<LedgerTime>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn one_year_later() {
        let t: LedgerTime = "2020-05-27 15:04:05".parse().unwrap();
        assert_eq!(t.plus_months(12).unwrap().to_string(), "2021-05-27 15:04:05");
    }

    #[test]
    fn leap_day_clamps() {
        let t: LedgerTime = "2024-02-29 00:00:00".parse().unwrap();
        assert_eq!(t.plus_months(12).unwrap().to_string(), "2025-02-28 00:00:00");
    }

    #[test]
    fn now_has_no_fractional_seconds() {
        let now = LedgerTime::now();
        let reparsed: LedgerTime = now.to_string().parse().unwrap();
        assert_eq!(now, reparsed);
    }

    #[test]
    fn serializes_as_string() {
        let t: LedgerTime = "2021-01-02 03:04:05".parse().unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"2021-01-02 03:04:05\"");
        let back: LedgerTime = serde_json::from_str("\"2021-01-02 03:04:05\"").unwrap();
        assert_eq!(back, t);
    }
}
