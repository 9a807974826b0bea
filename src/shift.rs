//! # Turno
//!
//! Shift classification from the received timestamp.
//!
//! Three fixed clock windows partition the day:
//! - Primeiro Turno: 06:00–13:59
//! - Segundo Turno: 14:00–21:59
//! - Terceiro Turno: 22:00–05:59
//!
//! The boundaries are minute-of-day on local wall clock, no timezone
//! conversion. A missing or unparseable timestamp classifies as Terceiro
//! Turno rather than erroring.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shift {
    First,
    Second,
    Third,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::First => "Primeiro Turno",
            Shift::Second => "Segundo Turno",
            Shift::Third => "Terceiro Turno",
        }
    }
}

pub fn classify(received: Option<NaiveDateTime>) -> Shift {
    match received {
        Some(ts) => classify_minute(ts.hour() * 60 + ts.minute()),
        None => Shift::Third,
    }
}

fn classify_minute(minute_of_day: u32) -> Shift {
    match minute_of_day {
        360..=839 => Shift::First,
        840..=1319 => Shift::Second,
        _ => Shift::Third,
    }
}

#[cfg(test)]
mod tests {
    use super::{Shift, classify, classify_minute};
    use chrono::NaiveDate;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify_minute(360), Shift::First);
        assert_eq!(classify_minute(839), Shift::First);
        assert_eq!(classify_minute(840), Shift::Second);
        assert_eq!(classify_minute(1319), Shift::Second);
        assert_eq!(classify_minute(1320), Shift::Third);
        assert_eq!(classify_minute(0), Shift::Third);
        assert_eq!(classify_minute(359), Shift::Third);
        assert_eq!(classify_minute(1439), Shift::Third);
    }

    #[test]
    fn test_every_minute_is_classified() {
        for minute in 0..1440 {
            let shift = classify_minute(minute);

            let expected = if (360..=839).contains(&minute) {
                Shift::First
            } else if (840..=1319).contains(&minute) {
                Shift::Second
            } else {
                Shift::Third
            };

            assert_eq!(shift, expected, "minute {minute}");
        }
    }

    #[test]
    fn test_absent_timestamp_defaults_to_third() {
        assert_eq!(classify(None), Shift::Third);
    }

    #[test]
    fn test_classify_from_timestamp() {
        let morning = NaiveDate::from_ymd_opt(2025, 8, 7)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let night = NaiveDate::from_ymd_opt(2025, 8, 7)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();

        assert_eq!(classify(Some(morning)), Shift::First);
        assert_eq!(classify(Some(night)), Shift::Third);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Shift::First.as_str(), "Primeiro Turno");
        assert_eq!(Shift::Second.as_str(), "Segundo Turno");
        assert_eq!(Shift::Third.as_str(), "Terceiro Turno");
    }
}
