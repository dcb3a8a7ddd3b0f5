use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};
use std::fmt;

/// A weekly calendar trigger: one weekday at one local time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub day: Weekday,
    pub at: NaiveTime,
}

impl Trigger {
    /// Parse a trigger from a weekday name ("monday", "Wed") and "HH:MM"
    pub fn parse(day: &str, at: &str) -> Result<Self, String> {
        let day = day
            .trim()
            .parse::<Weekday>()
            .map_err(|_| format!("'{}' is not a weekday", day))?;
        let at = NaiveTime::parse_from_str(at.trim(), "%H:%M")
            .map_err(|_| format!("'{}' is not a HH:MM time", at))?;
        Ok(Self { day, at })
    }

    /// First occurrence strictly after `now`
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().weekday().num_days_from_monday();
        let target = self.day.num_days_from_monday();
        let days_ahead = (target + 7 - today) % 7;
        let candidate = (now.date() + Duration::days(i64::from(days_ahead))).and_time(self.at);
        if candidate > now {
            candidate
        } else {
            candidate + Duration::days(7)
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {} at {}", self.day, self.at.format("%H:%M"))
    }
}
