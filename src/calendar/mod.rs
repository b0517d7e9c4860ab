//! Operating Calendar
//!
//! Which weekdays carry an operation, plus the inclusive day-by-day walk
//! between two dates.
//!
//! Weekday indices follow chrono's Monday-first numbering:
//! 0=Mon, 1=Tue, 2=Wed, 3=Thu, 4=Fri, 5=Sat, 6=Sun

use crate::error::InputError;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

/// Set of weekdays on which operations happen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveWeekdays {
    days: HashSet<Weekday>,
}

impl ActiveWeekdays {
    /// An empty set: no day is active
    pub fn none() -> Self {
        Self::default()
    }

    /// Monday to Friday
    pub fn weekdays() -> Self {
        Self::from_weekdays([
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ])
    }

    pub fn from_weekdays<I: IntoIterator<Item = Weekday>>(days: I) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }

    /// Build from Monday-first indices (0..=6)
    pub fn from_indices<I: IntoIterator<Item = u8>>(indices: I) -> Result<Self, InputError> {
        let days = indices
            .into_iter()
            .map(weekday_from_index)
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self { days })
    }

    /// Build from names such as `mon`, `Tuesday`, `qui` or a digit `0`-`6`
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, InputError> {
        let days = names
            .iter()
            .map(|n| parse_weekday(n.as_ref()))
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self { days })
    }

    pub fn insert(&mut self, day: Weekday) {
        self.days.insert(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Check if an operation happens on this date
    pub fn is_active(&self, date: NaiveDate) -> bool {
        self.days.contains(&date.weekday())
    }

    /// Count active days from `start` to `end`, both inclusive
    pub fn active_days_between(&self, start: NaiveDate, end: NaiveDate) -> usize {
        DateRange::new(start, end)
            .filter(|d| self.is_active(*d))
            .count()
    }

    /// Sorted Monday-first indices
    pub fn indices(&self) -> Vec<u8> {
        let mut out: Vec<u8> = self
            .days
            .iter()
            .map(|d| d.num_days_from_monday() as u8)
            .collect();
        out.sort_unstable();
        out
    }

    /// Short English names in Monday-first order
    pub fn names(&self) -> Vec<&'static str> {
        self.indices()
            .into_iter()
            .map(|i| SHORT_NAMES[i as usize])
            .collect()
    }
}

const SHORT_NAMES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Map a Monday-first index to a weekday
pub fn weekday_from_index(index: u8) -> Result<Weekday, InputError> {
    match index {
        0 => Ok(Weekday::Mon),
        1 => Ok(Weekday::Tue),
        2 => Ok(Weekday::Wed),
        3 => Ok(Weekday::Thu),
        4 => Ok(Weekday::Fri),
        5 => Ok(Weekday::Sat),
        6 => Ok(Weekday::Sun),
        _ => Err(InputError::InvalidWeekday(index.to_string())),
    }
}

/// Parse an English or Portuguese weekday name, or a 0-6 index
pub fn parse_weekday(name: &str) -> Result<Weekday, InputError> {
    let key = name.trim().to_lowercase();
    let day = match key.as_str() {
        "mon" | "monday" | "seg" | "segunda" => Weekday::Mon,
        "tue" | "tuesday" | "ter" | "terça" | "terca" => Weekday::Tue,
        "wed" | "wednesday" | "qua" | "quarta" => Weekday::Wed,
        "thu" | "thursday" | "qui" | "quinta" => Weekday::Thu,
        "fri" | "friday" | "sex" | "sexta" => Weekday::Fri,
        "sat" | "saturday" | "sáb" | "sab" | "sábado" | "sabado" => Weekday::Sat,
        "sun" | "sunday" | "dom" | "domingo" => Weekday::Sun,
        // 0 = Monday
        "0" => Weekday::Mon,
        "1" => Weekday::Tue,
        "2" => Weekday::Wed,
        "3" => Weekday::Thu,
        "4" => Weekday::Fri,
        "5" => Weekday::Sat,
        "6" => Weekday::Sun,
        _ => return Err(InputError::InvalidWeekday(name.to_string())),
    };
    Ok(day)
}

/// Parse `dd/mm/yyyy` or ISO `yyyy-mm-dd`
pub fn parse_date(text: &str) -> Result<NaiveDate, InputError> {
    let s = text.trim();
    let malformed = || InputError::MalformedDate(text.to_string());

    let br_shape = s.len() == 10
        && s.as_bytes()[2] == b'/'
        && s.as_bytes()[5] == b'/'
        && s.chars().filter(|c| c.is_ascii_digit()).count() == 8;
    if br_shape {
        return NaiveDate::parse_from_str(s, "%d/%m/%Y").map_err(|_| malformed());
    }

    let iso_shape = s.len() == 10
        && s.as_bytes()[4] == b'-'
        && s.as_bytes()[7] == b'-'
        && s.chars().filter(|c| c.is_ascii_digit()).count() == 8;
    if iso_shape {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| malformed());
    }

    Err(malformed())
}

/// Format a date as `dd/mm/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Inclusive daily iterator from `start` to `end`
///
/// Yields nothing when `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: (start <= end).then_some(start),
            end,
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|d| *d <= self.end);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_known_weekdays() {
        // 2025-08-07 is a Thursday
        let active = ActiveWeekdays::from_indices([0, 1, 3]).unwrap();
        assert!(active.is_active(ymd(2025, 8, 7)));
        assert!(!active.is_active(ymd(2025, 8, 8))); // Fri
        assert!(active.is_active(ymd(2025, 8, 11))); // Mon
        assert!(active.is_active(ymd(2025, 8, 12))); // Tue
        assert!(!active.is_active(ymd(2025, 8, 13))); // Wed
    }

    #[test]
    fn test_invalid_index_rejected() {
        assert_eq!(
            ActiveWeekdays::from_indices([7]),
            Err(InputError::InvalidWeekday("7".to_string()))
        );
    }

    #[test]
    fn test_names() {
        let active = ActiveWeekdays::from_names(&["Seg", "tuesday", "qui", "6"]).unwrap();
        assert_eq!(active.indices(), vec![0, 1, 3, 6]);
        assert_eq!(active.names(), vec!["mon", "tue", "thu", "sun"]);
        assert!(ActiveWeekdays::from_names(&["someday"]).is_err());
    }

    #[test]
    fn test_weekday_digits_are_exact() {
        assert_eq!(parse_weekday("3"), Ok(Weekday::Thu));
        assert_eq!(parse_weekday(" 0 "), Ok(Weekday::Mon));
        for bad in ["+3", "03", "7", "-1", "3.0"] {
            assert_eq!(
                parse_weekday(bad),
                Err(InputError::InvalidWeekday(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_active_days_between() {
        let mondays = ActiveWeekdays::from_weekdays([Weekday::Mon]);
        // two full weeks starting on a Monday
        assert_eq!(mondays.active_days_between(ymd(2025, 8, 4), ymd(2025, 8, 17)), 2);
        let (mon, sun) = (ymd(2025, 8, 4), ymd(2025, 8, 10));
        assert_eq!(ActiveWeekdays::weekdays().active_days_between(mon, sun), 5);
        assert_eq!(ActiveWeekdays::none().active_days_between(mon, sun), 0);
    }

    #[test]
    fn test_date_range_inclusive() {
        let days: Vec<_> = DateRange::new(ymd(2025, 2, 27), ymd(2025, 3, 1)).collect();
        assert_eq!(days, vec![ymd(2025, 2, 27), ymd(2025, 2, 28), ymd(2025, 3, 1)]);

        assert_eq!(DateRange::new(ymd(2025, 1, 1), ymd(2025, 1, 1)).count(), 1);
        assert_eq!(DateRange::new(ymd(2025, 1, 2), ymd(2025, 1, 1)).count(), 0);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("07/08/2025").unwrap(), ymd(2025, 8, 7));
        assert_eq!(parse_date("2025-08-07").unwrap(), ymd(2025, 8, 7));
        for bad in ["7/8/2025", "31/02/2025", "2025/08/07", "", "07-08-2025", "ab/cd/efgh"] {
            assert!(
                matches!(parse_date(bad), Err(InputError::MalformedDate(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2025, 8, 7)), "07/08/2025");
    }
}
