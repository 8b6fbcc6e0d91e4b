use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A rule date could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date {0:?}, expected YYYY/MM/DD or YYYY-MM-DD")]
pub struct DateParseError(pub String);

/// Calendar date from a rule's `date` or `modified` field.
///
/// Only the textual shape and the component ranges are checked; the day is
/// not validated against the month (`2024/02/31` parses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleDate {
    /// Four-digit year
    pub year: u16,
    /// Month, 1 to 12
    pub month: u8,
    /// Day of month, 1 to 31
    pub day: u8,
}

impl RuleDate {
    /// Convert to a chrono date when the day exists in the calendar
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())
    }
}

fn digits(s: &str) -> Option<u16> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

impl FromStr for RuleDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DateParseError(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 10 || !s.is_ascii() {
            return Err(err());
        }
        let separator = bytes[4];
        if !matches!(separator, b'/' | b'-') || bytes[7] != separator {
            return Err(err());
        }

        let year = digits(&s[0..4]).ok_or_else(err)?;
        let month = digits(&s[5..7]).ok_or_else(err)?;
        let day = digits(&s[8..10]).ok_or_else(err)?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(err());
        }

        Ok(RuleDate {
            year,
            month: month as u8,
            day: day as u8,
        })
    }
}

impl fmt::Display for RuleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_separators() {
        let slash: RuleDate = "2024/01/15".parse().unwrap();
        let dash: RuleDate = "2024-01-15".parse().unwrap();
        assert_eq!(slash, dash);
        assert_eq!(slash.to_string(), "2024/01/15");
        assert_eq!(
            slash.to_naive_date(),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn test_rejects_malformed() {
        for input in [
            "2024/1/15",
            "2024-01/15",
            "2024.01.15",
            "2024/13/01",
            "2024/00/10",
            "2024/01/32",
            "2024/01/00",
            "20x4/01/01",
            "2024/+1/01",
            "",
        ] {
            assert!(input.parse::<RuleDate>().is_err(), "{input}");
        }
    }

    #[test]
    fn test_no_calendar_normalisation() {
        let date: RuleDate = "2023/02/31".parse().unwrap();
        assert_eq!(date.day, 31);
        assert_eq!(date.to_naive_date(), None);
    }
}
