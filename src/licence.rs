//! Licence expiry arithmetic.
//!
//! Durations are decomposed with a fixed 30 day month and 365 day year. This is
//! not calendar accurate and is kept that way so the text matches what users
//! already see for existing records.

use jiff::{Timestamp, civil::Date};

use crate::utils::midnight_utc;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const EXPIRING_SOON_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenceState {
    NoExpiry,
    Active,
    ExpiringSoon,
    Expired,
}

impl LicenceState {
    pub fn classify(expiry: Option<Date>, now: Timestamp) -> Self {
        if expiry.is_none() {
            LicenceState::NoExpiry
        } else if is_expired(expiry, now) {
            LicenceState::Expired
        } else if is_expiring_soon(expiry, now) {
            LicenceState::ExpiringSoon
        } else {
            LicenceState::Active
        }
    }

    pub fn badge(&self) -> Option<&'static str> {
        match self {
            LicenceState::Expired => Some("Expired"),
            LicenceState::ExpiringSoon => Some("Expires Soon"),
            _ => None,
        }
    }
}

/// Whole days from `now` until midnight of `expiry`, rounded up
pub fn days_until(expiry: Timestamp, now: Timestamp) -> i64 {
    let diff = expiry.as_millisecond() - now.as_millisecond();
    let days = diff / DAY_MS;
    if diff % DAY_MS > 0 { days + 1 } else { days }
}

pub fn format_time_remaining(expiry: Timestamp, now: Timestamp) -> String {
    let diff_days = days_until(expiry, now);

    if diff_days < 0 {
        let abs_days = diff_days.abs();
        if abs_days == 0 {
            "Expired today".to_string()
        } else {
            format!("Expired {} ago", decompose(abs_days))
        }
    } else if diff_days == 0 {
        "Expires today".to_string()
    } else {
        decompose(diff_days)
    }
}

/// Format the time remaining for a licence date, `None` when the date is out of range
pub fn format_expiry(expiry: Date, now: Timestamp) -> Option<String> {
    midnight_utc(expiry).map(|e| format_time_remaining(e, now))
}

pub fn is_expired(expiry: Option<Date>, now: Timestamp) -> bool {
    match expiry.and_then(midnight_utc) {
        Some(e) => e < now,
        None => false,
    }
}

pub fn is_expiring_soon(expiry: Option<Date>, now: Timestamp) -> bool {
    let Some(e) = expiry.and_then(midnight_utc) else {
        return false;
    };
    let limit = now.as_millisecond().saturating_add(EXPIRING_SOON_DAYS * DAY_MS);
    e >= now && e.as_millisecond() <= limit
}

fn decompose(days: i64) -> String {
    if days < 30 {
        plural(days, "day")
    } else if days < 365 {
        let months = days / 30;
        let rest = days % 30;
        if rest > 0 {
            format!("{}, {}", plural(months, "month"), plural(rest, "day"))
        } else {
            plural(months, "month")
        }
    } else {
        let years = days / 365;
        let rest = days % 365;
        let months = rest / 30;
        let days = rest % 30;

        let mut parts = vec![plural(years, "year")];
        if months > 0 {
            parts.push(plural(months, "month"));
        }
        if days > 0 {
            parts.push(plural(days, "day"));
        }
        parts.join(", ")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn ts(d: Date) -> Timestamp {
        midnight_utc(d).unwrap()
    }

    fn fmt(expiry: Date) -> String {
        format_time_remaining(ts(expiry), ts(date(2024, 1, 1)))
    }

    #[test]
    fn test_format_known_dates() {
        assert_eq!(fmt(date(2024, 1, 1)), "Expires today");
        assert_eq!(fmt(date(2024, 1, 2)), "1 day");
        assert_eq!(fmt(date(2024, 1, 15)), "14 days");
        assert_eq!(fmt(date(2023, 12, 31)), "Expired 1 day ago");
        assert_eq!(fmt(date(2023, 12, 15)), "Expired 17 days ago");
        assert_eq!(fmt(date(2023, 1, 1)), "Expired 1 year ago");
        //2024 is a leap year so this is 365 days
        assert_eq!(fmt(date(2024, 12, 31)), "1 year");
        assert_eq!(fmt(date(2025, 1, 1)), "1 year, 1 day");
    }

    #[test]
    fn test_format_months() {
        assert_eq!(fmt(date(2024, 1, 31)), "1 month");
        assert_eq!(fmt(date(2024, 2, 15)), "1 month, 15 days");
        assert_eq!(fmt(date(2024, 3, 1)), "2 months");
        assert_eq!(fmt(date(2023, 12, 2)), "Expired 1 month ago");
        assert_eq!(fmt(date(2023, 11, 1)), "Expired 2 months, 1 day ago");
    }

    #[test]
    fn test_format_years() {
        //800 days = 2 years, 70 days = 2 years, 2 months, 10 days
        let now = ts(date(2024, 1, 1));
        let later = Timestamp::from_millisecond(now.as_millisecond() + 800 * DAY_MS).unwrap();
        assert_eq!(
            format_time_remaining(later, now),
            "2 years, 2 months, 10 days"
        );
        let earlier = Timestamp::from_millisecond(now.as_millisecond() - 395 * DAY_MS).unwrap();
        assert_eq!(
            format_time_remaining(earlier, now),
            "Expired 1 year, 1 month ago"
        );
    }

    #[test]
    fn test_partial_days_round_up() {
        //midday today, expiry at midnight: -0.5 days rounds up to zero
        let now: Timestamp = "2024-01-01T12:00:00Z".parse().unwrap();
        assert_eq!(format_time_remaining(ts(date(2024, 1, 1)), now), "Expires today");
        assert_eq!(format_time_remaining(ts(date(2024, 1, 2)), now), "1 day");
        assert_eq!(
            format_time_remaining(ts(date(2023, 12, 31)), now),
            "Expired 1 day ago"
        );
        assert_eq!(days_until(ts(date(2023, 12, 31)), now), -1);
    }

    #[test]
    fn test_expiry_flags() {
        let now = ts(date(2024, 1, 1));
        assert!(is_expiring_soon(Some(date(2024, 3, 30)), now));
        assert!(is_expiring_soon(Some(date(2024, 3, 31)), now));
        assert!(!is_expiring_soon(Some(date(2024, 4, 1)), now));
        assert!(!is_expiring_soon(Some(date(2025, 1, 1)), now));
        assert!(is_expiring_soon(Some(date(2024, 1, 1)), now));
        assert!(!is_expiring_soon(None, now));

        assert!(is_expired(Some(date(2023, 12, 31)), now));
        assert!(!is_expired(Some(date(2024, 1, 1)), now));
        assert!(!is_expired(None, now));
    }

    #[test]
    fn test_classify() {
        let now = ts(date(2024, 1, 1));
        assert_eq!(LicenceState::classify(None, now), LicenceState::NoExpiry);
        assert_eq!(
            LicenceState::classify(Some(date(2023, 6, 1)), now),
            LicenceState::Expired
        );
        assert_eq!(
            LicenceState::classify(Some(date(2024, 2, 1)), now),
            LicenceState::ExpiringSoon
        );
        assert_eq!(
            LicenceState::classify(Some(date(2024, 12, 1)), now),
            LicenceState::Active
        );
        assert_eq!(LicenceState::Expired.badge(), Some("Expired"));
        assert_eq!(LicenceState::Active.badge(), None);
    }
}
