//! Business-day arithmetic and campaign week numbering.
//!
//! Business days are Monday through Friday. Holidays are not modeled.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Adds `days` business days to `start`, skipping weekends. The start date
/// itself is never counted, so a Friday plus three is the next Wednesday.
pub fn add_business_days(start: NaiveDate, days: u32) -> NaiveDate {
    let mut current = start;
    let mut added = 0;
    while added < days {
        current += Duration::days(1);
        if is_business_day(current) {
            added += 1;
        }
    }
    current
}

pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// 1-based campaign week of `date`, weeks anchored on Monday. Dates before
/// the campaign start yield zero or negative weeks.
pub fn campaign_week(date: NaiveDate, campaign_start: NaiveDate) -> i64 {
    let delta = (week_monday(date) - week_monday(campaign_start)).num_days();
    delta.div_euclid(7) + 1
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{add_business_days, campaign_week, is_business_day};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn business_days_between(from: NaiveDate, to: NaiveDate) -> u32 {
        let mut current = from;
        let mut count = 0;
        while current < to {
            current += chrono::Duration::days(1);
            if is_business_day(current) {
                count += 1;
            }
        }
        count
    }

    #[test]
    fn friday_plus_three_business_days_is_wednesday() {
        // 2026-02-06 is a Friday.
        assert_eq!(add_business_days(date(2026, 2, 6), 3), date(2026, 2, 11));
    }

    #[test]
    fn weekend_start_counts_from_monday() {
        assert_eq!(add_business_days(date(2026, 2, 7), 1), date(2026, 2, 9));
        assert_eq!(add_business_days(date(2026, 2, 8), 3), date(2026, 2, 11));
    }

    #[test]
    fn adding_never_lands_on_a_weekend() {
        let start = date(2026, 1, 1);
        for offset in 0..21 {
            let from = start + chrono::Duration::days(offset);
            for days in 1..8 {
                let result = add_business_days(from, days);
                assert!(is_business_day(result), "{from} + {days} landed on {result}");
                assert_eq!(business_days_between(from, result), days);
            }
        }
    }

    #[test]
    fn zero_business_days_is_identity() {
        assert_eq!(add_business_days(date(2026, 2, 7), 0), date(2026, 2, 7));
    }

    #[test]
    fn campaign_weeks_are_monday_anchored() {
        let start = date(2026, 1, 19);
        assert_eq!(campaign_week(date(2026, 1, 19), start), 1);
        assert_eq!(campaign_week(date(2026, 1, 25), start), 1);
        assert_eq!(campaign_week(date(2026, 1, 26), start), 2);
        assert_eq!(campaign_week(date(2026, 1, 18), start), 0);
    }
}
