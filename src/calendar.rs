use chrono::{Datelike, Duration, NaiveDate};

/// One xun: a contiguous run of days within the planning year.
///
/// Periods 1..count-1 are exactly the nominal length; the last period runs
/// through Dec 31 and absorbs whatever remainder the year leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub index: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_count: u32,
}

/// Splits `year` into `period_count` contiguous periods of `nominal_days`
/// each, the last one extended to Dec 31.
pub fn compute_periods(year: i32, period_count: u32, nominal_days: u32) -> Vec<Period> {
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).expect("valid year end");
    let mut current = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid year start");
    let mut periods = Vec::with_capacity(period_count as usize);

    for index in 1..=period_count {
        let day_count = if index == period_count {
            ((year_end - current).num_days() + 1) as u32
        } else {
            nominal_days
        };
        let end_date = current + Duration::days(day_count as i64 - 1);
        periods.push(Period {
            index,
            start_date: current,
            end_date,
            day_count,
        });
        current = end_date + Duration::days(1);
    }

    periods
}

/// Canonical `YYYY-MM-DD` key for a date, from its local calendar fields.
pub fn format_local_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Strict inverse of [`format_local_date`]: anything that does not
/// round-trip is not a date key.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    if key.len() != 10 {
        return None;
    }
    let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?;
    (format_local_date(date) == key).then_some(date)
}

/// The period whose inclusive `[start_date, end_date]` range contains `date`.
pub fn period_containing(periods: &[Period], date: NaiveDate) -> Option<&Period> {
    periods
        .iter()
        .find(|p| date >= p.start_date && date <= p.end_date)
}

/// The period containing `today`, or `None` when `today` falls outside the
/// year the periods were computed for.
pub fn current_period(periods: &[Period], today: NaiveDate) -> Option<&Period> {
    let year = periods.first()?.start_date.year();
    if today.year() != year {
        return None;
    }
    period_containing(periods, today)
}

/// Every date in the inclusive range `[start, end]`.
pub fn dates_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current += Duration::days(1);
    }
    dates
}
