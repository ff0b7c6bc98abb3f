//! Calendar-field arithmetic in a named time zone.
//!
//! Steps are applied to the local wall clock and resolved back to an instant,
//! so a daylight-saving change never moves the time of day of a series.

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

use crate::models::recurrence::RepeatPeriod;

/// Advance `start` by `amount` periods of `frequency`, measured on the wall
/// clock of `tz`. Months clamp to the last day of shorter months.
pub fn advance(
    start: DateTime<Utc>,
    frequency: RepeatPeriod,
    amount: u32,
    tz: Tz,
) -> Option<DateTime<Utc>> {
    let local = start.with_timezone(&tz).naive_local();

    let stepped = match frequency {
        RepeatPeriod::Daily => local.checked_add_days(Days::new(u64::from(amount)))?,
        RepeatPeriod::Weekly => local.checked_add_days(Days::new(u64::from(amount) * 7))?,
        RepeatPeriod::Monthly => local.checked_add_months(Months::new(amount))?,
        RepeatPeriod::Annually => local.checked_add_months(Months::new(amount.checked_mul(12)?))?,
    };

    Some(resolve_local(tz, stepped))
}

/// Advance `start` by whole local days in `tz`.
pub fn add_days(start: DateTime<Utc>, days: u64, tz: Tz) -> Option<DateTime<Utc>> {
    let local = start.with_timezone(&tz).naive_local();
    Some(resolve_local(tz, local.checked_add_days(Days::new(days))?))
}

/// Turn a wall-clock time in `tz` into an instant.
///
/// Ambiguous times (clocks turned back) take the earlier instant. Times inside
/// a gap (clocks turned forward) are pushed forward by the length of the gap.
pub fn resolve_local(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before_gap = tz
                .offset_from_utc_datetime(&(local - Duration::days(1)))
                .fix();
            let utc = local - Duration::seconds(i64::from(before_gap.local_minus_utc()));
            Utc.from_utc_datetime(&utc)
        }
    }
}

/// Difference between two instants in whole calendar days of `tz`.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>, tz: Tz) -> i64 {
    let from_date = from.with_timezone(&tz).date_naive();
    let to_date = to.with_timezone(&tz).date_naive();
    (to_date - from_date).num_days()
}

/// Whether both instants sit on a UTC midnight, the all-day representation.
pub fn is_all_day_event(start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    is_utc_midnight(start) && is_utc_midnight(end)
}

fn is_utc_midnight(instant: DateTime<Utc>) -> bool {
    instant.hour() == 0
        && instant.minute() == 0
        && instant.second() == 0
        && instant.nanosecond() == 0
}

/// UTC midnight of the calendar date `local` falls on in `tz`.
pub fn all_day_utc_date(local: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let date = local.with_timezone(&tz).date_naive();
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

/// Local midnight in `tz` of the calendar date carried by a UTC-midnight date.
pub fn all_day_date_local(utc_date: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    resolve_local(tz, utc_date.date_naive().and_time(NaiveTime::default()))
}

/// Monday of the ISO week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Index of the period containing `date`, counted from the period of `origin`.
pub fn period_index(origin: NaiveDate, date: NaiveDate, frequency: RepeatPeriod) -> i64 {
    match frequency {
        RepeatPeriod::Daily => (date - origin).num_days(),
        RepeatPeriod::Weekly => (start_of_week(date) - start_of_week(origin)).num_days() / 7,
        RepeatPeriod::Monthly => month_number(date) - month_number(origin),
        RepeatPeriod::Annually => i64::from(date.year() - origin.year()),
    }
}

/// First day of the period with index `index`, counted from the period of `origin`.
pub fn period_start(origin: NaiveDate, index: u32, frequency: RepeatPeriod) -> Option<NaiveDate> {
    match frequency {
        RepeatPeriod::Daily => origin.checked_add_days(Days::new(u64::from(index))),
        RepeatPeriod::Weekly => {
            start_of_week(origin).checked_add_days(Days::new(u64::from(index) * 7))
        }
        RepeatPeriod::Monthly => origin
            .with_day(1)?
            .checked_add_months(Months::new(index)),
        RepeatPeriod::Annually => {
            NaiveDate::from_ymd_opt(origin.year().checked_add(i32::try_from(index).ok()?)?, 1, 1)
        }
    }
}

fn month_number(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}
