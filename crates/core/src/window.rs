//! Budget window reset arithmetic.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::rules::{BudgetType, CalendarType, ResetWeekday, RollingType, RuleBudget};

/// Whether a rule's budget-reset boundary has been crossed.
///
/// Both dates are calendar days; time-of-day is normalized away at the
/// engine boundary before this is called.
pub fn window_expired(budget: &RuleBudget, last_reset: NaiveDate, as_of: NaiveDate) -> bool {
    match budget.budget_type {
        BudgetType::Calendar => match budget.calendar_type {
            Some(CalendarType::Weekly) => match budget.calendar_weekday {
                Some(weekday) => as_of >= next_weekly_reset(last_reset, weekday),
                None => false,
            },
            Some(CalendarType::Monthly) => monthly_expired(last_reset, as_of),
            None => false,
        },
        BudgetType::Rolling => match (budget.rolling_type, budget.rolling_days) {
            (Some(RollingType::Days), Some(days)) => {
                as_of >= last_reset + Duration::days(i64::from(days))
            }
            // Hourly windows are accepted from the backend but have no
            // reset semantics; they never expire.
            (Some(RollingType::Hours), _) => false,
            _ => false,
        },
    }
}

/// First occurrence of `target` strictly after `last_reset`.
///
/// Weekdays are numbered 1 (Sunday) through 7 (Saturday); a target at or
/// before the reset day's number rolls into the following week.
fn next_weekly_reset(last_reset: NaiveDate, target: ResetWeekday) -> NaiveDate {
    let reset_ordinal = weekday_ordinal(last_reset.weekday());
    let target_ordinal = target.ordinal();

    let days_ahead = if target_ordinal > reset_ordinal {
        target_ordinal - reset_ordinal
    } else {
        target_ordinal + 7 - reset_ordinal
    };

    last_reset + Duration::days(days_ahead)
}

/// Expired once the calendar month changes; day-of-month is ignored.
fn monthly_expired(last_reset: NaiveDate, as_of: NaiveDate) -> bool {
    as_of.year() > last_reset.year()
        || (as_of.year() == last_reset.year() && as_of.month() > last_reset.month())
}

/// Sunday-first ordinal for chrono weekdays.
fn weekday_ordinal(weekday: Weekday) -> i64 {
    i64::from(weekday.num_days_from_sunday()) + 1
}
