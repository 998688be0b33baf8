//! Paycheck schedule and expense urgency
//!
//! The paycheck series is the arithmetic progression
//! `P_i = last_paycheck_date + interval * i`. An expense's urgency bucket
//! depends on where its due date falls relative to today and the next two
//! paychecks.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{FixedExpense, PaycheckSettings};

/// Urgency buckets for the expense list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpenseUrgency {
    /// Fully paid
    Paid,
    /// Unpaid and due before today
    Overdue,
    /// Due before the next paycheck lands
    DueThisWeek,
    /// Due in the paycheck period after the next one
    DueNextCheck,
    /// Due later than that, or the schedule is unknown
    Future,
}

/// A resolved paycheck schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaycheckSchedule {
    anchor: NaiveDate,
    interval_days: i64,
}

impl PaycheckSchedule {
    /// Build a schedule from the settings singleton; `None` until the user
    /// has recorded a paycheck date
    pub fn from_settings(settings: &PaycheckSettings) -> Option<Self> {
        settings.last_paycheck_date.map(|anchor| Self {
            anchor,
            interval_days: settings.frequency.interval_days(),
        })
    }

    /// First element of the paycheck series strictly after `today`
    pub fn next_paycheck(&self, today: NaiveDate) -> NaiveDate {
        let elapsed = (today - self.anchor).num_days();
        let steps = elapsed.div_euclid(self.interval_days) + 1;
        self.anchor + Duration::days(steps * self.interval_days)
    }

    /// The next `count` paydays after `today`
    pub fn upcoming(&self, today: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let first = self.next_paycheck(today);
        (0..count as i64)
            .map(|i| first + Duration::days(i * self.interval_days))
            .collect()
    }
}

/// Classify one expense's urgency
///
/// Paid wins over everything; an unpaid expense due before today is
/// Overdue regardless of the schedule. Without a schedule or a due date
/// everything else is Future.
pub fn classify(
    expense: &FixedExpense,
    schedule: Option<&PaycheckSchedule>,
    today: NaiveDate,
) -> ExpenseUrgency {
    if expense.is_paid() {
        return ExpenseUrgency::Paid;
    }

    let Some(due) = expense.due_date else {
        return ExpenseUrgency::Future;
    };

    if due < today {
        return ExpenseUrgency::Overdue;
    }

    let Some(schedule) = schedule else {
        return ExpenseUrgency::Future;
    };

    let next = schedule.next_paycheck(today);
    if due < next {
        ExpenseUrgency::DueThisWeek
    } else if due < next + Duration::days(schedule.interval_days) {
        ExpenseUrgency::DueNextCheck
    } else {
        ExpenseUrgency::Future
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, ExpenseId, Money, PaymentSource};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn schedule(anchor: &str) -> PaycheckSchedule {
        PaycheckSchedule::from_settings(&PaycheckSettings::anchored(date(anchor))).unwrap()
    }

    fn expense(due: Option<&str>, paid: bool) -> FixedExpense {
        let mut e = FixedExpense::new(
            ExpenseId::new(1),
            "Bill",
            Money::from_major(100),
            "Housing",
            PaymentSource::Account {
                account_id: AccountId::new(1),
            },
        );
        e.due_date = due.map(date);
        if paid {
            e.paid_amount = e.amount;
            e.refresh_status();
        }
        e
    }

    #[test]
    fn test_next_paycheck_steps_forward() {
        let s = schedule("2026-08-01");
        assert_eq!(s.next_paycheck(date("2026-08-07")), date("2026-08-15"));
        // On payday itself the next one is a full interval out
        assert_eq!(s.next_paycheck(date("2026-08-01")), date("2026-08-15"));
        // Months after the anchor the series is still aligned
        assert_eq!(s.next_paycheck(date("2026-10-02")), date("2026-10-10"));
    }

    #[test]
    fn test_next_paycheck_with_future_anchor() {
        let s = schedule("2026-09-01");
        // Anchor lies ahead of today; the anchor itself is the next payday
        assert_eq!(s.next_paycheck(date("2026-08-07")), date("2026-09-01"));
    }

    #[test]
    fn test_upcoming_series() {
        let s = schedule("2026-08-01");
        assert_eq!(
            s.upcoming(date("2026-08-07"), 3),
            vec![date("2026-08-15"), date("2026-08-29"), date("2026-09-12")]
        );
    }

    #[test]
    fn test_classify_buckets() {
        let s = schedule("2026-08-01");
        let today = date("2026-08-07");
        // next paycheck: 2026-08-15; the one after: 2026-08-29

        assert_eq!(
            classify(&expense(Some("2026-08-01"), true), Some(&s), today),
            ExpenseUrgency::Paid
        );
        assert_eq!(
            classify(&expense(Some("2026-08-06"), false), Some(&s), today),
            ExpenseUrgency::Overdue
        );
        assert_eq!(
            classify(&expense(Some("2026-08-14"), false), Some(&s), today),
            ExpenseUrgency::DueThisWeek
        );
        assert_eq!(
            classify(&expense(Some("2026-08-15"), false), Some(&s), today),
            ExpenseUrgency::DueNextCheck
        );
        assert_eq!(
            classify(&expense(Some("2026-08-28"), false), Some(&s), today),
            ExpenseUrgency::DueNextCheck
        );
        assert_eq!(
            classify(&expense(Some("2026-08-29"), false), Some(&s), today),
            ExpenseUrgency::Future
        );
    }

    #[test]
    fn test_classify_today_is_not_overdue() {
        let s = schedule("2026-08-01");
        let today = date("2026-08-07");
        assert_eq!(
            classify(&expense(Some("2026-08-07"), false), Some(&s), today),
            ExpenseUrgency::DueThisWeek
        );
    }

    #[test]
    fn test_classify_without_schedule() {
        let today = date("2026-08-07");
        assert_eq!(
            classify(&expense(Some("2026-08-20"), false), None, today),
            ExpenseUrgency::Future
        );
        // Overdue and Paid still apply without a schedule
        assert_eq!(
            classify(&expense(Some("2026-08-01"), false), None, today),
            ExpenseUrgency::Overdue
        );
    }

    #[test]
    fn test_classify_without_due_date() {
        let s = schedule("2026-08-01");
        assert_eq!(
            classify(&expense(None, false), Some(&s), date("2026-08-07")),
            ExpenseUrgency::Future
        );
    }

    #[test]
    fn test_schedule_requires_anchor() {
        assert!(PaycheckSchedule::from_settings(&PaycheckSettings::default()).is_none());
    }
}
