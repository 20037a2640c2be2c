//! Read-side rollups over a ledger snapshot
//!
//! Everything here is pure: same ledger in, same numbers out. Cancelled jobs
//! are counted on the calendar but never earn revenue.

use chrono::{Datelike, NaiveDate};
use haulbook_types::date_key::{date_key, days_in_month, month_start, try_parse_date_key};
use haulbook_types::money::{sum_money, to_money};
use serde::Serialize;

use crate::ledger::Ledger;
use crate::model::{Job, Receipt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthTotals {
    pub revenue: f64,
    pub expenses: f64,
    pub net: f64,
}

impl MonthTotals {
    fn from_parts(revenue: f64, expenses: f64) -> Self {
        Self {
            revenue,
            expenses,
            net: to_money(revenue - expenses),
        }
    }
}

/// What a calendar cell needs to decide which badges to draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMarkers {
    pub job_count: usize,
    /// Jobs that earn revenue, i.e. `job_count` with cancelled jobs left out
    pub cancelled_excluded_job_count: usize,
    pub receipt_count: usize,
}

impl CalendarMarkers {
    pub fn is_empty(&self) -> bool {
        self.job_count == 0 && self.receipt_count == 0
    }

    pub fn cancelled_job_count(&self) -> usize {
        self.job_count.saturating_sub(self.cancelled_excluded_job_count)
    }
}

/// Totals for a single day workspace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub revenue: f64,
    pub expenses: f64,
    pub net: f64,
    pub markers: CalendarMarkers,
}

/// One cell of the month grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub day: u32,
    pub markers: CalendarMarkers,
    pub net: f64,
}

pub fn jobs_on_date<'a>(ledger: &'a Ledger, date_key: &str) -> Vec<&'a Job> {
    ledger.jobs.iter().filter(|j| j.date == date_key).collect()
}

pub fn receipts_on_date<'a>(ledger: &'a Ledger, date_key: &str) -> Vec<&'a Receipt> {
    ledger.receipts.iter().filter(|r| r.date == date_key).collect()
}

/// Job amounts on the day, cancelled jobs excluded
pub fn daily_revenue(ledger: &Ledger, date_key: &str) -> f64 {
    sum_money(jobs_on_date(ledger, date_key).into_iter().map(Job::revenue))
}

pub fn daily_expense(ledger: &Ledger, date_key: &str) -> f64 {
    sum_money(receipts_on_date(ledger, date_key).into_iter().map(|r| r.amount))
}

/// Revenue minus expense; may be negative
pub fn daily_net(ledger: &Ledger, date_key: &str) -> f64 {
    to_money(daily_revenue(ledger, date_key) - daily_expense(ledger, date_key))
}

pub fn calendar_markers(ledger: &Ledger, date_key: &str) -> CalendarMarkers {
    let jobs = jobs_on_date(ledger, date_key);
    CalendarMarkers {
        job_count: jobs.len(),
        cancelled_excluded_job_count: jobs.iter().filter(|j| j.status.earns_revenue()).count(),
        receipt_count: receipts_on_date(ledger, date_key).len(),
    }
}

pub fn day_summary(ledger: &Ledger, date_key: &str) -> DaySummary {
    let revenue = daily_revenue(ledger, date_key);
    let expenses = daily_expense(ledger, date_key);
    DaySummary {
        date: date_key.to_string(),
        revenue,
        expenses,
        net: to_money(revenue - expenses),
        markers: calendar_markers(ledger, date_key),
    }
}

/// Whether `date` parses and falls in the month; `through_day` caps the day.
/// Malformed dates never match.
fn in_month(date: &str, year: i32, month0: u32, through_day: Option<u32>) -> bool {
    let Some(parsed) = try_parse_date_key(date) else {
        return false;
    };
    parsed.year() == year
        && parsed.month0() == month0
        && through_day.map_or(true, |last| parsed.day() <= last)
}

fn totals_where(ledger: &Ledger, year: i32, month0: u32, through_day: Option<u32>) -> MonthTotals {
    let revenue = sum_money(
        ledger
            .jobs
            .iter()
            .filter(|j| in_month(&j.date, year, month0, through_day))
            .map(Job::revenue),
    );
    let expenses = sum_money(
        ledger
            .receipts
            .iter()
            .filter(|r| in_month(&r.date, year, month0, through_day))
            .map(|r| r.amount),
    );
    MonthTotals::from_parts(revenue, expenses)
}

/// Totals for a calendar month. `month0` is zero-based (0 = January).
pub fn month_totals(ledger: &Ledger, year: i32, month0: u32) -> MonthTotals {
    totals_where(ledger, year, month0, None)
}

/// Totals from the first of `today`'s month through `today`
pub fn month_to_date(ledger: &Ledger, today: NaiveDate) -> MonthTotals {
    totals_where(ledger, today.year(), today.month0(), Some(today.day()))
}

/// Jobs dated in the month, ordered by date
pub fn month_jobs(ledger: &Ledger, year: i32, month0: u32) -> Vec<&Job> {
    let mut jobs: Vec<_> = ledger
        .jobs
        .iter()
        .filter(|j| in_month(&j.date, year, month0, None))
        .collect();
    jobs.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
    jobs
}

/// Receipts dated in the month, ordered by date
pub fn month_receipts(ledger: &Ledger, year: i32, month0: u32) -> Vec<&Receipt> {
    let mut receipts: Vec<_> = ledger
        .receipts
        .iter()
        .filter(|r| in_month(&r.date, year, month0, None))
        .collect();
    receipts.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
    receipts
}

/// Month grid: one entry per day. Empty for an invalid month.
pub fn month_calendar(ledger: &Ledger, year: i32, month0: u32) -> Vec<CalendarDay> {
    let month = month0.saturating_add(1);
    let Some(first) = month_start(year, month) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take(days_in_month(year, month) as usize)
        .map(|date| {
            let key = date_key(date);
            CalendarDay {
                day: date.day(),
                markers: calendar_markers(ledger, &key),
                net: daily_net(ledger, &key),
                date: key,
            }
        })
        .collect()
}
