//! Query service: the calendar-first views the CLI renders
//!
//! A month view is the grid plus month totals; a day view is the workspace
//! for one date with its jobs, receipts, crew and totals.

use chrono::{Datelike, NaiveDate};
use haulbook_domain::model::{Job, Receipt};
use haulbook_domain::service::{
    day_summary, dispatch_board, double_bookings, month_calendar, month_to_date, month_totals,
    receipts_on_date, CalendarDay, DaySummary, DispatchRow, DoubleBooking, MonthTotals,
};
use haulbook_domain::Ledger;
use haulbook_types::date_key::{month_key, month_start};
use haulbook_types::{Error, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthView {
    pub month: String,
    pub totals: MonthTotals,
    /// Present only when `today` falls in the viewed month
    pub month_to_date: Option<MonthTotals>,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub summary: DaySummary,
    pub jobs: Vec<DispatchRow>,
    pub receipts: Vec<Receipt>,
    pub double_bookings: Vec<DoubleBooking>,
}

impl DayView {
    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().map(|row| &row.job).find(|j| j.id == id)
    }
}

/// Month grid and totals. `month` is 1-based.
pub fn month_view(ledger: &Ledger, year: i32, month: u32, today: NaiveDate) -> Result<MonthView> {
    let first = month_start(year, month)
        .ok_or_else(|| Error::InvalidInput(format!("no such month: {}-{}", year, month)))?;
    let month0 = month - 1;
    let in_month = today.year() == year && today.month() == month;
    Ok(MonthView {
        month: month_key(first),
        totals: month_totals(ledger, year, month0),
        month_to_date: in_month.then(|| month_to_date(ledger, today)),
        days: month_calendar(ledger, year, month0),
    })
}

pub fn day_view(ledger: &Ledger, date_key: &str) -> DayView {
    DayView {
        summary: day_summary(ledger, date_key),
        jobs: dispatch_board(ledger, date_key),
        receipts: receipts_on_date(ledger, date_key).into_iter().cloned().collect(),
        double_bookings: double_bookings(ledger, date_key),
    }
}
