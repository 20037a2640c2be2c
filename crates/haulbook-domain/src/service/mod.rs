//! Domain services

pub mod aggregation;
pub mod dispatch;
pub mod integrity;

pub use aggregation::{
    calendar_markers, daily_expense, daily_net, daily_revenue, day_summary, jobs_on_date,
    month_calendar, month_jobs, month_receipts, month_to_date, month_totals, receipts_on_date,
    CalendarDay, CalendarMarkers, DaySummary, MonthTotals,
};
pub use dispatch::{dispatch_board, double_bookings, DispatchRow, DoubleBooking, Resource};
