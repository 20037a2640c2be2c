//! Application use cases

pub mod query_service;

pub use query_service::{day_view, month_view, DayView, MonthView};
