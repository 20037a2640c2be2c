//! Dispatch views for a single day

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ledger::Ledger;
use crate::model::Job;

use super::aggregation::jobs_on_date;

/// A job of the day with its crew resolved to display names
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRow {
    pub job: Job,
    /// `None` when unassigned or the driver no longer exists
    pub driver_name: Option<String>,
    pub truck_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Driver,
    Truck,
}

/// A driver or truck assigned to more than one live job on the same day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoubleBooking {
    pub resource: Resource,
    pub resource_id: String,
    pub job_ids: Vec<String>,
}

pub fn dispatch_board(ledger: &Ledger, date_key: &str) -> Vec<DispatchRow> {
    jobs_on_date(ledger, date_key)
        .into_iter()
        .map(|job| DispatchRow {
            driver_name: ledger.driver(&job.driver_id).map(|d| d.name.clone()),
            truck_label: ledger.truck(&job.truck_id).map(|t| t.label.clone()),
            job: job.clone(),
        })
        .collect()
}

/// Drivers and trucks booked on two or more non-cancelled jobs that day.
/// Informational only; nothing prevents the booking.
pub fn double_bookings(ledger: &Ledger, date_key: &str) -> Vec<DoubleBooking> {
    let mut usage: BTreeMap<(Resource, &str), Vec<String>> = BTreeMap::new();
    for job in jobs_on_date(ledger, date_key) {
        if !job.status.earns_revenue() {
            continue;
        }
        if job.has_driver() {
            usage
                .entry((Resource::Driver, job.driver_id.as_str()))
                .or_default()
                .push(job.id.clone());
        }
        if job.has_truck() {
            usage
                .entry((Resource::Truck, job.truck_id.as_str()))
                .or_default()
                .push(job.id.clone());
        }
    }

    usage
        .into_iter()
        .filter(|(_, job_ids)| job_ids.len() > 1)
        .map(|((resource, id), job_ids)| DoubleBooking {
            resource,
            resource_id: id.to_string(),
            job_ids,
        })
        .collect()
}
