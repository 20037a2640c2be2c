//! Job: a scheduled move on a date

use haulbook_types::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::{self, clean, merge};
use super::record::{amount, date_or_today, id_or_new, stamps, Draft, Record};

/// User-driven job status. Any state may be set from any other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [JobStatus::Scheduled, JobStatus::Completed, JobStatus::Cancelled];

    /// Case-insensitive parse; unknown values fall back to `Scheduled`
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "completed" => JobStatus::Completed,
            "cancelled" | "canceled" => JobStatus::Cancelled,
            _ => JobStatus::Scheduled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled jobs stay on the calendar but earn nothing
    pub fn earns_revenue(&self) -> bool {
        !matches!(self, JobStatus::Cancelled)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    /// Date key (`YYYY-MM-DD`)
    pub date: String,
    pub customer: String,
    pub pickup: String,
    pub dropoff: String,
    pub notes: String,
    pub amount: f64,
    pub status: JobStatus,
    /// Assigned driver, empty when unassigned
    pub driver_id: String,
    /// Assigned truck, empty when unassigned
    pub truck_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    pub fn has_driver(&self) -> bool {
        !self.driver_id.is_empty()
    }

    pub fn has_truck(&self) -> bool {
        !self.truck_id.is_empty()
    }

    /// Amount counted toward revenue
    pub fn revenue(&self) -> f64 {
        if self.status.earns_revenue() {
            self.amount
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDraft {
    pub id: Option<String>,
    pub date: Option<String>,
    pub customer: Option<String>,
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
    pub notes: Option<String>,
    pub amount: Option<f64>,
    pub status: Option<String>,
    pub driver_id: Option<String>,
    pub truck_id: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl JobDraft {
    /// True when the record carries no dispatch fields at all (pre-dispatch data)
    pub fn lacks_assignment_fields(&self) -> bool {
        self.driver_id.is_none() && self.truck_id.is_none()
    }
}

impl Draft for JobDraft {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            id: fields::text(obj, &["id"]),
            date: fields::text(obj, &["date"]),
            customer: fields::text(obj, &["customer"]),
            pickup: fields::text(obj, &["pickup"]),
            dropoff: fields::text(obj, &["dropoff"]),
            notes: fields::text(obj, &["notes"]),
            amount: fields::money(obj, "amount"),
            status: fields::text(obj, &["status"]),
            driver_id: fields::text(obj, &["driverId"]),
            truck_id: fields::text(obj, &["truckId"]),
            created_at: fields::timestamp(obj, "createdAt"),
            updated_at: fields::timestamp(obj, "updatedAt"),
        }
    }

    fn merge(self, patch: Self) -> Self {
        Self {
            id: merge(self.id, patch.id),
            date: merge(self.date, patch.date),
            customer: merge(self.customer, patch.customer),
            pickup: merge(self.pickup, patch.pickup),
            dropoff: merge(self.dropoff, patch.dropoff),
            notes: merge(self.notes, patch.notes),
            amount: merge(self.amount, patch.amount),
            status: merge(self.status, patch.status),
            driver_id: merge(self.driver_id, patch.driver_id),
            truck_id: merge(self.truck_id, patch.truck_id),
            created_at: merge(self.created_at, patch.created_at),
            updated_at: merge(self.updated_at, patch.updated_at),
        }
    }

    fn without_identity(self) -> Self {
        Self {
            id: None,
            created_at: None,
            updated_at: None,
            ..self
        }
    }
}

impl From<Job> for JobDraft {
    fn from(job: Job) -> Self {
        Self {
            id: Some(job.id),
            date: Some(job.date),
            customer: Some(job.customer),
            pickup: Some(job.pickup),
            dropoff: Some(job.dropoff),
            notes: Some(job.notes),
            amount: Some(job.amount),
            status: Some(job.status.as_str().to_string()),
            driver_id: Some(job.driver_id),
            truck_id: Some(job.truck_id),
            created_at: Some(job.created_at),
            updated_at: Some(job.updated_at),
        }
    }
}

impl Record for Job {
    type Draft = JobDraft;
    const KIND: &'static str = "job";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }

    fn normalize_at(draft: JobDraft, now: Timestamp) -> Self {
        let (created_at, updated_at) = stamps(draft.created_at, draft.updated_at, now);
        Self {
            id: id_or_new(draft.id, Self::KIND),
            date: date_or_today(draft.date),
            customer: clean(draft.customer),
            pickup: clean(draft.pickup),
            dropoff: clean(draft.dropoff),
            notes: clean(draft.notes),
            amount: amount(draft.amount),
            status: draft.status.as_deref().map(JobStatus::parse).unwrap_or_default(),
            driver_id: clean(draft.driver_id),
            truck_id: clean(draft.truck_id),
            created_at,
            updated_at,
        }
    }
}

/// Normalize a partial job
pub fn normalize_job(draft: JobDraft) -> Job {
    Job::normalize(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: Timestamp = 1_750_000_000_000;

    fn from_json(value: Value) -> Job {
        Job::from_value(&value, NOW).unwrap()
    }

    #[test]
    fn test_fills_defaults() {
        let job = Job::normalize_at(JobDraft::default(), NOW);
        assert!(job.id.starts_with("job_"));
        assert_eq!(job.status, JobStatus::Scheduled);
        assert_eq!(job.amount, 0.0);
        assert_eq!(job.customer, "");
        assert_eq!(job.driver_id, "");
        assert_eq!(job.created_at, NOW);
        assert_eq!(job.updated_at, NOW);
        assert_eq!(job.date.len(), 10);
    }

    #[test]
    fn test_unknown_status_becomes_scheduled() {
        let job = from_json(json!({"status": "on-hold"}));
        assert_eq!(job.status, JobStatus::Scheduled);
        let job = from_json(json!({"status": " Canceled "}));
        assert_eq!(job.status, JobStatus::Cancelled);
    }

    #[test]
    fn test_coerces_untrusted_fields() {
        let job = from_json(json!({
            "id": "j1",
            "date": "2025-6-9",
            "customer": "  Acme  ",
            "amount": "499.999",
            "driverId": null,
            "createdAt": "2025-06-01T00:00:00Z",
        }));
        assert_eq!(job.id, "j1");
        assert_eq!(job.date, "2025-06-09");
        assert_eq!(job.customer, "Acme");
        assert_eq!(job.amount, 500.0);
        assert_eq!(job.driver_id, "");
        assert_eq!(job.updated_at, job.created_at);
    }

    #[test]
    fn test_amount_is_never_negative() {
        let job = from_json(json!({"amount": -25}));
        assert_eq!(job.amount, 0.0);
        let job = from_json(json!({"amount": "abc"}));
        assert_eq!(job.amount, 0.0);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            json!({}),
            json!({"id": " x ", "status": "COMPLETED", "amount": 12.345, "date": "2025-01-31T22:00:00"}),
            json!({"customer": 42, "driverId": "d1", "updatedAt": 5, "createdAt": 10}),
        ];
        for input in inputs {
            let once = from_json(input);
            let twice = Job::normalize_at(JobDraft::from(once.clone()), NOW + 1);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_large_amount_survives_repeated_normalize() {
        let draft = JobDraft {
            amount: Some(16900466386426.465),
            ..Default::default()
        };
        let once = Job::normalize_at(draft, NOW);
        assert_eq!(once.amount, 16900466386426.47);
        let mut job = once.clone();
        for _ in 0..3 {
            job = Job::normalize_at(JobDraft::from(job), NOW);
        }
        assert_eq!(job.amount, once.amount);
    }

    #[test]
    fn test_patch_keeps_identity_and_advances_updated_at() {
        let mut job = from_json(json!({"id": "j1", "createdAt": 100, "updatedAt": 200, "amount": 10}));
        let patch = JobDraft {
            id: Some("hijack".into()),
            status: Some("cancelled".into()),
            amount: Some(20.0),
            created_at: Some(1),
            ..Default::default()
        };
        job.apply_patch(patch, 150);
        assert_eq!(job.id, "j1");
        assert_eq!(job.created_at, 100);
        assert_eq!(job.updated_at, 200);
        assert_eq!(job.status, JobStatus::Cancelled);
        assert_eq!(job.amount, 20.0);

        job.apply_patch(JobDraft::default(), 300);
        assert_eq!(job.updated_at, 300);
    }

    #[test]
    fn test_cancelled_job_earns_nothing() {
        let job = from_json(json!({"amount": 50, "status": "cancelled"}));
        assert_eq!(job.revenue(), 0.0);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(Job::from_value(&json!("job"), NOW).is_none());
        assert!(Job::from_value(&json!([1, 2]), NOW).is_none());
    }

    #[test]
    fn test_legacy_record_without_dispatch_fields() {
        let obj = json!({"id": "old", "date": "2024-01-02"});
        let draft = JobDraft::from_object(obj.as_object().unwrap());
        assert!(draft.lacks_assignment_fields());
    }
}
