//! Dispatch assignment record
//!
//! The job's own `driverId`/`truckId` fields are the live assignment. This
//! record is the persisted projection of those fields, and the form older
//! data used before jobs carried them.

use haulbook_types::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::{self, clean, merge};
use super::job::Job;
use super::record::{date_or_today, id_or_new, stamps, Draft, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchAssignment {
    pub id: String,
    pub job_id: String,
    pub date: String,
    pub driver_id: String,
    pub truck_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DispatchAssignment {
    /// Projection of an assigned job; `None` when the job has neither a
    /// driver nor a truck.
    pub fn for_job(job: &Job) -> Option<Self> {
        if !job.has_driver() && !job.has_truck() {
            return None;
        }
        Some(Self {
            id: format!("dispatch_{}", job.id),
            job_id: job.id.clone(),
            date: job.date.clone(),
            driver_id: job.driver_id.clone(),
            truck_id: job.truck_id.clone(),
            created_at: job.created_at,
            updated_at: job.updated_at,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchDraft {
    pub id: Option<String>,
    pub job_id: Option<String>,
    pub date: Option<String>,
    pub driver_id: Option<String>,
    pub truck_id: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl Draft for DispatchDraft {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            id: fields::text(obj, &["id"]),
            job_id: fields::text(obj, &["jobId"]),
            date: fields::text(obj, &["date"]),
            driver_id: fields::text(obj, &["driverId"]),
            truck_id: fields::text(obj, &["truckId"]),
            created_at: fields::timestamp(obj, "createdAt"),
            updated_at: fields::timestamp(obj, "updatedAt"),
        }
    }

    fn merge(self, patch: Self) -> Self {
        Self {
            id: merge(self.id, patch.id),
            job_id: merge(self.job_id, patch.job_id),
            date: merge(self.date, patch.date),
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

impl From<DispatchAssignment> for DispatchDraft {
    fn from(a: DispatchAssignment) -> Self {
        Self {
            id: Some(a.id),
            job_id: Some(a.job_id),
            date: Some(a.date),
            driver_id: Some(a.driver_id),
            truck_id: Some(a.truck_id),
            created_at: Some(a.created_at),
            updated_at: Some(a.updated_at),
        }
    }
}

impl Record for DispatchAssignment {
    type Draft = DispatchDraft;
    const KIND: &'static str = "dispatch";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }

    fn normalize_at(draft: DispatchDraft, now: Timestamp) -> Self {
        let (created_at, updated_at) = stamps(draft.created_at, draft.updated_at, now);
        Self {
            id: id_or_new(draft.id, Self::KIND),
            job_id: clean(draft.job_id),
            date: date_or_today(draft.date),
            driver_id: clean(draft.driver_id),
            truck_id: clean(draft.truck_id),
            created_at,
            updated_at,
        }
    }
}

pub fn normalize_dispatch(draft: DispatchDraft) -> DispatchAssignment {
    DispatchAssignment::normalize(draft)
}
