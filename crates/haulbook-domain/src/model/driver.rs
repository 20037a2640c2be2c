//! Driver roster entry

use haulbook_types::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::{self, clean, clean_or, merge};
use super::record::{id_or_new, stamps, Draft, Record};

pub const DEFAULT_ROLE: &str = "Driver";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub role: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverDraft {
    pub id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl Draft for DriverDraft {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            id: fields::text(obj, &["id"]),
            name: fields::text(obj, &["name"]),
            phone: fields::text(obj, &["phone"]),
            role: fields::text(obj, &["role"]),
            active: fields::flag(obj, "active"),
            created_at: fields::timestamp(obj, "createdAt"),
            updated_at: fields::timestamp(obj, "updatedAt"),
        }
    }

    fn merge(self, patch: Self) -> Self {
        Self {
            id: merge(self.id, patch.id),
            name: merge(self.name, patch.name),
            phone: merge(self.phone, patch.phone),
            role: merge(self.role, patch.role),
            active: merge(self.active, patch.active),
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

impl From<Driver> for DriverDraft {
    fn from(driver: Driver) -> Self {
        Self {
            id: Some(driver.id),
            name: Some(driver.name),
            phone: Some(driver.phone),
            role: Some(driver.role),
            active: Some(driver.active),
            created_at: Some(driver.created_at),
            updated_at: Some(driver.updated_at),
        }
    }
}

impl Record for Driver {
    type Draft = DriverDraft;
    const KIND: &'static str = "driver";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }

    fn normalize_at(draft: DriverDraft, now: Timestamp) -> Self {
        let (created_at, updated_at) = stamps(draft.created_at, draft.updated_at, now);
        Self {
            id: id_or_new(draft.id, Self::KIND),
            name: clean(draft.name),
            phone: clean(draft.phone),
            role: clean_or(draft.role, DEFAULT_ROLE),
            active: draft.active.unwrap_or(true),
            created_at,
            updated_at,
        }
    }
}

pub fn normalize_driver(draft: DriverDraft) -> Driver {
    Driver::normalize(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let d = Driver::from_value(&json!({"name": " Sam "}), 1).unwrap();
        assert_eq!(d.name, "Sam");
        assert_eq!(d.role, "Driver");
        assert!(d.active);
        assert!(d.id.starts_with("driver_"));
    }

    #[test]
    fn test_inactive_string_flag() {
        let d = Driver::from_value(&json!({"active": "false", "role": "Helper"}), 1).unwrap();
        assert!(!d.active);
        assert_eq!(d.role, "Helper");
        let again = Driver::normalize_at(DriverDraft::from(d.clone()), 2);
        assert_eq!(d, again);
    }
}
