//! Truck fleet entry

use haulbook_types::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::{self, clean, merge};
use super::record::{id_or_new, stamps, Draft, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truck {
    pub id: String,
    /// Display label or unit number
    pub label: String,
    pub plate: String,
    /// Free text, e.g. "26 ft" or "10000 lb"
    pub capacity: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TruckDraft {
    pub id: Option<String>,
    pub label: Option<String>,
    pub plate: Option<String>,
    pub capacity: Option<String>,
    pub active: Option<bool>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl Draft for TruckDraft {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            id: fields::text(obj, &["id"]),
            // older records call it `unit`
            label: fields::text(obj, &["label", "unit"]),
            plate: fields::text(obj, &["plate"]),
            capacity: fields::text(obj, &["capacity"]),
            active: fields::flag(obj, "active"),
            created_at: fields::timestamp(obj, "createdAt"),
            updated_at: fields::timestamp(obj, "updatedAt"),
        }
    }

    fn merge(self, patch: Self) -> Self {
        Self {
            id: merge(self.id, patch.id),
            label: merge(self.label, patch.label),
            plate: merge(self.plate, patch.plate),
            capacity: merge(self.capacity, patch.capacity),
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

impl From<Truck> for TruckDraft {
    fn from(truck: Truck) -> Self {
        Self {
            id: Some(truck.id),
            label: Some(truck.label),
            plate: Some(truck.plate),
            capacity: Some(truck.capacity),
            active: Some(truck.active),
            created_at: Some(truck.created_at),
            updated_at: Some(truck.updated_at),
        }
    }
}

impl Record for Truck {
    type Draft = TruckDraft;
    const KIND: &'static str = "truck";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }

    fn normalize_at(draft: TruckDraft, now: Timestamp) -> Self {
        let (created_at, updated_at) = stamps(draft.created_at, draft.updated_at, now);
        Self {
            id: id_or_new(draft.id, Self::KIND),
            label: clean(draft.label),
            plate: clean(draft.plate),
            capacity: clean(draft.capacity),
            active: draft.active.unwrap_or(true),
            created_at,
            updated_at,
        }
    }
}

pub fn normalize_truck(draft: TruckDraft) -> Truck {
    Truck::normalize(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unit_alias_and_numeric_capacity() {
        let t = Truck::from_value(&json!({"unit": "Box 3", "capacity": 26, "plate": "7ABC123"}), 1).unwrap();
        assert_eq!(t.label, "Box 3");
        assert_eq!(t.capacity, "26");
        assert!(t.active);
    }

    #[test]
    fn test_label_wins_over_unit() {
        let t = Truck::from_value(&json!({"unit": "old", "label": "new"}), 1).unwrap();
        assert_eq!(t.label, "new");
        let again = Truck::normalize_at(TruckDraft::from(t.clone()), 5);
        assert_eq!(t, again);
    }
}
