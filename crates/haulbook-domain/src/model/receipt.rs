//! Receipt: an expense, optionally tied to a job

use haulbook_types::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::{self, clean, merge};
use super::record::{amount, date_or_today, id_or_new, stamps, Draft, Record};

/// Known expense categories. Anything else is filed under `Other`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptCategory {
    Fuel,
    Tolls,
    Meals,
    Supplies,
    Equipment,
    Maintenance,
    Labor,
    Lodging,
    Parking,
    #[default]
    Other,
}

impl ReceiptCategory {
    pub const ALL: [ReceiptCategory; 10] = [
        ReceiptCategory::Fuel,
        ReceiptCategory::Tolls,
        ReceiptCategory::Meals,
        ReceiptCategory::Supplies,
        ReceiptCategory::Equipment,
        ReceiptCategory::Maintenance,
        ReceiptCategory::Labor,
        ReceiptCategory::Lodging,
        ReceiptCategory::Parking,
        ReceiptCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptCategory::Fuel => "Fuel",
            ReceiptCategory::Tolls => "Tolls",
            ReceiptCategory::Meals => "Meals",
            ReceiptCategory::Supplies => "Supplies",
            ReceiptCategory::Equipment => "Equipment",
            ReceiptCategory::Maintenance => "Maintenance",
            ReceiptCategory::Labor => "Labor",
            ReceiptCategory::Lodging => "Lodging",
            ReceiptCategory::Parking => "Parking",
            ReceiptCategory::Other => "Other",
        }
    }

    /// Case-insensitive match against the known set
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(text))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for ReceiptCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    pub date: String,
    pub vendor: String,
    pub category: ReceiptCategory,
    pub notes: String,
    pub amount: f64,
    /// Linked job, empty when unlinked
    pub job_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Receipt {
    pub fn is_linked(&self) -> bool {
        !self.job_id.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiptDraft {
    pub id: Option<String>,
    pub date: Option<String>,
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub amount: Option<f64>,
    pub job_id: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl Draft for ReceiptDraft {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            id: fields::text(obj, &["id"]),
            date: fields::text(obj, &["date"]),
            vendor: fields::text(obj, &["vendor"]),
            category: fields::text(obj, &["category"]),
            notes: fields::text(obj, &["notes"]),
            amount: fields::money(obj, "amount"),
            job_id: fields::text(obj, &["jobId"]),
            created_at: fields::timestamp(obj, "createdAt"),
            updated_at: fields::timestamp(obj, "updatedAt"),
        }
    }

    fn merge(self, patch: Self) -> Self {
        Self {
            id: merge(self.id, patch.id),
            date: merge(self.date, patch.date),
            vendor: merge(self.vendor, patch.vendor),
            category: merge(self.category, patch.category),
            notes: merge(self.notes, patch.notes),
            amount: merge(self.amount, patch.amount),
            job_id: merge(self.job_id, patch.job_id),
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

impl From<Receipt> for ReceiptDraft {
    fn from(receipt: Receipt) -> Self {
        Self {
            id: Some(receipt.id),
            date: Some(receipt.date),
            vendor: Some(receipt.vendor),
            category: Some(receipt.category.as_str().to_string()),
            notes: Some(receipt.notes),
            amount: Some(receipt.amount),
            job_id: Some(receipt.job_id),
            created_at: Some(receipt.created_at),
            updated_at: Some(receipt.updated_at),
        }
    }
}

impl Record for Receipt {
    type Draft = ReceiptDraft;
    const KIND: &'static str = "receipt";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }

    fn normalize_at(draft: ReceiptDraft, now: Timestamp) -> Self {
        let (created_at, updated_at) = stamps(draft.created_at, draft.updated_at, now);
        Self {
            id: id_or_new(draft.id, Self::KIND),
            date: date_or_today(draft.date),
            vendor: clean(draft.vendor),
            category: draft
                .category
                .as_deref()
                .map(ReceiptCategory::parse)
                .unwrap_or_default(),
            notes: clean(draft.notes),
            amount: amount(draft.amount),
            job_id: clean(draft.job_id),
            created_at,
            updated_at,
        }
    }
}

pub fn normalize_receipt(draft: ReceiptDraft) -> Receipt {
    Receipt::normalize(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: Timestamp = 1_750_000_000_000;

    #[test]
    fn test_unknown_category_is_other() {
        let r = Receipt::from_value(&json!({"category": "Snacks"}), NOW).unwrap();
        assert_eq!(r.category, ReceiptCategory::Other);
        let r = Receipt::from_value(&json!({"category": " fuel "}), NOW).unwrap();
        assert_eq!(r.category, ReceiptCategory::Fuel);
        let r = Receipt::from_value(&json!({}), NOW).unwrap();
        assert_eq!(r.category, ReceiptCategory::Other);
    }

    #[test]
    fn test_category_serializes_as_label() {
        let r = Receipt::from_value(&json!({"id": "r1", "category": "tolls"}), NOW).unwrap();
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["category"], "Tolls");
        assert_eq!(value["jobId"], "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = Receipt::from_value(
            &json!({"vendor": " Shell ", "amount": "40.004", "jobId": "j1", "date": "2025-06-10"}),
            NOW,
        )
        .unwrap();
        let twice = Receipt::normalize_at(ReceiptDraft::from(once.clone()), NOW + 10);
        assert_eq!(once, twice);
        assert_eq!(once.vendor, "Shell");
        assert_eq!(once.amount, 40.0);
        assert!(once.is_linked());
    }
}
