//! Shared shape of every ledger record and its draft

use haulbook_types::timestamp::{advance, now_millis};
use haulbook_types::Timestamp;
use serde_json::{Map, Value};

/// Partial, untrusted form of a record. Every field is optional.
pub trait Draft: Default + Sized {
    /// Read a draft out of an untrusted JSON object. Never fails.
    fn from_object(obj: &Map<String, Value>) -> Self;

    /// Overlay `patch` on `self`; fields set in the patch win.
    fn merge(self, patch: Self) -> Self;

    /// Drop `id`, `createdAt` and `updatedAt` so a patch can't rewrite them.
    fn without_identity(self) -> Self;
}

/// A canonical ledger record, produced only by its normalizer.
pub trait Record: Clone + Sized {
    type Draft: Draft + From<Self>;

    /// Tag used in generated ids and log lines
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn updated_at(&self) -> Timestamp;
    fn set_updated_at(&mut self, at: Timestamp);

    /// Fill defaults and clamp types. Keeps id and timestamps when present,
    /// otherwise mints an id and stamps `now`.
    fn normalize_at(draft: Self::Draft, now: Timestamp) -> Self;

    fn normalize(draft: Self::Draft) -> Self {
        Self::normalize_at(draft, now_millis())
    }

    /// Normalize an untrusted JSON element. Non-objects yield `None`.
    fn from_value(value: &Value, now: Timestamp) -> Option<Self> {
        value
            .as_object()
            .map(|obj| Self::normalize_at(Self::Draft::from_object(obj), now))
    }

    /// Bump `updatedAt` without letting it move backwards
    fn touch(&mut self, now: Timestamp) {
        let at = advance(self.updated_at(), now);
        self.set_updated_at(at);
    }

    /// Apply a field patch in place. Identity fields are immutable.
    fn apply_patch(&mut self, patch: Self::Draft, now: Timestamp) {
        let merged = Self::Draft::from(self.clone()).merge(patch.without_identity());
        let mut next = Self::normalize_at(merged, now);
        next.touch(now);
        *self = next;
    }
}

/// Id from a draft, or a freshly minted one
pub(crate) fn id_or_new(id: Option<String>, kind: &str) -> String {
    id.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| haulbook_types::id::new_id(kind))
}

/// `(createdAt, updatedAt)` with `updatedAt` never before `createdAt`
pub(crate) fn stamps(
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
    now: Timestamp,
) -> (Timestamp, Timestamp) {
    let created = created_at.unwrap_or(now);
    let updated = updated_at.unwrap_or(created).max(created);
    (created, updated)
}

/// Canonical date key, today when missing or unparseable
pub(crate) fn date_or_today(date: Option<String>) -> String {
    date.as_deref()
        .and_then(haulbook_types::date_key::canonical_date_key)
        .unwrap_or_else(haulbook_types::date_key::today_key)
}

/// Entity amounts never go below zero
pub(crate) fn amount(value: Option<f64>) -> f64 {
    haulbook_types::money::to_money(value.unwrap_or(0.0)).max(0.0)
}
