//! Opaque identifiers for ledger records

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a new identifier tagged with `kind`, e.g. `job_4b1f...`.
///
/// Uniqueness comes from a v4 UUID. A process-wide sequence number is folded
/// into the tail so two ids minted in the same run can never be equal even if
/// the random source were to repeat.
pub fn new_id(kind: &str) -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let uuid = Uuid::new_v4().simple().to_string();
    let kind = kind.trim();
    if kind.is_empty() {
        format!("{}{:x}", uuid, seq)
    } else {
        format!("{}_{}{:x}", kind, uuid, seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_tagged_with_kind() {
        let id = new_id("job");
        assert!(id.starts_with("job_"));
        assert!(id.len() > "job_".len() + 30);
    }

    #[test]
    fn test_ids_never_repeat_within_run() {
        let ids: HashSet<String> = (0..1000).map(|_| new_id("receipt")).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_blank_kind_has_no_prefix() {
        let id = new_id("  ");
        assert!(!id.contains('_'));
    }
}
