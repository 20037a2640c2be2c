//! Month export use case

use std::path::PathBuf;

use haulbook_domain::service::{month_jobs, month_receipts};
use haulbook_domain::Ledger;
use haulbook_infra::csv_export::export_month_csv;
use haulbook_types::date_key::{month_key, month_start};
use haulbook_types::{Error, Result};
use tracing::debug;

/// What an export wrote
#[derive(Debug, Clone, PartialEq)]
pub struct MonthExport {
    pub path: PathBuf,
    pub jobs: usize,
    pub receipts: usize,
}

/// Default file name for a month, e.g. `haulbook-2025-06.csv`
pub fn default_export_path(year: i32, month: u32) -> Option<PathBuf> {
    month_start(year, month).map(|first| PathBuf::from(format!("haulbook-{}.csv", month_key(first))))
}

/// Write a month's jobs and receipts as CSV. `month` is 1-based.
pub fn export_month(ledger: &Ledger, year: i32, month: u32, output: Option<PathBuf>) -> Result<MonthExport> {
    let default_path = default_export_path(year, month)
        .ok_or_else(|| Error::InvalidInput(format!("no such month: {}-{}", year, month)))?;
    let path = output.unwrap_or(default_path);

    let jobs = month_jobs(ledger, year, month - 1);
    let receipts = month_receipts(ledger, year, month - 1);
    export_month_csv(&path, &jobs, &receipts)?;
    debug!(path = %path.display(), jobs = jobs.len(), receipts = receipts.len(), "month exported");

    Ok(MonthExport {
        path,
        jobs: jobs.len(),
        receipts: receipts.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulbook_domain::model::{Job, JobDraft, Record};
    use tempfile::tempdir;

    #[test]
    fn test_export_counts_only_the_month() {
        let ledger = Ledger {
            jobs: ["2025-06-01", "2025-06-30", "2025-07-01"]
                .into_iter()
                .map(|date| {
                    Job::normalize_at(
                        JobDraft {
                            date: Some(date.into()),
                            ..Default::default()
                        },
                        1,
                    )
                })
                .collect(),
            ..Default::default()
        };
        let dir = tempdir().unwrap();
        let out = dir.path().join("june.csv");
        let export = export_month(&ledger, 2025, 6, Some(out.clone())).unwrap();
        assert_eq!(export.jobs, 2);
        assert_eq!(export.receipts, 0);
        let text = std::fs::read_to_string(out).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_default_path_and_bad_month() {
        assert_eq!(default_export_path(2025, 6), Some(PathBuf::from("haulbook-2025-06.csv")));
        assert!(export_month(&Ledger::default(), 2025, 13, None).is_err());
    }
}
