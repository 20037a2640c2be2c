//! CSV export of a month's jobs and receipts

use std::fs::File;
use std::io::Write;
use std::path::Path;

use haulbook_domain::model::{Job, Receipt};
use haulbook_types::{Error, Result};
use serde::Serialize;

/// One line of the export. Jobs and receipts share the column set.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    date: &'a str,
    id: &'a str,
    /// Customer for jobs, vendor for receipts
    name: &'a str,
    amount: String,
    status: &'static str,
    category: &'static str,
    job_id: &'a str,
}

impl<'a> ExportRow<'a> {
    fn job(job: &'a Job) -> Self {
        Self {
            kind: "job",
            date: &job.date,
            id: &job.id,
            name: &job.customer,
            amount: format!("{:.2}", job.amount),
            status: job.status.as_str(),
            category: "",
            job_id: "",
        }
    }

    fn receipt(receipt: &'a Receipt) -> Self {
        Self {
            kind: "receipt",
            date: &receipt.date,
            id: &receipt.id,
            name: &receipt.vendor,
            amount: format!("{:.2}", receipt.amount),
            status: "",
            category: receipt.category.as_str(),
            job_id: &receipt.job_id,
        }
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::Csv(e.to_string())
}

/// Write jobs then receipts, with a header row
pub fn write_month_csv<W: Write>(writer: W, jobs: &[&Job], receipts: &[&Receipt]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for job in jobs {
        csv.serialize(ExportRow::job(job)).map_err(csv_error)?;
    }
    for receipt in receipts {
        csv.serialize(ExportRow::receipt(receipt)).map_err(csv_error)?;
    }
    if jobs.is_empty() && receipts.is_empty() {
        // serialize() emits the header lazily; write it for an empty month too
        csv.write_record(["type", "date", "id", "name", "amount", "status", "category", "job_id"])
            .map_err(csv_error)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_month_csv(path: &Path, jobs: &[&Job], receipts: &[&Receipt]) -> Result<()> {
    let file = File::create(path)?;
    write_month_csv(file, jobs, receipts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulbook_domain::model::{JobDraft, ReceiptDraft, Record};

    #[test]
    fn test_rows_and_header() {
        let job = Job::normalize_at(
            JobDraft {
                id: Some("j1".into()),
                date: Some("2025-06-10".into()),
                customer: Some("Acme, Inc.".into()),
                amount: Some(500.0),
                ..Default::default()
            },
            1,
        );
        let receipt = Receipt::normalize_at(
            ReceiptDraft {
                id: Some("r1".into()),
                date: Some("2025-06-10".into()),
                vendor: Some("Shell".into()),
                category: Some("fuel".into()),
                amount: Some(40.0),
                job_id: Some("j1".into()),
                ..Default::default()
            },
            1,
        );

        let mut out = Vec::new();
        write_month_csv(&mut out, &[&job], &[&receipt]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "type,date,id,name,amount,status,category,job_id");
        assert_eq!(lines[1], "job,2025-06-10,j1,\"Acme, Inc.\",500.00,scheduled,,");
        assert_eq!(lines[2], "receipt,2025-06-10,r1,Shell,40.00,,Fuel,j1");
    }

    #[test]
    fn test_empty_month_still_has_header() {
        let mut out = Vec::new();
        write_month_csv(&mut out, &[], &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim_end(), "type,date,id,name,amount,status,category,job_id");
    }
}
