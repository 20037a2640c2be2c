//! Command implementations

use std::path::PathBuf;

use chrono::Datelike;
use haulbook_app::app::{day_view, month_view};
use haulbook_app::config::Config;
use haulbook_app::export::export_month;
use haulbook_app::repository::{open_store, AppStore};
use haulbook_domain::model::{
    DriverDraft, Job, JobDraft, JobStatus, Receipt, ReceiptCategory, ReceiptDraft, TruckDraft,
};
use haulbook_domain::service::{dispatch_board, double_bookings};
use haulbook_domain::Ledger;
use haulbook_types::date_key::{date_key, parse_month_key, today, today_key, try_parse_date_key};
use haulbook_types::money::format_money;
use haulbook_types::{Error, OutputFormat, Result};
use tracing::debug;

use crate::cli::{
    Cli, Commands, DispatchAction, DriverAction, DriverFields, JobAction, JobFields, ListFilter,
    ReceiptAction, ReceiptFields, TruckAction, TruckFields,
};
use crate::output;

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir.clone();
    }
    let format = cli.format.unwrap_or(config.output_format);
    debug!(data_dir = ?config.data_dir, format = %format, "configuration resolved");

    let mut store = match &cli.command {
        Commands::Config {
            show,
            set_data_dir,
            set_output,
            set_seed,
            reset,
        } => return cmd_config(*show, set_data_dir.clone(), *set_output, *set_seed, *reset),
        _ => open_store(&config),
    };

    let result = match cli.command {
        Commands::Month { month } => cmd_month(&store, format, month.as_deref()),
        Commands::Day { date } => cmd_day(&store, format, date.as_deref()),
        Commands::Job { action } => cmd_job(&mut store, format, action),
        Commands::Receipt { action } => cmd_receipt(&mut store, format, action),
        Commands::Driver { action } => cmd_driver(&mut store, format, action),
        Commands::Truck { action } => cmd_truck(&mut store, format, action),
        Commands::Dispatch { action } => cmd_dispatch(&mut store, format, action),
        Commands::Export { month, output } => cmd_export(&store, month.as_deref(), output),
        // handled before the store is opened
        Commands::Config { .. } => Ok(()),
    };

    if let Some(e) = store.persistence_error() {
        eprintln!("Warning: changes could not be saved and will be lost on exit ({})", e);
    }
    result
}

/// `YYYY-MM` or the current month, as (year, 1-based month)
fn resolve_month(text: Option<&str>) -> Result<(i32, u32)> {
    match text {
        Some(text) => parse_month_key(text)
            .ok_or_else(|| Error::InvalidInput(format!("month must be YYYY-MM, got '{}'", text))),
        None => {
            let now = today();
            Ok((now.year(), now.month()))
        }
    }
}

/// `YYYY-MM-DD` or today, canonicalized
fn resolve_date(text: Option<&str>) -> Result<String> {
    match text {
        Some(text) => try_parse_date_key(text)
            .map(date_key)
            .ok_or_else(|| Error::InvalidInput(format!("date must be YYYY-MM-DD, got '{}'", text))),
        None => Ok(today_key()),
    }
}

fn valid_amount(amount: f64, what: &str) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidInput(format!("{} must be a non-negative number", what)));
    }
    Ok(amount)
}

fn valid_category(text: &str) -> Result<String> {
    let category = ReceiptCategory::parse(text);
    if category == ReceiptCategory::Other && !text.trim().eq_ignore_ascii_case("other") {
        let known: Vec<&str> = ReceiptCategory::ALL.iter().map(|c| c.as_str()).collect();
        return Err(Error::InvalidInput(format!(
            "unknown category '{}' (one of: {})",
            text,
            known.join(", ")
        )));
    }
    Ok(category.as_str().to_string())
}

/// An optional reference: `""` clears it, anything else must exist
fn check_ref(reference: Option<&str>, kind: &'static str, exists: impl Fn(&str) -> bool) -> Result<()> {
    match reference.map(str::trim) {
        Some(id) if !id.is_empty() && !exists(id) => Err(Error::not_found(kind, id)),
        _ => Ok(()),
    }
}

fn confirm(prompt: &str) -> bool {
    println!("{} [y/N]", prompt);
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).ok();
    input.trim().eq_ignore_ascii_case("y")
}

fn cmd_month(store: &AppStore, format: OutputFormat, month: Option<&str>) -> Result<()> {
    let (year, month) = resolve_month(month)?;
    let view = month_view(store.ledger(), year, month, today())?;
    output::output_month(format, &view)
}

fn cmd_day(store: &AppStore, format: OutputFormat, date: Option<&str>) -> Result<()> {
    let key = resolve_date(date)?;
    let view = day_view(store.ledger(), &key);
    output::output_day(format, &view)
}

fn job_draft(ledger: &Ledger, fields: JobFields) -> Result<JobDraft> {
    let date = fields.date.as_deref().map(|d| resolve_date(Some(d))).transpose()?;
    let amount = fields.amount.map(|a| valid_amount(a, "amount")).transpose()?;
    check_ref(fields.driver.as_deref(), "Driver", |id| ledger.driver(id).is_some())?;
    check_ref(fields.truck.as_deref(), "Truck", |id| ledger.truck(id).is_some())?;

    Ok(JobDraft {
        date,
        customer: fields.customer,
        pickup: fields.pickup,
        dropoff: fields.dropoff,
        notes: fields.notes,
        amount,
        status: fields.status.map(|s| JobStatus::from(s).as_str().to_string()),
        driver_id: fields.driver,
        truck_id: fields.truck,
        ..Default::default()
    })
}

fn matches_filter(date: &str, filter: &ListFilter) -> Result<bool> {
    if let Some(ref day) = filter.date {
        return Ok(date == resolve_date(Some(day))?);
    }
    if let Some(ref month) = filter.month {
        let (year, month) = resolve_month(Some(month))?;
        let prefix = format!("{:04}-{:02}-", year, month);
        return Ok(date.starts_with(&prefix));
    }
    Ok(true)
}

fn cmd_job(store: &mut AppStore, format: OutputFormat, action: JobAction) -> Result<()> {
    match action {
        JobAction::Add(mut fields) => {
            if fields.customer.as_deref().map_or(true, |c| c.trim().is_empty()) {
                return Err(Error::InvalidInput("customer is required".into()));
            }
            fields.date = Some(resolve_date(fields.date.as_deref())?);
            let draft = job_draft(store.ledger(), fields)?;
            let job = store.create_job(draft);
            output::output_job(format, "Created job", &job)
        }

        JobAction::Update { id, fields } => {
            if let Some(ref customer) = fields.customer {
                if customer.trim().is_empty() {
                    return Err(Error::InvalidInput("customer cannot be blank".into()));
                }
            }
            let draft = job_draft(store.ledger(), fields)?;
            let job = store.update_job(&id, draft).ok_or_else(|| Error::not_found("Job", &id))?;
            output::output_job(format, "Updated job", &job)
        }

        JobAction::Delete { id, yes } => {
            let job = store.ledger().job(&id).ok_or_else(|| Error::not_found("Job", &id))?;
            let linked = store.ledger().receipts_for_job(&id).len();
            if !yes {
                let prompt = format!(
                    "Delete job for {} on {}? {} linked receipt(s) will be kept and unlinked.",
                    job.customer, job.date, linked
                );
                if !confirm(&prompt) {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            store.delete_job(&id);
            println!("Deleted job {}", id);
            Ok(())
        }

        JobAction::List(filter) => {
            let mut jobs: Vec<&Job> = Vec::new();
            for job in &store.ledger().jobs {
                if matches_filter(&job.date, &filter)? {
                    jobs.push(job);
                }
            }
            jobs.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.customer.cmp(&b.customer)));
            output::output_jobs(format, store.ledger(), &jobs)
        }
    }
}

fn receipt_draft(ledger: &Ledger, fields: ReceiptFields) -> Result<ReceiptDraft> {
    let date = fields.date.as_deref().map(|d| resolve_date(Some(d))).transpose()?;
    let amount = match fields.amount {
        Some(a) if !a.is_finite() || a <= 0.0 => {
            return Err(Error::InvalidInput("receipt amount must be greater than zero".into()));
        }
        other => other,
    };
    let category = fields.category.as_deref().map(valid_category).transpose()?;
    check_ref(fields.job.as_deref(), "Job", |id| ledger.job(id).is_some())?;

    Ok(ReceiptDraft {
        date,
        vendor: fields.vendor,
        category,
        notes: fields.notes,
        amount,
        job_id: fields.job,
        ..Default::default()
    })
}

fn cmd_receipt(store: &mut AppStore, format: OutputFormat, action: ReceiptAction) -> Result<()> {
    match action {
        ReceiptAction::Add(mut fields) => {
            if fields.amount.is_none() {
                return Err(Error::InvalidInput("amount is required".into()));
            }
            fields.date = Some(resolve_date(fields.date.as_deref())?);
            let draft = receipt_draft(store.ledger(), fields)?;
            let receipt = store.create_receipt(draft);
            output::output_receipt(format, "Created receipt", &receipt)
        }

        ReceiptAction::Update { id, fields } => {
            let draft = receipt_draft(store.ledger(), fields)?;
            let receipt = store
                .update_receipt(&id, draft)
                .ok_or_else(|| Error::not_found("Receipt", &id))?;
            output::output_receipt(format, "Updated receipt", &receipt)
        }

        ReceiptAction::Delete { id, yes } => {
            let receipt = store.ledger().receipt(&id).ok_or_else(|| Error::not_found("Receipt", &id))?;
            if !yes {
                let prompt = format!(
                    "Delete receipt {} {} on {}?",
                    receipt.vendor,
                    format_money(receipt.amount),
                    receipt.date
                );
                if !confirm(&prompt) {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            store.delete_receipt(&id);
            println!("Deleted receipt {}", id);
            Ok(())
        }

        ReceiptAction::List(filter) => {
            let mut receipts: Vec<&Receipt> = Vec::new();
            for receipt in &store.ledger().receipts {
                if matches_filter(&receipt.date, &filter)? {
                    receipts.push(receipt);
                }
            }
            receipts.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.vendor.cmp(&b.vendor)));
            output::output_receipts(format, &receipts)
        }
    }
}

fn cmd_driver(store: &mut AppStore, format: OutputFormat, action: DriverAction) -> Result<()> {
    fn draft(fields: DriverFields) -> DriverDraft {
        DriverDraft {
            name: fields.name,
            phone: fields.phone,
            role: fields.role,
            active: fields.active,
            ..Default::default()
        }
    }

    match action {
        DriverAction::Add(fields) => {
            if fields.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                return Err(Error::InvalidInput("name is required".into()));
            }
            let driver = store.create_driver(draft(fields));
            output::output_driver(format, "Created driver", &driver)
        }

        DriverAction::Update { id, fields } => {
            let driver = store
                .update_driver(&id, draft(fields))
                .ok_or_else(|| Error::not_found("Driver", &id))?;
            output::output_driver(format, "Updated driver", &driver)
        }

        DriverAction::Delete { id, yes } => {
            let driver = store.ledger().driver(&id).ok_or_else(|| Error::not_found("Driver", &id))?;
            let assigned = store.ledger().jobs.iter().filter(|j| j.driver_id == id).count();
            if !yes {
                let prompt = format!(
                    "Delete driver {}? {} job(s) will be kept and left without a driver.",
                    driver.name, assigned
                );
                if !confirm(&prompt) {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            store.delete_driver(&id);
            println!("Deleted driver {}", id);
            Ok(())
        }

        DriverAction::List => output::output_drivers(format, &store.ledger().drivers),
    }
}

fn cmd_truck(store: &mut AppStore, format: OutputFormat, action: TruckAction) -> Result<()> {
    fn draft(fields: TruckFields) -> TruckDraft {
        TruckDraft {
            label: fields.label,
            plate: fields.plate,
            capacity: fields.capacity,
            active: fields.active,
            ..Default::default()
        }
    }

    match action {
        TruckAction::Add(fields) => {
            if fields.label.as_deref().map_or(true, |l| l.trim().is_empty()) {
                return Err(Error::InvalidInput("label is required".into()));
            }
            let truck = store.create_truck(draft(fields));
            output::output_truck(format, "Created truck", &truck)
        }

        TruckAction::Update { id, fields } => {
            let truck = store
                .update_truck(&id, draft(fields))
                .ok_or_else(|| Error::not_found("Truck", &id))?;
            output::output_truck(format, "Updated truck", &truck)
        }

        TruckAction::Delete { id, yes } => {
            let truck = store.ledger().truck(&id).ok_or_else(|| Error::not_found("Truck", &id))?;
            let assigned = store.ledger().jobs.iter().filter(|j| j.truck_id == id).count();
            if !yes {
                let prompt = format!(
                    "Delete truck {}? {} job(s) will be kept and left without a truck.",
                    truck.label, assigned
                );
                if !confirm(&prompt) {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            store.delete_truck(&id);
            println!("Deleted truck {}", id);
            Ok(())
        }

        TruckAction::List => output::output_trucks(format, &store.ledger().trucks),
    }
}

fn cmd_dispatch(store: &mut AppStore, format: OutputFormat, action: DispatchAction) -> Result<()> {
    match action {
        DispatchAction::Assign { job_id, driver, truck } => {
            if driver.is_none() && truck.is_none() {
                return Err(Error::InvalidInput("give --driver and/or --truck".into()));
            }
            let ledger = store.ledger();
            check_ref(driver.as_deref(), "Driver", |id| ledger.driver(id).is_some())?;
            check_ref(truck.as_deref(), "Truck", |id| ledger.truck(id).is_some())?;

            let job = store
                .assign(&job_id, driver.as_deref(), truck.as_deref())
                .ok_or_else(|| Error::not_found("Job", &job_id))?;
            let clashes = double_bookings(store.ledger(), &job.date);
            output::note_double_bookings(&clashes, &job);
            output::output_job(format, "Assigned job", &job)
        }

        DispatchAction::Unassign { job_id } => {
            let job = store
                .unassign(&job_id)
                .ok_or_else(|| Error::not_found("Job", &job_id))?;
            output::output_job(format, "Unassigned job", &job)
        }

        DispatchAction::Board { date } => {
            let key = resolve_date(date.as_deref())?;
            let rows = dispatch_board(store.ledger(), &key);
            let clashes = double_bookings(store.ledger(), &key);
            output::output_board(format, &key, &rows, &clashes)
        }
    }
}

fn cmd_export(store: &AppStore, month: Option<&str>, output: Option<PathBuf>) -> Result<()> {
    let (year, month) = resolve_month(month)?;
    let export = export_month(store.ledger(), year, month, output)?;
    println!(
        "Exported {} job(s) and {} receipt(s) to: {}",
        export.jobs,
        export.receipts,
        export.path.display()
    );
    Ok(())
}

fn cmd_config(
    show: bool,
    set_data_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    set_seed: Option<bool>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(seed) = set_seed {
        config.seed_on_first_run = seed;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulbook_domain::model::{Driver, Record};

    #[test]
    fn test_resolve_month() {
        assert_eq!(resolve_month(Some("2025-06")).unwrap(), (2025, 6));
        assert!(resolve_month(Some("2025-13")).is_err());
        assert!(resolve_month(Some("June")).is_err());
    }

    #[test]
    fn test_resolve_date_canonicalizes() {
        assert_eq!(resolve_date(Some("2025-6-3")).unwrap(), "2025-06-03");
        assert!(resolve_date(Some("2025-02-30")).is_err());
        assert_eq!(resolve_date(None).unwrap(), today_key());
    }

    #[test]
    fn test_valid_category() {
        assert_eq!(valid_category("fuel").unwrap(), "Fuel");
        assert_eq!(valid_category("Other").unwrap(), "Other");
        assert!(valid_category("snacks").is_err());
    }

    #[test]
    fn test_receipt_amount_must_be_positive() {
        let ledger = Ledger::default();
        for bad in [0.0, -5.0, f64::NAN] {
            let fields = ReceiptFields {
                amount: Some(bad),
                ..Default::default()
            };
            assert!(receipt_draft(&ledger, fields).is_err());
        }
    }

    #[test]
    fn test_job_draft_rejects_unknown_driver() {
        let mut ledger = Ledger::default();
        ledger.drivers.push(Driver::normalize(DriverDraft {
            id: Some("driver_a".into()),
            name: Some("Ana".into()),
            ..Default::default()
        }));

        let unknown = JobFields {
            driver: Some("driver_missing".into()),
            ..Default::default()
        };
        assert!(matches!(job_draft(&ledger, unknown), Err(Error::NotFound { .. })));

        let known = JobFields {
            driver: Some("driver_a".into()),
            ..Default::default()
        };
        assert_eq!(job_draft(&ledger, known).unwrap().driver_id.as_deref(), Some("driver_a"));

        let cleared = JobFields {
            driver: Some(String::new()),
            ..Default::default()
        };
        assert!(job_draft(&ledger, cleared).is_ok());
    }

    #[test]
    fn test_job_draft_rejects_negative_amount() {
        let fields = JobFields {
            amount: Some(-1.0),
            ..Default::default()
        };
        assert!(job_draft(&Ledger::default(), fields).is_err());
    }

    #[test]
    fn test_list_filter() {
        let by_month = ListFilter {
            date: None,
            month: Some("2025-06".into()),
        };
        assert!(matches_filter("2025-06-30", &by_month).unwrap());
        assert!(!matches_filter("2025-07-01", &by_month).unwrap());

        let by_day = ListFilter {
            date: Some("2025-6-1".into()),
            month: None,
        };
        assert!(matches_filter("2025-06-01", &by_day).unwrap());
        assert!(!matches_filter("2025-06-02", &by_day).unwrap());
    }
}
