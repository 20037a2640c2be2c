//! Output formatting module

use chrono::Datelike;
use haulbook_app::app::{DayView, MonthView};
use haulbook_domain::model::{Driver, Job, Receipt, Truck};
use haulbook_domain::service::{CalendarDay, CalendarMarkers, DispatchRow, DoubleBooking, Resource};
use haulbook_domain::Ledger;
use haulbook_types::date_key::try_parse_date_key;
use haulbook_types::money::format_money;
use haulbook_types::{OutputFormat, Result};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

/// Cut to `width` characters, marking the cut with `...`
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

fn resource_name(resource: Resource) -> &'static str {
    match resource {
        Resource::Driver => "driver",
        Resource::Truck => "truck",
    }
}

pub fn output_month(output_format: OutputFormat, view: &MonthView) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(view);
    }

    println!("\n{}", view.month);
    println!("=======");
    println!(" Sun    Mon    Tue    Wed    Thu    Fri    Sat");

    let lead = view
        .days
        .first()
        .and_then(|d| try_parse_date_key(&d.date))
        .map(|first| first.weekday().num_days_from_sunday() as usize)
        .unwrap_or(0);

    let mut line = " ".repeat(lead * 7);
    for (i, day) in view.days.iter().enumerate() {
        let job_mark = if day.markers.job_count > 0 { "J" } else { " " };
        let receipt_mark = if day.markers.receipt_count > 0 { "R" } else { " " };
        line.push_str(&format!("{:>3}{}{}  ", day.day, job_mark, receipt_mark));
        if (lead + i + 1) % 7 == 0 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.trim().is_empty() {
        println!("{}", line.trim_end());
    }
    println!("(J = jobs, R = receipts)");

    let active: Vec<_> = view.days.iter().filter(|d| !d.markers.is_empty()).collect();
    if !active.is_empty() {
        println!();
        println!("{:<12} {:>5} {:>9} {:>9} {:>12}", "Date", "Jobs", "Cancelled", "Receipts", "Net");
        println!("{}", "-".repeat(51));
        for day in active {
            println!("{}", month_row(day));
        }
    }

    println!();
    println!("Revenue:         {}", format_money(view.totals.revenue));
    println!("Expenses:        {}", format_money(view.totals.expenses));
    println!("Net:             {}", format_money(view.totals.net));
    if let Some(mtd) = view.month_to_date {
        println!("Month to date:   {}", format_money(mtd.net));
    }

    Ok(())
}

fn month_row(day: &CalendarDay) -> String {
    format!(
        "{:<12} {:>5} {:>9} {:>9} {:>12}",
        day.date,
        day.markers.job_count,
        day.markers.cancelled_job_count(),
        day.markers.receipt_count,
        format_money(day.net)
    )
}

fn cancelled_note(markers: &CalendarMarkers) -> Option<String> {
    match markers.cancelled_job_count() {
        0 => None,
        n => Some(format!("({} cancelled job(s) not counted)", n)),
    }
}

pub fn output_day(output_format: OutputFormat, view: &DayView) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(view);
    }

    let summary = &view.summary;
    println!("\n{}", summary.date);
    println!("==========");
    println!("Revenue:         {}", format_money(summary.revenue));
    println!("Expenses:        {}", format_money(summary.expenses));
    println!("Net:             {}", format_money(summary.net));
    if let Some(note) = cancelled_note(&summary.markers) {
        println!("{}", note);
    }

    println!("\nJobs");
    println!("----");
    print_dispatch_rows(&view.jobs);
    print_double_bookings(&view.double_bookings);

    println!("\nReceipts");
    println!("--------");
    print_receipt_rows(view.receipts.iter());

    Ok(())
}

fn print_dispatch_rows(rows: &[DispatchRow]) {
    if rows.is_empty() {
        println!("No jobs.");
        return;
    }
    println!(
        "{:<22} {:<20} {:<10} {:>10} {:<16} {:<12}",
        "ID", "Customer", "Status", "Amount", "Driver", "Truck"
    );
    println!("{}", "-".repeat(95));
    for row in rows {
        let job = &row.job;
        println!(
            "{:<22} {:<20} {:<10} {:>10} {:<16} {:<12}",
            clip(&job.id, 22),
            clip(or_dash(&job.customer), 20),
            job.status.as_str(),
            format_money(job.amount),
            clip(row.driver_name.as_deref().unwrap_or("-"), 16),
            clip(row.truck_label.as_deref().unwrap_or("-"), 12)
        );
        if !job.pickup.is_empty() || !job.dropoff.is_empty() {
            println!("  {} -> {}", or_dash(&job.pickup), or_dash(&job.dropoff));
        }
    }
}

fn print_double_bookings(clashes: &[DoubleBooking]) {
    for clash in clashes {
        println!(
            "! {} {} is on {} jobs: {}",
            resource_name(clash.resource),
            clash.resource_id,
            clash.job_ids.len(),
            clash.job_ids.join(", ")
        );
    }
}

fn print_receipt_rows<'a>(receipts: impl Iterator<Item = &'a Receipt>) {
    let mut receipts = receipts.peekable();
    if receipts.peek().is_none() {
        println!("No receipts.");
        return;
    }
    println!(
        "{:<22} {:<12} {:<20} {:<12} {:>10} {:<22}",
        "ID", "Date", "Vendor", "Category", "Amount", "Job"
    );
    println!("{}", "-".repeat(103));
    for receipt in receipts {
        println!(
            "{:<22} {:<12} {:<20} {:<12} {:>10} {:<22}",
            clip(&receipt.id, 22),
            receipt.date,
            clip(or_dash(&receipt.vendor), 20),
            receipt.category.as_str(),
            format_money(receipt.amount),
            clip(or_dash(&receipt.job_id), 22)
        );
    }
}

/// Dispatch board for one day
pub fn output_board(
    output_format: OutputFormat,
    date_key: &str,
    rows: &[DispatchRow],
    clashes: &[DoubleBooking],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Board<'a> {
            date: &'a str,
            jobs: &'a [DispatchRow],
            double_bookings: &'a [DoubleBooking],
        }
        return print_json(&Board {
            date: date_key,
            jobs: rows,
            double_bookings: clashes,
        });
    }

    println!("\nDispatch board {}", date_key);
    println!("=========================");
    print_dispatch_rows(rows);
    print_double_bookings(clashes);
    Ok(())
}

/// Tell the user about clashes a fresh assignment created
pub fn note_double_bookings(clashes: &[DoubleBooking], job: &Job) {
    for clash in clashes.iter().filter(|c| c.job_ids.contains(&job.id)) {
        eprintln!(
            "Note: {} {} is also on {} other job(s) on {}",
            resource_name(clash.resource),
            clash.resource_id,
            clash.job_ids.len().saturating_sub(1),
            job.date
        );
    }
}

pub fn output_jobs(output_format: OutputFormat, ledger: &Ledger, jobs: &[&Job]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(jobs);
    }

    if jobs.is_empty() {
        println!("No jobs found.");
        return Ok(());
    }

    println!(
        "{:<22} {:<12} {:<20} {:<10} {:>10} {:<16} {:<12}",
        "ID", "Date", "Customer", "Status", "Amount", "Driver", "Truck"
    );
    println!("{}", "-".repeat(108));
    for job in jobs {
        let driver = ledger.driver(&job.driver_id).map_or("-", |d| d.name.as_str());
        let truck = ledger.truck(&job.truck_id).map_or("-", |t| t.label.as_str());
        println!(
            "{:<22} {:<12} {:<20} {:<10} {:>10} {:<16} {:<12}",
            clip(&job.id, 22),
            job.date,
            clip(or_dash(&job.customer), 20),
            job.status.as_str(),
            format_money(job.amount),
            clip(driver, 16),
            clip(truck, 12)
        );
    }
    println!("\nTotal: {} job(s)", jobs.len());
    Ok(())
}

pub fn output_job(output_format: OutputFormat, heading: &str, job: &Job) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(job);
    }

    println!("{}: {}", heading, job.id);
    println!("  Date:      {}", job.date);
    println!("  Customer:  {}", or_dash(&job.customer));
    println!("  Pickup:    {}", or_dash(&job.pickup));
    println!("  Dropoff:   {}", or_dash(&job.dropoff));
    println!("  Amount:    {}", format_money(job.amount));
    println!("  Status:    {}", job.status);
    println!("  Driver:    {}", or_dash(&job.driver_id));
    println!("  Truck:     {}", or_dash(&job.truck_id));
    if !job.notes.is_empty() {
        println!("  Notes:     {}", job.notes);
    }
    Ok(())
}

pub fn output_receipts(output_format: OutputFormat, receipts: &[&Receipt]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(receipts);
    }

    print_receipt_rows(receipts.iter().copied());
    if !receipts.is_empty() {
        let total: f64 = receipts.iter().map(|r| r.amount).sum();
        println!("\nTotal: {} receipt(s), {}", receipts.len(), format_money(total));
    }
    Ok(())
}

pub fn output_receipt(output_format: OutputFormat, heading: &str, receipt: &Receipt) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(receipt);
    }

    println!("{}: {}", heading, receipt.id);
    println!("  Date:      {}", receipt.date);
    println!("  Vendor:    {}", or_dash(&receipt.vendor));
    println!("  Category:  {}", receipt.category);
    println!("  Amount:    {}", format_money(receipt.amount));
    println!("  Job:       {}", or_dash(&receipt.job_id));
    if !receipt.notes.is_empty() {
        println!("  Notes:     {}", receipt.notes);
    }
    Ok(())
}

pub fn output_drivers(output_format: OutputFormat, drivers: &[Driver]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(drivers);
    }

    if drivers.is_empty() {
        println!("No drivers registered.");
        return Ok(());
    }

    println!("{:<22} {:<20} {:<14} {:<12} {:<6}", "ID", "Name", "Phone", "Role", "Active");
    println!("{}", "-".repeat(78));
    for driver in drivers {
        println!(
            "{:<22} {:<20} {:<14} {:<12} {:<6}",
            clip(&driver.id, 22),
            clip(or_dash(&driver.name), 20),
            clip(or_dash(&driver.phone), 14),
            clip(&driver.role, 12),
            if driver.active { "yes" } else { "no" }
        );
    }
    Ok(())
}

pub fn output_driver(output_format: OutputFormat, heading: &str, driver: &Driver) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(driver);
    }

    println!("{}: {}", heading, driver.id);
    println!("  Name:      {}", or_dash(&driver.name));
    println!("  Phone:     {}", or_dash(&driver.phone));
    println!("  Role:      {}", driver.role);
    println!("  Active:    {}", if driver.active { "yes" } else { "no" });
    Ok(())
}

pub fn output_trucks(output_format: OutputFormat, trucks: &[Truck]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(trucks);
    }

    if trucks.is_empty() {
        println!("No trucks registered.");
        return Ok(());
    }

    println!("{:<22} {:<16} {:<12} {:<10} {:<6}", "ID", "Label", "Plate", "Capacity", "Active");
    println!("{}", "-".repeat(70));
    for truck in trucks {
        println!(
            "{:<22} {:<16} {:<12} {:<10} {:<6}",
            clip(&truck.id, 22),
            clip(or_dash(&truck.label), 16),
            clip(or_dash(&truck.plate), 12),
            clip(or_dash(&truck.capacity), 10),
            if truck.active { "yes" } else { "no" }
        );
    }
    Ok(())
}

pub fn output_truck(output_format: OutputFormat, heading: &str, truck: &Truck) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(truck);
    }

    println!("{}: {}", heading, truck.id);
    println!("  Label:     {}", or_dash(&truck.label));
    println!("  Plate:     {}", or_dash(&truck.plate));
    println!("  Capacity:  {}", or_dash(&truck.capacity));
    println!("  Active:    {}", if truck.active { "yes" } else { "no" });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a very long customer name", 10), "a very ...");
        assert_eq!(clip("Müller Umzüge GmbH", 9), "Müller...");
    }

    fn markers(job_count: usize, billable: usize) -> CalendarMarkers {
        CalendarMarkers {
            job_count,
            cancelled_excluded_job_count: billable,
            receipt_count: 0,
        }
    }

    #[test]
    fn test_cancelled_note() {
        // one scheduled job
        assert_eq!(cancelled_note(&markers(1, 1)), None);
        // one cancelled job
        assert_eq!(cancelled_note(&markers(1, 0)).as_deref(), Some("(1 cancelled job(s) not counted)"));
        assert_eq!(cancelled_note(&markers(3, 1)).as_deref(), Some("(2 cancelled job(s) not counted)"));
    }

    #[test]
    fn test_month_row_counts_cancelled_jobs() {
        let day = |m: CalendarMarkers| CalendarDay {
            date: "2025-06-10".into(),
            day: 10,
            markers: m,
            net: 100.0,
        };
        let scheduled_only = month_row(&day(markers(1, 1)));
        let cols: Vec<&str> = scheduled_only.split_whitespace().collect();
        assert_eq!(cols, ["2025-06-10", "1", "0", "0", "$100.00"]);

        let cancelled_only = month_row(&day(markers(1, 0)));
        let cols: Vec<&str> = cancelled_only.split_whitespace().collect();
        assert_eq!(cols, ["2025-06-10", "1", "1", "0", "$100.00"]);
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(""), "-");
        assert_eq!(or_dash("x"), "x");
    }
}
