//! CLI definition using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use haulbook_domain::model::JobStatus;
use haulbook_types::OutputFormat;

#[derive(Parser)]
#[command(name = "haulbook")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Scheduling and ledger for a small moving company")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory override. Uses config value if not specified.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Month grid with revenue, expenses and net
    Month {
        /// Month as YYYY-MM (default: current month)
        month: Option<String>,
    },

    /// Day workspace: jobs, crew, receipts and totals
    Day {
        /// Date as YYYY-MM-DD (default: today)
        date: Option<String>,
    },

    /// Manage jobs
    Job {
        #[command(subcommand)]
        action: JobAction,
    },

    /// Manage receipts
    Receipt {
        #[command(subcommand)]
        action: ReceiptAction,
    },

    /// Manage the driver roster
    Driver {
        #[command(subcommand)]
        action: DriverAction,
    },

    /// Manage the truck fleet
    Truck {
        #[command(subcommand)]
        action: TruckAction,
    },

    /// Assign drivers and trucks to jobs
    Dispatch {
        #[command(subcommand)]
        action: DispatchAction,
    },

    /// Export a month's jobs and receipts to CSV
    Export {
        /// Month as YYYY-MM (default: current month)
        month: Option<String>,

        /// Output CSV path (default: haulbook-YYYY-MM.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Enable/disable sample data on an empty ledger
        #[arg(long)]
        set_seed: Option<bool>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Job status as accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Scheduled,
    Completed,
    Cancelled,
}

impl From<StatusArg> for JobStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Scheduled => JobStatus::Scheduled,
            StatusArg::Completed => JobStatus::Completed,
            StatusArg::Cancelled => JobStatus::Cancelled,
        }
    }
}

#[derive(Args, Default)]
pub struct JobFields {
    /// Date as YYYY-MM-DD
    #[arg(long, short = 'd')]
    pub date: Option<String>,

    #[arg(long, short = 'c')]
    pub customer: Option<String>,

    #[arg(long)]
    pub pickup: Option<String>,

    #[arg(long)]
    pub dropoff: Option<String>,

    /// Quoted price in dollars
    #[arg(long, short = 'a', allow_negative_numbers = true)]
    pub amount: Option<f64>,

    #[arg(long, short = 's')]
    pub status: Option<StatusArg>,

    /// Driver id ("" to unassign)
    #[arg(long)]
    pub driver: Option<String>,

    /// Truck id ("" to unassign)
    #[arg(long)]
    pub truck: Option<String>,

    #[arg(long, short = 'n')]
    pub notes: Option<String>,
}

#[derive(Args, Default)]
pub struct ReceiptFields {
    /// Date as YYYY-MM-DD
    #[arg(long, short = 'd')]
    pub date: Option<String>,

    #[arg(long)]
    pub vendor: Option<String>,

    /// Fuel, Tolls, Meals, Supplies, Equipment, Maintenance, Labor, Lodging, Parking, Other
    #[arg(long)]
    pub category: Option<String>,

    /// Amount in dollars (must be positive)
    #[arg(long, short = 'a', allow_negative_numbers = true)]
    pub amount: Option<f64>,

    /// Linked job id ("" to unlink)
    #[arg(long)]
    pub job: Option<String>,

    #[arg(long, short = 'n')]
    pub notes: Option<String>,
}

#[derive(Args, Default)]
pub struct DriverFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Role (default: Driver)
    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Args, Default)]
pub struct TruckFields {
    /// Display label or unit number
    #[arg(long)]
    pub label: Option<String>,

    #[arg(long)]
    pub plate: Option<String>,

    /// Capacity, e.g. "26 ft"
    #[arg(long)]
    pub capacity: Option<String>,

    #[arg(long)]
    pub active: Option<bool>,
}

/// Listing filter shared by jobs and receipts
#[derive(Args, Default)]
pub struct ListFilter {
    /// Only this date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "month")]
    pub date: Option<String>,

    /// Only this month (YYYY-MM)
    #[arg(long)]
    pub month: Option<String>,
}

#[derive(Subcommand)]
pub enum JobAction {
    /// Schedule a new job
    Add(JobFields),
    /// Change fields of a job
    Update {
        id: String,
        #[command(flatten)]
        fields: JobFields,
    },
    /// Delete a job (its receipts are kept and unlinked)
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List jobs
    List(ListFilter),
}

#[derive(Subcommand)]
pub enum ReceiptAction {
    /// Record an expense
    Add(ReceiptFields),
    /// Change fields of a receipt
    Update {
        id: String,
        #[command(flatten)]
        fields: ReceiptFields,
    },
    /// Delete a receipt
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List receipts
    List(ListFilter),
}

#[derive(Subcommand)]
pub enum DriverAction {
    /// Add a driver to the roster
    Add(DriverFields),
    /// Change fields of a driver
    Update {
        id: String,
        #[command(flatten)]
        fields: DriverFields,
    },
    /// Delete a driver (jobs are kept and unassigned)
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List drivers
    List,
}

#[derive(Subcommand)]
pub enum TruckAction {
    /// Add a truck to the fleet
    Add(TruckFields),
    /// Change fields of a truck
    Update {
        id: String,
        #[command(flatten)]
        fields: TruckFields,
    },
    /// Delete a truck (jobs are kept and unassigned)
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List trucks
    List,
}

#[derive(Subcommand)]
pub enum DispatchAction {
    /// Put a driver and/or truck on a job
    Assign {
        job_id: String,
        #[arg(long)]
        driver: Option<String>,
        #[arg(long)]
        truck: Option<String>,
    },
    /// Clear the driver and truck of a job
    Unassign { job_id: String },
    /// Crew board for a day
    Board {
        /// Date as YYYY-MM-DD (default: today)
        date: Option<String>,
    },
}
