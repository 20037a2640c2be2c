//! Domain model types

mod fields;

pub mod dispatch;
pub mod driver;
pub mod job;
pub mod receipt;
pub mod record;
pub mod truck;

pub use dispatch::{normalize_dispatch, DispatchAssignment, DispatchDraft};
pub use driver::{normalize_driver, Driver, DriverDraft};
pub use job::{normalize_job, Job, JobDraft, JobStatus};
pub use receipt::{normalize_receipt, Receipt, ReceiptCategory, ReceiptDraft};
pub use record::{Draft, Record};
pub use truck::{normalize_truck, Truck, TruckDraft};
