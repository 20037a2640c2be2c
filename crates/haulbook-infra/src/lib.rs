//! Infrastructure layer
//!
//! Concrete implementations of domain interfaces: on-disk storage for the
//! record lists and the CSV month export.

pub mod csv_export;
pub mod persistence;
