//! Domain layer: ledger records, their normalizers, and the read/write
//! services that run over a [`Ledger`] snapshot.

pub mod ledger;
pub mod model;
pub mod repository;
pub mod service;

pub use ledger::Ledger;
pub use model::*;
