//! Application service layer - config, store wiring, views, export

pub mod app;
pub mod config;
pub mod export;
pub mod repository;
