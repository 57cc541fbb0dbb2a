//! CLI command handlers

pub mod config;
pub mod growth;
pub mod report;
