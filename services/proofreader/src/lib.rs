//! Proofreading driver for derived ocean composite statistics.
//!
//! This crate provides the bounded sampling loop around the audit engine:
//! - Load named audit profiles from a YAML configuration
//! - Sample grid cells and windows reproducibly from a seed
//! - Run the recompute-and-compare pass per iteration
//! - Report mismatches as JSONL records and a final summary

pub mod config;
pub mod report;
pub mod runner;
pub mod sampler;

pub use config::{ProfileConfig, ProfileKind, ProofreaderConfig};
pub use report::{AuditSummary, MismatchRecord};
pub use runner::AuditRunner;
pub use sampler::CellSampler;
