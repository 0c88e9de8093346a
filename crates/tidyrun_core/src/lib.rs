//! # tidyrun_core
//!
//! Core dispatch engine for tidyrun.
//!
//! This crate provides:
//! - Candidate file enumeration with prefix exclusion
//! - Per-file check suppression lookup
//! - Deterministic tool invocation construction
//! - A bounded-queue worker pool running one subprocess per file
//! - Serialized per-task report emission
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tidyrun_core::{DispatchRules, Dispatcher, DriverConfig, Reporter};
//!
//! let rules = DispatchRules::discover(".")?;
//! let config = DriverConfig { /* validated by the host */ };
//! let dispatcher = Dispatcher::new(config, &rules, Arc::new(Reporter::console()));
//! let report = dispatcher.run()?;
//! println!("checked {} files", report.files_processed());
//! ```

pub mod command;
mod config;
mod dispatch;
mod error;
pub mod file_finder;
mod output;
mod overrides;

pub use config::{DispatchRules, DriverConfig};
pub use dispatch::{DispatchReport, Dispatcher, WorkerStats};
pub use error::DriverError;
pub use file_finder::FileFinder;
pub use output::{Reporter, reconcile};
pub use overrides::OverrideTable;
