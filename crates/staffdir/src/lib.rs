//! `staffdir` - Employee directory management
//!
//! This library provides the core of an employee directory: a persisted
//! collection of employee records, list and form screens with search,
//! paging, validation, and confirmation steps, path routing under a
//! deployment base prefix, and remembered UI preferences.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod directory;
pub mod employee;
pub mod error;
pub mod form;
pub mod format;
pub mod i18n;
pub mod list;
pub mod logging;
pub mod notify;
pub mod router;
pub mod shell;
pub mod state;
pub mod storage;

pub use config::Config;
pub use directory::Directory;
pub use employee::{Department, Employee, EmployeeId, Position};
pub use error::{Error, Result};
pub use i18n::{Lang, Messages};
pub use logging::init_logging;
pub use shell::{App, Screen};
pub use state::{AppEvent, AppState, ViewMode};
pub use storage::{KeyValueStore, MemoryStore, Storage};
