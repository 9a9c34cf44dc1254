//! Persistence for Kickoff.
//!
//! Project files (one `ProjectData` snapshot per JSON file) and setup run
//! reports, both written atomically (write to temp file, then rename).
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use kickoff_persistence::{load_project, ReportStore, RunReport};
//! use kickoff_models::SetupResult;
//!
//! let data = load_project(Path::new("acme.json")).unwrap();
//!
//! let store = ReportStore::new("/home/user/.kickoff");
//! let report = RunReport::new("my-org", &data.connection.project, SetupResult::new());
//! let path = store.save(&report).unwrap();
//! ```

pub mod atomic;
pub mod error;
pub mod project_file;
pub mod report_store;

pub use error::{PersistenceError, Result};
pub use project_file::{init_project, load_project, save_project};
pub use report_store::{ReportStore, RunReport};
