//! Azure DevOps REST client for Kickoff.
//!
//! The [`DevOpsApi`] trait describes every remote operation the project
//! setup performs; [`DevOpsClient`] implements it over HTTP.
//!
//! # Example
//!
//! ```ignore
//! use kickoff_devops::{DevOpsApi, DevOpsClient};
//!
//! let client = DevOpsClient::new("my-org", pat);
//! client.test_connection("My Project").await?;
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use api::DevOpsApi;
pub use client::DevOpsClient;
pub use config::ClientConfig;
pub use error::{DevOpsError, Result};
pub use types::{FileMap, RepositoryHandle, WorkItemField, WorkItemKind};
