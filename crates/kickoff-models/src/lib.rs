//! Core data models for Kickoff.
//!
//! This crate provides the project snapshot collected by the setup wizard
//! (customer, team, schedule, risks, work breakdown) together with the
//! result and progress types produced by a setup run.

pub mod calendar;
pub mod defaults;
pub mod project;
pub mod risk;
pub mod setup;
pub mod structure;

// Re-export main types
pub use calendar::{sprint_windows, SprintWindow};
pub use project::{DevOpsConnection, Milestone, ProjectData, SetupConfig, TeamMember};
pub use risk::{Risk, RiskPriority};
pub use setup::{ProgressInfo, SetupOutcome, SetupResult};
pub use structure::{DevOpsStructure, DevOpsTask, Epic, Feature, Requirement};
