//! Survey authoring REST API.
//!
//! Tenants, users, surveys, questions and contributor invitations, exposed
//! over axum and persisted with sea-orm.

pub mod module;
pub use module::{ConcreteAppServices, SurveysModule};

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;

pub use config::SurveysConfig;
