//! Form schema, submission validation, and administrative lifecycle services for
//! document-request templates.

pub mod admin;
pub mod config;
pub mod error;
pub mod telemetry;
