//! Flows module - Multi-step workflows
//!
//! Provides:
//! - aggregate: Walk, filter and format files into one document
//! - report: Token metrics for the document
//! - promptify: The full run, from walk to clipboard

pub mod aggregate;
pub mod promptify;
pub mod report;
