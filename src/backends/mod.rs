//! Backends module - External collaborators and output sinks
//!
//! Provides:
//! - vertex: Vertex AI countTokens client
//! - clipboard: System clipboard via platform tools
//! - output: Output file writer

pub mod clipboard;
pub mod output;
pub mod vertex;
