//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Aggregation data model (blocks, document, metrics report)
//! - Typed errors
//! - Directory walking with virtual-environment pruning
//! - Include/exclude glob filtering
//! - Strict UTF-8 file reading
//! - Block and report rendering
//! - Token counting for LLM context budgeting

pub mod error;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod pattern;
pub mod render;
pub mod tokenizer;
pub mod util;
pub mod walker;
