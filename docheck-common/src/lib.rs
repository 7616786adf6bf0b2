//! # docheck Common Library
//!
//! Shared code for the document extraction check tooling:
//! - Database schema, models and row-level queries
//! - Confidence-threshold filtering of extracted records
//! - Configuration and root folder resolution
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod filter;

pub use error::{Error, Result};
pub use filter::{Partitioned, ReviewThresholds};
