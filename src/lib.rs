//! Bitcoin price-action fingerprints.
//!
//! Candles are downloaded from Yahoo Finance and archived in SQLite. The
//! fingerprint generator summarizes every sliding window of each fixed window
//! label into a record with a SHA-256 identity, and the matcher checks the
//! latest window against the JSON catalog of previously seen fingerprints.

pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, Result};
