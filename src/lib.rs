//! Synthetic Mars colony datasets
//!
//! Generates galactic events, daily weather and per-resource alien
//! consumption from one seeded random stream, and writes them as CSV
//! together with a starter analysis notebook.

pub mod calendar;
pub mod config;
pub mod consumption;
pub mod dataset;
pub mod error;
pub mod events;
pub mod export;
pub mod notebook;
pub mod verify;
pub mod weather;

pub use config::{GeneratorConfig, OutputPaths};
pub use dataset::{generate_dataset, Dataset, DatasetStats};
pub use error::{GeneratorError, Result};
