pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod outputs;
pub mod poll;
pub mod telemetry;
pub mod ui;

pub use error::{HotfixError, Result};
