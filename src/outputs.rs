//! Action outputs, written where the CI runner expects them.

use crate::error::Result;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Environment variable naming the runner's output file
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Destination of `key=value` output lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Append to a file (the `GITHUB_OUTPUT` file on Actions runners)
    File(PathBuf),
    Stdout,
}

impl OutputSink {
    /// Use `GITHUB_OUTPUT` when set and non-empty, else stdout
    pub fn from_env() -> Self {
        match std::env::var(GITHUB_OUTPUT_ENV) {
            Ok(path) if !path.trim().is_empty() => OutputSink::File(PathBuf::from(path)),
            _ => OutputSink::Stdout,
        }
    }
}

/// Ordered set of named outputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutputs {
    entries: Vec<(String, String)>,
}

impl ActionOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an output; a later value for the same key replaces the earlier one
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Set an output to the compact JSON encoding of `value`
    pub fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.set(key, encoded);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Render as `key=value` lines. Values are single-line by construction.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}\n", k, v.replace('\n', " ")))
            .collect()
    }

    pub fn write_to(&self, sink: &OutputSink) -> Result<()> {
        match sink {
            OutputSink::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(self.render().as_bytes())?;
            }
            OutputSink::Stdout => print!("{}", self.render()),
        }
        Ok(())
    }
}
