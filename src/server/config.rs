//! Configuration for the tokenization server.

use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{PolydictError, Result};

/// Maximum input length in characters for ordinary requests.
pub const MAX_INPUT_LENGTH: usize = 512;

/// Maximum input length in characters for trace requests.
pub const MAX_TRACE_INPUT_LENGTH: usize = 32;

/// Mode value requesting a lattice trace.
pub const TRACE_MODE: i32 = 3;

/// What to do when one dictionary fails during a multi-dictionary request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole request.
    #[default]
    Abort,
    /// Report the failure for that dictionary and keep the other results.
    Partial,
}

/// Configuration for the tokenization server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// HTTP port.
    pub port: u16,

    /// Input is trimmed to this many characters outside trace mode.
    pub max_input_length: usize,

    /// Input is trimmed to this many characters in trace mode.
    pub max_trace_input_length: usize,

    /// Mode value that requests a lattice trace.
    pub trace_mode: i32,

    /// Behavior when a dictionary fails to tokenize.
    pub failure_policy: FailurePolicy,

    /// Command rendering graph descriptions to SVG; `None` disables rendering.
    pub render_command: Option<String>,

    /// Upper bound on a single render, in milliseconds.
    pub render_timeout_ms: u64,

    /// Restrict serving to these dictionaries; `None` serves all of them.
    pub dictionaries: Option<Vec<String>>,

    /// Construct every engine at startup instead of on first use.
    pub preload: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_input_length: MAX_INPUT_LENGTH,
            max_trace_input_length: MAX_TRACE_INPUT_LENGTH,
            trace_mode: TRACE_MODE,
            failure_policy: FailurePolicy::Abort,
            render_command: Some("dot -Tsvg".to_string()),
            render_timeout_ms: 5_000,
            dictionaries: None,
            preload: false,
        }
    }
}

impl ServerConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ServerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_input_length == 0 || self.max_trace_input_length == 0 {
            return Err(PolydictError::invalid_config(
                "input length limits must be greater than zero",
            ));
        }
        if self.render_timeout_ms == 0 {
            return Err(PolydictError::invalid_config(
                "render timeout must be greater than zero",
            ));
        }
        if let Some(command) = &self.render_command
            && command.split_whitespace().next().is_none()
        {
            return Err(PolydictError::invalid_config("render command is empty"));
        }
        Ok(())
    }

    /// Whether `mode` requests a lattice trace.
    pub fn is_trace_mode(&self, mode: i32) -> bool {
        mode == self.trace_mode
    }

    /// Maximum input length for a request in `mode`.
    pub fn max_length_for(&self, mode: i32) -> usize {
        if self.is_trace_mode(mode) {
            self.max_trace_input_length
        } else {
            self.max_input_length
        }
    }

    /// Render timeout as a duration.
    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    /// `host:port` to bind to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
