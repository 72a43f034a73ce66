//! Parser settings.
//!
//! Settings are plain values owned by each parser; there is no process-wide
//! instance. They can be written in YAML:
//!
//! ```yaml
//! strict: false
//! allow_lf_without_cr: true
//! max_header_count: 64
//! max_header_size: 8192
//! max_content_length: 1048576
//! restart_after_complete: true
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Largest integer a JSON/JavaScript number represents exactly; the default
/// ceiling for `Content-Length`.
pub const MAX_SAFE_LENGTH: u64 = (1 << 53) - 1;

/// Environment variable naming a YAML settings file for [`Settings::load`].
pub const CONFIG_ENV: &str = "HTTPSPAN_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Enforce the canonical grammar; `false` selects the lenient profile
    pub strict: bool,
    /// Accept bare LF as a line terminator (lenient profile only)
    pub allow_lf_without_cr: bool,
    /// Maximum fields in one header or trailer section
    pub max_header_count: usize,
    /// Maximum bytes in the head (start-line plus headers) or the trailers
    pub max_header_size: usize,
    /// Largest accepted `Content-Length`
    pub max_content_length: u64,
    /// Start parsing the next message right after one completes
    pub restart_after_complete: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strict: true,
            allow_lf_without_cr: false,
            max_header_count: 100,
            max_header_size: 16 * 1024,
            max_content_length: MAX_SAFE_LENGTH,
            restart_after_complete: false,
        }
    }
}

impl Settings {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self {
            strict: false,
            allow_lf_without_cr: true,
            ..Self::default()
        }
    }

    /// Parses settings from YAML; missing keys keep their defaults.
    pub fn from_yaml(source: &str) -> Result<Self> {
        let settings: Settings =
            serde_yaml::from_str(source).context("failed to parse parser settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads the YAML file named by `HTTPSPAN_CONFIG`, or returns defaults
    /// when the variable is unset.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let source = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read settings file {path}"))?;
                Self::from_yaml(&source)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_header_count == 0 {
            anyhow::bail!("max_header_count must be at least 1");
        }
        if self.max_header_size == 0 {
            anyhow::bail!("max_header_size must be at least 1");
        }
        Ok(())
    }

    /// Whether bare LF terminates lines under these settings.
    pub fn lf_without_cr(&self) -> bool {
        !self.strict && self.allow_lf_without_cr
    }
}
