use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use mango_types::Address;
use serde::{Deserialize, Serialize};

/// Name of the configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mango.toml";

/// Front-end configuration.
///
/// Precedence, highest first: command-line flags, `MANGO_*` environment
/// variables, the configuration file, built-in defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MangoConfig {
    /// Where the committed state lives.
    pub state_path: PathBuf,
    /// Sender account used when `--account` is not given.
    pub account: Option<Address>,
}

impl Default for MangoConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("mango-state.json"),
            account: None,
        }
    }
}

impl MangoConfig {
    /// Parse a TOML configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `explicit` if given (it must exist), else `mango.toml` in `dir`
    /// if present, else the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply flag / environment values on top of the file values.
    pub fn with_overrides(mut self, state: Option<PathBuf>, account: Option<Address>) -> Self {
        if let Some(state) = state {
            self.state_path = state;
        }
        if account.is_some() {
            self.account = account;
        }
        self
    }

    /// The sender account, or an error telling the user how to supply one.
    pub fn require_account(&self) -> anyhow::Result<Address> {
        self.account.ok_or_else(|| {
            anyhow::anyhow!("no sender account: pass --account, set MANGO_ACCOUNT, or set `account` in {DEFAULT_CONFIG_FILE}")
        })
    }
}
