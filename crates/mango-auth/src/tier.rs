use std::fmt;

use serde::{Deserialize, Serialize};

/// Privilege tier required by an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// May update refs and append snapshots.
    Committer,
    /// May do everything a committer can, plus manage authorization and
    /// obsolescence.
    Admin,
}

impl Tier {
    /// Human-readable name, as used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Committer => "committer",
            Tier::Admin => "admin",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
