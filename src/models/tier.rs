//! Account tier controlling the palette ceiling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription tier of the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Default tier with a small palette ceiling
    #[default]
    Free,
    /// Paid tier with a large palette ceiling
    Pro,
}

impl Tier {
    /// Returns true for the paid tier.
    #[must_use]
    pub const fn is_pro(&self) -> bool {
        matches!(self, Self::Pro)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Pro => write!(f, "pro"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" | "premium" => Ok(Self::Pro),
            other => Err(format!("Unknown tier '{other}'. Expected free or pro")),
        }
    }
}
