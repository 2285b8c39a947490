// src/publish.rs

use crate::error::OidccError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much of a plan's results the conformance suite exposes publicly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Publish {
    /// Nothing is published. Omitted from serialized plans.
    #[default]
    #[serde(alias = "")]
    None,
    /// Only the results summary is published.
    Summary,
    /// The summary and every test log are published.
    Everything,
}

impl Publish {
    /// The lowercase wire token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Publish::None => "none",
            Publish::Summary => "summary",
            Publish::Everything => "everything",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Publish::None)
    }
}

impl fmt::Display for Publish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Publish {
    type Err = OidccError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Publish::None),
            "summary" => Ok(Publish::Summary),
            "everything" => Ok(Publish::Everything),
            other => Err(OidccError::InvalidConfiguration(format!(
                "unknown publish policy '{}'",
                other
            ))),
        }
    }
}
