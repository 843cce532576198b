use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FeeError;

/// Service category a rate schedule is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Goods,
    Services,
    Works,
}

impl ServiceCategory {
    pub fn all() -> &'static [ServiceCategory] {
        &[
            ServiceCategory::Goods,
            ServiceCategory::Services,
            ServiceCategory::Works,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goods => "goods",
            Self::Services => "services",
            Self::Works => "works",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Goods => "Goods",
            Self::Services => "Services",
            Self::Works => "Works",
        }
    }

    /// Parses a category code. Matching ignores ASCII case and surrounding
    /// whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let code = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = FeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| FeeError::UnknownCategory(s.to_string()))
    }
}
