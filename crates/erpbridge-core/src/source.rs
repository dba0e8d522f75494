use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical ERP adapter identifiers used in configuration and envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErpId {
    Navision,
    SapB1,
    Exact,
    Visma,
}

impl ErpId {
    pub const ALL: [Self; 4] = [Self::Navision, Self::SapB1, Self::Exact, Self::Visma];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Navision => "navision",
            Self::SapB1 => "sap_b1",
            Self::Exact => "exact",
            Self::Visma => "visma",
        }
    }

    /// Human-readable vendor name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Navision => "Microsoft Dynamics NAV / Business Central",
            Self::SapB1 => "SAP Business One",
            Self::Exact => "Exact Online",
            Self::Visma => "Visma (XML)",
        }
    }
}

impl Display for ErpId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErpId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "navision" | "nav" | "business_central" => Ok(Self::Navision),
            "sap_b1" | "sapb1" | "sap" => Ok(Self::SapB1),
            "exact" | "exact_online" => Ok(Self::Exact),
            "visma" => Ok(Self::Visma),
            _ => Err(ValidationError::InvalidAdapter {
                value: value.to_owned(),
            }),
        }
    }
}
