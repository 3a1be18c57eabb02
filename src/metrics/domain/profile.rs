//! Team profiles selecting which workflow stages count as delivered.

use super::MetricsDomainError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Stages counted as delivered for teams already in production.
const PRODUCTIVE_STAGES: [u8; 3] = [11, 12, 13];

/// Stages counted as delivered for teams still building towards release.
const IN_DEVELOPMENT_STAGES: [u8; 5] = [9, 10, 11, 12, 13];

/// QA-certified stage; zero-point tasks parked here are placeholders.
const QA_CERTIFIED_STAGE: u8 = 9;

/// Delivery profile of the analysed team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamProfile {
    /// Team shipping to production; delivered from stage 11 onwards.
    Productive,
    /// Team in development; delivered from QA certification (stage 9).
    InDevelopment,
}

impl TeamProfile {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Productive => "productive",
            Self::InDevelopment => "in_development",
        }
    }

    /// Returns the workflow stages counted as delivered.
    #[must_use]
    pub const fn delivered_stages(self) -> &'static [u8] {
        match self {
            Self::Productive => &PRODUCTIVE_STAGES,
            Self::InDevelopment => &IN_DEVELOPMENT_STAGES,
        }
    }

    /// Returns `true` when the stage counts as delivered for this profile.
    #[must_use]
    pub fn is_delivered_stage(self, stage: u8) -> bool {
        self.delivered_stages().contains(&stage)
    }

    /// Returns the stage at which zero-point tasks are excluded entirely.
    #[must_use]
    pub const fn zero_point_exclusion_stage(self) -> Option<u8> {
        match self {
            Self::Productive => None,
            Self::InDevelopment => Some(QA_CERTIFIED_STAGE),
        }
    }
}

impl TryFrom<&str> for TeamProfile {
    type Error = MetricsDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "productive" | "productivo" => Ok(Self::Productive),
            "in_development" | "indevelopment" | "en_desarrollo" => Ok(Self::InDevelopment),
            _ => Err(MetricsDomainError::UnknownProfile(value.to_owned())),
        }
    }
}

impl FromStr for TeamProfile {
    type Err = MetricsDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}

impl fmt::Display for TeamProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
