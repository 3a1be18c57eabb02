//! Versioned configuration passed into the metrics engine.

use super::{MetricsDomainError, SprintMonthMap, TeamProfile};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Configuration schema version understood by this build.
pub const CONFIG_VERSION: u32 = 1;

/// Number of people on the analysed team; always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct TeamSize(u32);

impl TeamSize {
    /// Creates a validated team size.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsDomainError::InvalidTeamSize`] when the value is zero,
    /// negative, or exceeds `u32::MAX`.
    pub fn new(value: i64) -> Result<Self, MetricsDomainError> {
        u32::try_from(value)
            .ok()
            .filter(|size| *size > 0)
            .map(Self)
            .ok_or(MetricsDomainError::InvalidTeamSize(value))
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for TeamSize {
    type Error = MetricsDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TeamSize> for u32 {
    fn from(size: TeamSize) -> Self {
        size.0
    }
}

impl fmt::Display for TeamSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Health rating of a metric value against configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricHealth {
    /// Within the healthy range.
    Good,
    /// Needs attention.
    Warning,
    /// Outside acceptable range.
    Critical,
}

impl MetricHealth {
    /// Returns the lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    fn higher_is_better(value: f64, good: f64, warning: f64) -> Self {
        if value >= good {
            Self::Good
        } else if value >= warning {
            Self::Warning
        } else {
            Self::Critical
        }
    }

    fn lower_is_better(value: f64, good: f64, warning: f64) -> Self {
        if value <= good {
            Self::Good
        } else if value <= warning {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

/// Cut-offs used to rate metric values in reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Predictability at or above this percentage is good.
    pub predictability_good: f64,
    /// Predictability at or above this percentage is a warning.
    pub predictability_warning: f64,
    /// Efficiency at or above this many points per person is good.
    pub efficiency_good: f64,
    /// Efficiency at or above this many points per person is a warning.
    pub efficiency_warning: f64,
    /// Rework at or below this percentage is good.
    pub rework_good: f64,
    /// Rework at or below this percentage is a warning.
    pub rework_warning: f64,
    /// Cycle time at or below this many days is good.
    pub cycle_time_good: f64,
    /// Cycle time at or below this many days is a warning.
    pub cycle_time_warning: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            predictability_good: 70.0,
            predictability_warning: 40.0,
            efficiency_good: 8.0,
            efficiency_warning: 5.0,
            rework_good: 15.0,
            rework_warning: 30.0,
            cycle_time_good: 7.0,
            cycle_time_warning: 14.0,
        }
    }
}

impl Thresholds {
    /// Rates a predictability percentage.
    #[must_use]
    pub fn rate_predictability(&self, value: f64) -> MetricHealth {
        MetricHealth::higher_is_better(value, self.predictability_good, self.predictability_warning)
    }

    /// Rates an efficiency figure.
    #[must_use]
    pub fn rate_efficiency(&self, value: f64) -> MetricHealth {
        MetricHealth::higher_is_better(value, self.efficiency_good, self.efficiency_warning)
    }

    /// Rates a rework percentage.
    #[must_use]
    pub fn rate_rework(&self, value: f64) -> MetricHealth {
        MetricHealth::lower_is_better(value, self.rework_good, self.rework_warning)
    }

    /// Rates a cycle time in days.
    #[must_use]
    pub fn rate_cycle_time(&self, value: f64) -> MetricHealth {
        MetricHealth::lower_is_better(value, self.cycle_time_good, self.cycle_time_warning)
    }
}

/// Complete configuration for one metrics run.
///
/// The value is immutable once handed to the engine and carries a schema
/// version, so alternate configurations can run side by side.
///
/// # Examples
///
/// ```
/// use cadence::metrics::domain::{MetricsConfig, TeamProfile, TeamSize};
///
/// let config = MetricsConfig::new(TeamProfile::Productive, TeamSize::new(5).expect("positive"));
/// assert_eq!(config.team_size().value(), 5);
/// assert_eq!(config.fingerprint().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    version: u32,
    profile: TeamProfile,
    team_size: TeamSize,
    sprint_month_map: SprintMonthMap,
    thresholds: Thresholds,
}

impl MetricsConfig {
    /// Creates a configuration with the default sprint mapping and
    /// thresholds.
    #[must_use]
    pub fn new(profile: TeamProfile, team_size: TeamSize) -> Self {
        Self {
            version: CONFIG_VERSION,
            profile,
            team_size,
            sprint_month_map: SprintMonthMap::default(),
            thresholds: Thresholds::default(),
        }
    }

    /// Replaces the sprint-to-month mapping.
    #[must_use]
    pub fn with_sprint_month_map(mut self, sprint_month_map: SprintMonthMap) -> Self {
        self.sprint_month_map = sprint_month_map;
        self
    }

    /// Replaces the rating thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Checks the configuration can be used by this build.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsDomainError::UnsupportedConfigVersion`] when the
    /// value was produced for a different schema version.
    pub const fn validate(&self) -> Result<(), MetricsDomainError> {
        if self.version != CONFIG_VERSION {
            return Err(MetricsDomainError::UnsupportedConfigVersion {
                found: self.version,
                expected: CONFIG_VERSION,
            });
        }
        Ok(())
    }

    /// Returns the schema version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the team profile.
    #[must_use]
    pub const fn profile(&self) -> TeamProfile {
        self.profile
    }

    /// Returns the team size.
    #[must_use]
    pub const fn team_size(&self) -> TeamSize {
        self.team_size
    }

    /// Returns the sprint-to-month mapping.
    #[must_use]
    pub const fn sprint_month_map(&self) -> &SprintMonthMap {
        &self.sprint_month_map
    }

    /// Returns the rating thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Returns a stable SHA-256 hex digest identifying this configuration.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_form());
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }

    fn canonical_form(&self) -> String {
        let thresholds = &self.thresholds;
        let header = format!(
            "v{}|{}|{}|{}:{}|{}:{}|{}:{}|{}:{}",
            self.version,
            self.profile,
            self.team_size,
            thresholds.predictability_good,
            thresholds.predictability_warning,
            thresholds.efficiency_good,
            thresholds.efficiency_warning,
            thresholds.rework_good,
            thresholds.rework_warning,
            thresholds.cycle_time_good,
            thresholds.cycle_time_warning,
        );
        self.sprint_month_map
            .iter()
            .fold(header, |canonical, (sprint, month)| {
                format!("{canonical}|{sprint}={month}")
            })
    }
}
