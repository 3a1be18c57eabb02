//! Sprint-to-month mapping used for month-level aggregation.

use super::{MetricsDomainError, SprintLabel, SprintNumber};
use chrono::Month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const DEFAULT_ANCHOR_SPRINT: u32 = 3;
const DEFAULT_ANCHOR_MONTH: Month = Month::August;
const DEFAULT_FIRST_SPRINT: u32 = 2;
const DEFAULT_LAST_SPRINT: u32 = 9;
const SPRINTS_PER_MONTH: i64 = 2;
const MONTHS_PER_YEAR: i64 = 12;

/// Calendar month label a sprint is reported under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthLabel(String);

impl MonthLabel {
    /// Creates a validated month label.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsDomainError::EmptyMonthLabel`] when the label is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, MetricsDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MetricsDomainError::EmptyMonthLabel);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Month> for MonthLabel {
    /// Uses the Spanish month name the tracker exports are labelled with.
    fn from(month: Month) -> Self {
        let name = match month {
            Month::January => "Enero",
            Month::February => "Febrero",
            Month::March => "Marzo",
            Month::April => "Abril",
            Month::May => "Mayo",
            Month::June => "Junio",
            Month::July => "Julio",
            Month::August => "Agosto",
            Month::September => "Septiembre",
            Month::October => "Octubre",
            Month::November => "Noviembre",
            Month::December => "Diciembre",
        };
        Self(name.to_owned())
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mapping from sprint number to the month it is reported under.
///
/// Month order is implied by the mapping itself: a month sorts by the lowest
/// sprint number mapped to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SprintMonthMap {
    entries: BTreeMap<SprintNumber, MonthLabel>,
}

impl SprintMonthMap {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds or replaces the month for a sprint.
    #[must_use]
    pub fn with_entry(mut self, sprint: SprintNumber, month: MonthLabel) -> Self {
        self.entries.insert(sprint, month);
        self
    }

    /// Builds a mapping that assigns two consecutive sprints to each month.
    ///
    /// `anchor_sprint` opens `anchor_month`; sprints before the anchor fall
    /// into earlier months. Months wrap around the year end, but a range
    /// may span at most twelve months since labels carry no year.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsDomainError::SprintRangeSpansYear`] when `first..=last`
    /// would reuse a month label a year later.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence::metrics::domain::{SprintMonthMap, SprintNumber};
    /// use chrono::Month;
    ///
    /// let map = SprintMonthMap::two_per_month(SprintNumber::new(3), Month::August, 2, 5)
    ///     .expect("range within a year");
    /// let month = |n| map.month_for(SprintNumber::new(n)).map(|m| m.as_str().to_owned());
    /// assert_eq!(month(2).as_deref(), Some("Julio"));
    /// assert_eq!(month(4).as_deref(), Some("Agosto"));
    /// assert_eq!(month(5).as_deref(), Some("Septiembre"));
    /// ```
    pub fn two_per_month(
        anchor_sprint: SprintNumber,
        anchor_month: Month,
        first: u32,
        last: u32,
    ) -> Result<Self, MetricsDomainError> {
        let span = month_offset(anchor_sprint, last) - month_offset(anchor_sprint, first);
        if span >= MONTHS_PER_YEAR {
            return Err(MetricsDomainError::SprintRangeSpansYear { first, last });
        }
        Ok(Self::two_per_month_unchecked(anchor_sprint, anchor_month, first, last))
    }

    fn two_per_month_unchecked(
        anchor_sprint: SprintNumber,
        anchor_month: Month,
        first: u32,
        last: u32,
    ) -> Self {
        let anchor_index = i64::from(anchor_month.number_from_month()) - 1;
        let entries = (first..=last)
            .filter_map(|sprint| {
                let month_index =
                    (anchor_index + month_offset(anchor_sprint, sprint)).rem_euclid(MONTHS_PER_YEAR);
                let month = u8::try_from(month_index + 1)
                    .ok()
                    .and_then(|number| Month::try_from(number).ok())?;
                Some((SprintNumber::new(sprint), MonthLabel::from(month)))
            })
            .collect();
        Self { entries }
    }

    /// Parses the `Sprint 2:Julio,Sprint 3:Agosto` form.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsDomainError::InvalidSprintMapping`] when a pair has
    /// no `:` separator or an unparseable sprint, and
    /// [`MetricsDomainError::EmptyMonthLabel`] when a month is blank.
    pub fn parse(value: &str) -> Result<Self, MetricsDomainError> {
        value
            .split(',')
            .filter(|pair| !pair.trim().is_empty())
            .try_fold(Self::new(), |map, pair| -> Result<Self, MetricsDomainError> {
                let (sprint, month) = pair
                    .split_once(':')
                    .ok_or_else(|| MetricsDomainError::InvalidSprintMapping(pair.trim().to_owned()))?;
                let label = SprintLabel::parse(sprint)
                    .map_err(|_| MetricsDomainError::InvalidSprintMapping(pair.trim().to_owned()))?;
                Ok(map.with_entry(label.number(), MonthLabel::new(month)?))
            })
    }

    /// Returns the month a sprint is reported under.
    #[must_use]
    pub fn month_for(&self, sprint: SprintNumber) -> Option<&MonthLabel> {
        self.entries.get(&sprint)
    }

    /// Returns months in the order implied by the mapping.
    #[must_use]
    pub fn month_order(&self) -> Vec<&MonthLabel> {
        let mut ordered: Vec<&MonthLabel> = Vec::new();
        for month in self.entries.values() {
            if !ordered.contains(&month) {
                ordered.push(month);
            }
        }
        ordered
    }

    /// Iterates over entries in sprint order.
    pub fn iter(&self) -> impl Iterator<Item = (SprintNumber, &MonthLabel)> {
        self.entries.iter().map(|(sprint, month)| (*sprint, month))
    }

    /// Returns the number of mapped sprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no sprint is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SprintMonthMap {
    /// Two sprints per month, Sprint 3 opening Agosto, covering sprints 2–9.
    fn default() -> Self {
        Self::two_per_month_unchecked(
            SprintNumber::new(DEFAULT_ANCHOR_SPRINT),
            DEFAULT_ANCHOR_MONTH,
            DEFAULT_FIRST_SPRINT,
            DEFAULT_LAST_SPRINT,
        )
    }
}

/// Months between the anchor sprint's month and `sprint`'s month.
fn month_offset(anchor_sprint: SprintNumber, sprint: u32) -> i64 {
    (i64::from(sprint) - i64::from(anchor_sprint.value())).div_euclid(SPRINTS_PER_MONTH)
}
