//! Decides per task whether it counts at all and whether it was delivered.

use crate::metrics::domain::{Task, TeamProfile};
use serde::Serialize;

/// Outcome of classifying one task under a team profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Classification {
    eligible: bool,
    delivered: bool,
}

impl Classification {
    /// Excluded from every metric.
    pub const INELIGIBLE: Self = Self {
        eligible: false,
        delivered: false,
    };

    /// Counted in denominators but not delivered.
    pub const PENDING: Self = Self {
        eligible: true,
        delivered: false,
    };

    /// Counted and delivered.
    pub const DELIVERED: Self = Self {
        eligible: true,
        delivered: true,
    };

    /// Returns whether the task counts in any metric.
    #[must_use]
    pub const fn is_eligible(self) -> bool {
        self.eligible
    }

    /// Returns whether the task counts as delivered.
    #[must_use]
    pub const fn is_delivered(self) -> bool {
        self.delivered
    }
}

/// A task paired with its classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedTask<'a> {
    /// The classified task.
    pub task: &'a Task,
    /// Its classification.
    pub classification: Classification,
}

/// Pure classifier for one team profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryClassifier {
    profile: TeamProfile,
}

impl DeliveryClassifier {
    /// Creates a classifier for the profile.
    #[must_use]
    pub const fn new(profile: TeamProfile) -> Self {
        Self { profile }
    }

    /// Returns the active profile.
    #[must_use]
    pub const fn profile(&self) -> TeamProfile {
        self.profile
    }

    /// Classifies one task.
    ///
    /// Copies are never eligible. Under [`TeamProfile::InDevelopment`], a
    /// zero-point task at the QA-certified stage is a placeholder and is
    /// excluded entirely rather than counted as delivered.
    #[must_use]
    pub fn classify(&self, task: &Task) -> Classification {
        if task.is_copy() {
            return Classification::INELIGIBLE;
        }
        let stage = task.state().stage();
        if let Some(excluded_stage) = self.profile.zero_point_exclusion_stage()
            && stage == Some(excluded_stage)
            && task.effective_points() <= 0.0
        {
            return Classification::INELIGIBLE;
        }
        if stage.is_some_and(|value| self.profile.is_delivered_stage(value)) {
            Classification::DELIVERED
        } else {
            Classification::PENDING
        }
    }

    /// Classifies every task, keeping export order.
    #[must_use]
    pub fn classify_all<'a>(&self, tasks: &'a [Task]) -> Vec<ClassifiedTask<'a>> {
        tasks
            .iter()
            .map(|task| ClassifiedTask {
                task,
                classification: self.classify(task),
            })
            .collect()
    }
}
