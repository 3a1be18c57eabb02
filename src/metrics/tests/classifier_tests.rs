//! Delivery classification tests per team profile.

use crate::metrics::{
    domain::{RawTask, Task, TeamProfile},
    services::{Classification, DeliveryClassifier, TaskNormalizer},
};
use rstest::rstest;

fn task_in_state(state: &str, points: u32) -> Task {
    normalized(vec![
        RawTask::new("Task")
            .with_state(state)
            .with_estimated_points(points),
    ])
    .into_iter()
    .next()
    .expect("task retained")
}

fn normalized(rows: Vec<RawTask>) -> Vec<Task> {
    TaskNormalizer::new().normalize(&rows).tasks
}

#[rstest]
#[case(TeamProfile::Productive, "13. Producción", Classification::DELIVERED)]
#[case(TeamProfile::Productive, "11. Ready for Product Release", Classification::DELIVERED)]
#[case(TeamProfile::Productive, "10. UAT", Classification::PENDING)]
#[case(TeamProfile::Productive, "9. Certificado QA", Classification::PENDING)]
#[case(TeamProfile::Productive, "Backlog", Classification::PENDING)]
#[case(TeamProfile::InDevelopment, "9. Certificado QA", Classification::DELIVERED)]
#[case(TeamProfile::InDevelopment, "12. Deploy", Classification::DELIVERED)]
#[case(TeamProfile::InDevelopment, "8. QA", Classification::PENDING)]
fn stages_map_to_delivery(
    #[case] profile: TeamProfile,
    #[case] state: &str,
    #[case] expected: Classification,
) {
    let task = task_in_state(state, 3);
    assert_eq!(DeliveryClassifier::new(profile).classify(&task), expected);
}

#[rstest]
fn zero_point_qa_certified_task_is_ineligible_in_development() {
    let task = task_in_state("9. Certificado QA", 0);
    let classification = DeliveryClassifier::new(TeamProfile::InDevelopment).classify(&task);

    assert_eq!(classification, Classification::INELIGIBLE);
    assert!(!classification.is_eligible());
    assert!(!classification.is_delivered());
}

#[rstest]
fn zero_point_qa_certified_task_stays_pending_when_productive() {
    let task = task_in_state("9. Certificado QA", 0);
    assert_eq!(
        DeliveryClassifier::new(TeamProfile::Productive).classify(&task),
        Classification::PENDING
    );
}

#[rstest]
fn zero_point_task_past_qa_is_still_delivered() {
    let task = task_in_state("10. UAT", 0);
    assert_eq!(
        DeliveryClassifier::new(TeamProfile::InDevelopment).classify(&task),
        Classification::DELIVERED
    );
}

#[rstest]
#[case(TeamProfile::Productive)]
#[case(TeamProfile::InDevelopment)]
fn copies_are_never_eligible(#[case] profile: TeamProfile) {
    let tasks = normalized(vec![
        RawTask::new("Fix login").with_state("13. Producción"),
        RawTask::new("Fix login (copy)").with_state("13. Producción"),
    ]);
    let classified = DeliveryClassifier::new(profile).classify_all(&tasks);
    let outcomes: Vec<Classification> = classified
        .iter()
        .map(|entry| entry.classification)
        .collect();

    assert_eq!(
        outcomes,
        [Classification::DELIVERED, Classification::INELIGIBLE]
    );
}

#[rstest]
fn classify_all_keeps_export_order() {
    let tasks = normalized(vec![
        RawTask::new("A").with_state("1. Backlog"),
        RawTask::new("B").with_state("13. Producción"),
    ]);
    let classifier = DeliveryClassifier::new(TeamProfile::Productive);
    let names: Vec<&str> = classifier
        .classify_all(&tasks)
        .iter()
        .map(|entry| entry.task.name())
        .collect();

    assert_eq!(names, ["A", "B"]);
    assert_eq!(classifier.profile(), TeamProfile::Productive);
}
