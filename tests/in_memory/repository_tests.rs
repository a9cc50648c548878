//! Scope, filter and status update behaviour of the in-memory repository.

use super::helpers::{PROJECT, SPRINT, STORY, repository};
use rstest::rstest;
use taskboard::board::{
    adapters::memory::{InMemoryTaskRepository, UpdateFailure},
    domain::{BoardScope, ProjectId, StoryId, TaskFilters, TaskId, TaskStatus, UserId},
    ports::{StatusUpdate, TaskRepository, TaskRepositoryError},
};

fn ids(tasks: &[taskboard::board::domain::Task]) -> Vec<i64> {
    tasks.iter().map(|task| task.id().value()).collect()
}

#[rstest]
#[case(BoardScope::Project(PROJECT), vec![7, 8, 9, 11])]
#[case(BoardScope::Project(ProjectId::new(99)), vec![])]
#[case(BoardScope::Sprint(SPRINT), vec![7, 8])]
#[case(BoardScope::Story(STORY), vec![7, 8])]
#[case(BoardScope::Story(StoryId::new(404)), vec![])]
#[tokio::test]
async fn fetch_honours_scope(
    repository: InMemoryTaskRepository,
    #[case] scope: BoardScope,
    #[case] expected: Vec<i64>,
) -> Result<(), eyre::Report> {
    let tasks = repository.fetch_tasks(&scope, &TaskFilters::new()).await?;
    eyre::ensure!(ids(&tasks) == expected, "scope {scope} returned {:?}", ids(&tasks));
    Ok(())
}

#[rstest]
#[case(TaskFilters::new().with_task_type("CHORE"), vec![9, 11])]
#[case(TaskFilters::new().with_assignee(UserId::new(1)), vec![7, 9])]
#[case(
    TaskFilters::new().with_task_type("chore").with_assignee(UserId::new(1)),
    vec![9]
)]
#[tokio::test]
async fn fetch_applies_filters(
    repository: InMemoryTaskRepository,
    #[case] filters: TaskFilters,
    #[case] expected: Vec<i64>,
) -> Result<(), eyre::Report> {
    let tasks = repository
        .fetch_tasks(&BoardScope::Project(PROJECT), &filters)
        .await?;
    eyre::ensure!(ids(&tasks) == expected, "filters returned {:?}", ids(&tasks));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn accepted_update_returns_the_stamped_record(
    repository: InMemoryTaskRepository,
) -> Result<(), eyre::Report> {
    let response = repository
        .update_task_status(TaskId::new(9), TaskStatus::InReview)
        .await?;

    eyre::ensure!(response.success, "update should be accepted");
    let record = response
        .task
        .ok_or_else(|| eyre::eyre!("accepted update should carry the record"))?;
    eyre::ensure!(record.status() == Some(TaskStatus::InReview), "status not applied");
    eyre::ensure!(record.updated_at().is_some(), "record should be stamped");
    let stored = repository.task(TaskId::new(9))?;
    eyre::ensure!(stored == Some(record), "stored record should match response");
    Ok(())
}

#[rstest]
#[tokio::test]
async fn update_of_missing_task_is_not_found(repository: InMemoryTaskRepository) {
    let result = repository
        .update_task_status(TaskId::new(404), TaskStatus::Completed)
        .await;
    assert!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == TaskId::new(404)));
}

#[rstest]
#[tokio::test]
async fn scripted_rejection_leaves_the_store_untouched(
    repository: InMemoryTaskRepository,
) -> Result<(), eyre::Report> {
    repository.set_update_failure(Some(UpdateFailure::Rejected(Some(
        "WIP limit reached".to_owned(),
    ))))?;

    let response = repository
        .update_task_status(TaskId::new(7), TaskStatus::InProgress)
        .await?;

    eyre::ensure!(
        response
            == StatusUpdate {
                success: false,
                task: None,
                message: Some("WIP limit reached".to_owned()),
            },
        "unexpected response {response:?}"
    );
    let stored = repository
        .task(TaskId::new(7))?
        .and_then(|task| task.status());
    eyre::ensure!(stored == Some(TaskStatus::Todo), "store should be untouched");
    eyre::ensure!(repository.update_calls() == 1, "one update should be counted");
    Ok(())
}
