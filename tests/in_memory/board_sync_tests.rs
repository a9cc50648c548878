//! End-to-end board synchronization against the in-memory adapters.
//!
//! These tests run on a multi-threaded runtime with real timers, using
//! shortened intervals, to exercise the loops as an embedding shell would.

use std::time::Duration;

use super::helpers::{
    PROJECT, SPRINT, board_for, bus, fast_config, project_board, repository,
};
use taskboard::board::{
    adapters::memory::UpdateFailure,
    domain::{
        BoardEvent, BoardEventKind, BoardScope, NoticeKind, Task, TaskId, TaskPriority, TaskStatus,
    },
    ports::NotificationBus,
    services::{DropResult, MutationOutcome, RefreshOutcome},
};
use tokio::time::{sleep, timeout};

/// Polls `condition` until it holds or `limit` elapses.
async fn eventually(limit: Duration, mut condition: impl FnMut() -> bool) -> bool {
    timeout(limit, async {
        while !condition() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .is_ok()
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn initial_load_partitions_the_project() -> Result<(), eyre::Report> {
    let repository = repository();
    let bus = bus();
    let board = project_board(&repository, &bus, fast_config());
    let outcome = board.activate().await?;

    eyre::ensure!(
        matches!(outcome, RefreshOutcome::Applied { task_count: 4 }),
        "unexpected first load {outcome:?}"
    );
    let view = board.snapshot();
    let columns = view.columns();
    eyre::ensure!(
        columns.get(TaskStatus::Todo).task_ids() == vec![TaskId::new(7), TaskId::new(9)],
        "TODO column should put the high-priority task first"
    );
    eyre::ensure!(columns.get(TaskStatus::InReview).is_empty(), "nothing in review");

    let stats = view.statistics();
    eyre::ensure!(stats.total_tasks == 4, "four tasks expected");
    eyre::ensure!(stats.total_estimated_hours == 11.0, "estimated hours");
    eyre::ensure!(stats.completed_estimated_hours == 3.0, "completed hours");
    board.shutdown();
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn committed_drop_reaches_other_boards_through_the_bus() -> Result<(), eyre::Report> {
    let repository = repository();
    let bus = bus();
    let project = project_board(&repository, &bus, fast_config());
    let sprint = board_for(&repository, &bus, fast_config(), BoardScope::Sprint(SPRINT));
    project.activate().await?;
    sprint.activate().await?;

    project.begin_drag(TaskId::new(7))?;
    project.drag_over_column(TaskStatus::InReview);
    let result = project.drop_on_column(TaskStatus::InReview).await?;
    eyre::ensure!(
        matches!(
            result,
            DropResult::Moved(MutationOutcome::Committed {
                status: TaskStatus::InReview,
                ..
            })
        ),
        "unexpected drop result {result:?}"
    );

    let seen = eventually(Duration::from_secs(2), || {
        sprint
            .column_ids(TaskStatus::InReview)
            .contains(&TaskId::new(7))
    })
    .await;
    eyre::ensure!(seen, "sprint board should pick up the move from the bus");

    project.shutdown();
    sprint.shutdown();
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn external_changes_arrive_by_bus_or_poll() -> Result<(), eyre::Report> {
    let repository = repository();
    let bus = bus();
    let board = project_board(&repository, &bus, fast_config());
    board.activate().await?;

    repository.upsert(
        PROJECT,
        Task::new(TaskId::new(12), "Triage reports", TaskStatus::Todo)
            .with_priority(TaskPriority::Critical),
    )?;
    bus.publish(BoardEvent::for_task(
        BoardEventKind::TaskCreated,
        TaskId::new(12),
    ));
    let created = eventually(Duration::from_secs(2), || {
        board.column_ids(TaskStatus::Todo).first() == Some(&TaskId::new(12))
    })
    .await;
    eyre::ensure!(created, "new critical task should lead the TODO column");

    repository.remove(TaskId::new(9))?;
    let removed = eventually(Duration::from_secs(2), || {
        !board.column_ids(TaskStatus::Todo).contains(&TaskId::new(9))
    })
    .await;
    eyre::ensure!(removed, "polling should drop the removed task");

    board.shutdown();
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn rejected_move_rolls_back_with_the_repository_message() -> Result<(), eyre::Report> {
    let repository = repository();
    let bus = bus();
    repository.set_update_failure(Some(
        UpdateFailure::Rejected(Some(
            "WIP limit reached".to_owned(),
        )),
    ))?;
    let board = project_board(&repository, &bus, fast_config());
    board.activate().await?;

    let outcome = board
        .move_task(TaskId::new(9), TaskStatus::InProgress)
        .await?;
    eyre::ensure!(
        matches!(outcome, MutationOutcome::RolledBack { .. }),
        "unexpected outcome {outcome:?}"
    );
    eyre::ensure!(
        board.column_ids(TaskStatus::Todo).contains(&TaskId::new(9)),
        "task 9 should be back in TODO"
    );

    let notices = board.notices();
    let notice = notices
        .first()
        .ok_or_else(|| eyre::eyre!("a notice should be raised"))?;
    eyre::ensure!(
        matches!(notice.kind(), NoticeKind::MutationFailed { .. }),
        "mutation notice expected"
    );
    eyre::ensure!(
        notice.message() == "Could not move \"Write changelog\" to In Progress: WIP limit reached",
        "unexpected message {}",
        notice.message()
    );
    eyre::ensure!(board.dismiss_notice(notice.id()), "notice should dismiss");
    board.shutdown();
    Ok(())
}
