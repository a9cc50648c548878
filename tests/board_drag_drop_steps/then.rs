//! Then steps for board drag and drop BDD scenarios.

use super::world::{BoardWorld, parse_status};
use rstest_bdd_macros::then;
use taskboard::board::{domain::TaskId, services::DropResult};

#[then(r#"column "{status}" contains task {task_id:i64}"#)]
fn column_contains(world: &BoardWorld, status: String, task_id: i64) -> Result<(), eyre::Report> {
    let column = parse_status(&status)?;
    let ids = world.board()?.column_ids(column);
    eyre::ensure!(
        ids.contains(&TaskId::new(task_id)),
        "expected task {task_id} in {column}, found {ids:?}"
    );
    Ok(())
}

#[then(r#"column "{status}" does not contain task {task_id:i64}"#)]
fn column_lacks(world: &BoardWorld, status: String, task_id: i64) -> Result<(), eyre::Report> {
    let column = parse_status(&status)?;
    let ids = world.board()?.column_ids(column);
    eyre::ensure!(
        !ids.contains(&TaskId::new(task_id)),
        "task {task_id} should have left {column}"
    );
    Ok(())
}

#[then(r#"the repository records task {task_id:i64} as "{status}""#)]
fn repository_records(
    world: &BoardWorld,
    task_id: i64,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let stored = world
        .repository
        .task(TaskId::new(task_id))?
        .and_then(|task| task.status());
    eyre::ensure!(
        stored == Some(expected),
        "expected stored status {expected}, found {stored:?}"
    );
    Ok(())
}

#[then("the repository received {count:usize} status changes")]
fn repository_received(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let calls = world.repository.update_calls();
    eyre::ensure!(calls == count, "expected {count} status changes, saw {calls}");
    Ok(())
}

#[then(r#"a notice mentions "{text}""#)]
fn notice_mentions(world: &BoardWorld, text: String) -> Result<(), eyre::Report> {
    let notices = world.board()?.notices();
    eyre::ensure!(
        notices
            .iter()
            .any(|notice| notice.message().contains(text.as_str())),
        "no notice mentions {text:?}"
    );
    Ok(())
}

#[then("the drag was cancelled")]
fn drag_was_cancelled(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_drop
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing drop result"))?;
    eyre::ensure!(
        matches!(result, Ok(DropResult::Cancelled { .. })),
        "expected a cancelled drag, got {result:?}"
    );
    eyre::ensure!(world.board()?.drag_state().is_none(), "drag should be idle");
    Ok(())
}
