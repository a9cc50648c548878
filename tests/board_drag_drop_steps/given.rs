//! Given steps for board drag and drop BDD scenarios.

use super::world::{BoardWorld, PROJECT, parse_status, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::board::{
    adapters::memory::UpdateFailure,
    domain::{Task, TaskId, TaskPriority},
};

#[given(r#"a task {task_id:i64} titled "{title}" in "{status}""#)]
fn seeded_task(
    world: &mut BoardWorld,
    task_id: i64,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let task = Task::new(TaskId::new(task_id), title, parse_status(&status)?);
    world
        .repository
        .upsert(PROJECT, task)
        .wrap_err("seed scenario task")?;
    Ok(())
}

#[given(r#"task {task_id:i64} has priority "{priority}""#)]
fn task_has_priority(
    world: &mut BoardWorld,
    task_id: i64,
    priority: String,
) -> Result<(), eyre::Report> {
    let level = TaskPriority::try_from(priority.as_str())
        .map_err(|err| eyre::eyre!("invalid priority in scenario: {err}"))?;
    let task = world
        .repository
        .task(TaskId::new(task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} has not been seeded"))?;
    world
        .repository
        .upsert(PROJECT, task.with_priority(level))
        .wrap_err("update scenario task priority")?;
    Ok(())
}

#[given(r#"the repository rejects status changes with "{message}""#)]
fn repository_rejects(world: &mut BoardWorld, message: String) -> Result<(), eyre::Report> {
    world
        .repository
        .set_update_failure(Some(UpdateFailure::Rejected(Some(message))))
        .wrap_err("script update rejection")?;
    Ok(())
}

#[given("the board is loaded")]
fn board_is_loaded(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let board = world.open_board();
    let outcome = run_async(board.activate()).wrap_err("activate board")?;
    eyre::ensure!(outcome.is_applied(), "first load failed: {outcome:?}");
    Ok(())
}
