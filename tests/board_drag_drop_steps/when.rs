//! When steps for board drag and drop BDD scenarios.

use super::world::{BoardWorld, parse_status, run_async};
use rstest_bdd_macros::when;
use taskboard::board::domain::TaskId;

#[when(r#"task {task_id:i64} is dragged onto the "{status}" column"#)]
fn drag_onto_column(
    world: &mut BoardWorld,
    task_id: i64,
    status: String,
) -> Result<(), eyre::Report> {
    let column = parse_status(&status)?;
    let board = world.board()?;
    board.begin_drag(TaskId::new(task_id))?;
    board.drag_over_column(column);
    let result = run_async(board.drop_on_column(column));
    world.last_drop = Some(result);
    Ok(())
}

#[when("task {task_id:i64} is dragged onto task {over:i64}")]
fn drag_onto_task(world: &mut BoardWorld, task_id: i64, over: i64) -> Result<(), eyre::Report> {
    let board = world.board()?;
    board.begin_drag(TaskId::new(task_id))?;
    board.drag_over_task(TaskId::new(over));
    let result = run_async(board.drop_on_task(TaskId::new(over)));
    world.last_drop = Some(result);
    Ok(())
}

#[when("task {task_id:i64} is released outside the board")]
fn release_outside(world: &mut BoardWorld, task_id: i64) -> Result<(), eyre::Report> {
    let board = world.board()?;
    board.begin_drag(TaskId::new(task_id))?;
    let result = board.release_outside();
    world.last_drop = Some(result);
    Ok(())
}
