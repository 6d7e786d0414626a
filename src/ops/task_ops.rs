use chrono::Utc;

use crate::model::id::new_id;
use crate::model::store::Store;
use crate::model::task::{Priority, Subtask, SubtaskDraft, Task, TaskDraft, TaskPatch};

// ---------------------------------------------------------------------------
// Create / edit / delete
// ---------------------------------------------------------------------------

/// Append a new task to the end of a column.
///
/// The task and every subtask get fresh IDs, status is set to the column's
/// name and subtasks start incomplete. Returns the new task's ID, or `None`
/// if the board or column does not exist.
pub fn add_task(
    store: &mut Store,
    board_id: &str,
    column_id: &str,
    draft: TaskDraft,
) -> Option<String> {
    let Some(column) = store
        .board_mut(board_id)
        .and_then(|b| b.column_mut(column_id))
    else {
        tracing::debug!(board = board_id, column = column_id, "add_task: no such column");
        return None;
    };

    let task = Task {
        id: new_id(),
        title: draft.title,
        description: draft.description,
        status: column.name.clone(),
        priority: draft.priority,
        due_date: draft.due_date,
        creation_date: draft.creation_date.unwrap_or_else(Utc::now),
        assignees: draft.assignees,
        subtasks: draft
            .subtasks
            .into_iter()
            .map(|st| Subtask {
                id: new_id(),
                title: st.title,
                is_completed: false,
            })
            .collect(),
    };
    let id = task.id.clone();
    column.tasks.push(task);
    Some(id)
}

/// Edit a task, moving it when `old_column_id != new_column_id`.
///
/// Same column: the patch is merged in place and the task keeps its position.
/// Different column: the task is taken out of the old column, patched, given
/// the new column's name as status and appended to the new column. If the
/// task is not in the old column it is taken from wherever it sits on the
/// board; if it is nowhere on the board, it is inserted as a new task with
/// `task_id`. A missing destination column makes the whole edit a no-op so a
/// task is never removed without being re-inserted.
pub fn edit_task(
    store: &mut Store,
    board_id: &str,
    old_column_id: &str,
    new_column_id: &str,
    task_id: &str,
    patch: TaskPatch,
) -> bool {
    let Some(board) = store.board_mut(board_id) else {
        tracing::debug!(board = board_id, "edit_task: no such board");
        return false;
    };

    if old_column_id == new_column_id {
        let Some(column) = board.column_mut(old_column_id) else {
            tracing::debug!(column = old_column_id, "edit_task: no such column");
            return false;
        };
        let status = column.name.clone();
        let Some(task) = column.tasks.iter_mut().find(|t| t.id == task_id) else {
            tracing::debug!(task = task_id, "edit_task: no such task");
            return false;
        };
        apply_patch(task, patch);
        task.status = status;
        return true;
    }

    let Some(new_status) = board.column(new_column_id).map(|c| c.name.clone()) else {
        tracing::debug!(column = new_column_id, "edit_task: no destination column");
        return false;
    };

    let taken = board
        .column_mut(old_column_id)
        .and_then(|col| take_task(&mut col.tasks, task_id))
        .or_else(|| {
            board
                .columns
                .iter_mut()
                .find_map(|col| take_task(&mut col.tasks, task_id))
        });
    let mut task = taken.unwrap_or_else(|| {
        tracing::debug!(task = task_id, "edit_task: task not found, inserting");
        blank_task(task_id)
    });

    apply_patch(&mut task, patch);
    task.status = new_status;
    if let Some(dest) = board.column_mut(new_column_id) {
        dest.tasks.push(task);
    }
    true
}

/// Drag-and-drop release: move a task to another column of the same board,
/// wherever it currently is.
pub fn move_task(store: &mut Store, board_id: &str, task_id: &str, to_column_id: &str) -> bool {
    let Some(from_column_id) = store
        .board(board_id)
        .and_then(|b| b.find_task(task_id))
        .map(|(col, _)| col.id.clone())
    else {
        tracing::debug!(board = board_id, task = task_id, "move_task: no such task");
        return false;
    };
    if from_column_id == to_column_id {
        return false;
    }
    edit_task(
        store,
        board_id,
        &from_column_id,
        to_column_id,
        task_id,
        TaskPatch::default(),
    )
}

/// Remove a task by coordinate.
pub fn delete_task(store: &mut Store, board_id: &str, column_id: &str, task_id: &str) -> bool {
    store
        .board_mut(board_id)
        .and_then(|b| b.column_mut(column_id))
        .and_then(|col| take_task(&mut col.tasks, task_id))
        .is_some()
}

/// Flip a subtask's completion flag.
pub fn toggle_subtask(
    store: &mut Store,
    board_id: &str,
    column_id: &str,
    task_id: &str,
    subtask_id: &str,
) -> bool {
    let subtask = store
        .board_mut(board_id)
        .and_then(|b| b.column_mut(column_id))
        .and_then(|col| col.tasks.iter_mut().find(|t| t.id == task_id))
        .and_then(|t| t.subtasks.iter_mut().find(|st| st.id == subtask_id));
    match subtask {
        Some(st) => {
            st.is_completed = !st.is_completed;
            true
        }
        None => {
            tracing::debug!(task = task_id, subtask = subtask_id, "toggle_subtask: not found");
            false
        }
    }
}

/// Replace a column's task list with a caller-supplied ordering. Each task's
/// status is set to the column's name.
pub fn reorder_tasks(store: &mut Store, board_id: &str, column_id: &str, tasks: Vec<Task>) -> bool {
    let Some(column) = store
        .board_mut(board_id)
        .and_then(|b| b.column_mut(column_id))
    else {
        tracing::debug!(board = board_id, column = column_id, "reorder_tasks: no such column");
        return false;
    };
    column.tasks = tasks;
    for task in &mut column.tasks {
        task.status = column.name.clone();
    }
    true
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Where a task lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLocation {
    pub board_id: String,
    pub column_id: String,
}

/// Find a task by ID across all boards, preferring the active board.
pub fn locate_task(store: &Store, task_id: &str) -> Option<TaskLocation> {
    let active = store.active_board();
    active
        .into_iter()
        .chain(store.boards().iter())
        .find_map(|board| {
            board.find_task(task_id).map(|(col, _)| TaskLocation {
                board_id: board.id.clone(),
                column_id: col.id.clone(),
            })
        })
}

pub fn find_task<'a>(store: &'a Store, board_id: &str, task_id: &str) -> Option<&'a Task> {
    store
        .board(board_id)
        .and_then(|b| b.find_task(task_id))
        .map(|(_, t)| t)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn take_task(tasks: &mut Vec<Task>, task_id: &str) -> Option<Task> {
    let idx = tasks.iter().position(|t| t.id == task_id)?;
    Some(tasks.remove(idx))
}

fn blank_task(task_id: &str) -> Task {
    Task {
        id: task_id.to_string(),
        title: String::new(),
        description: String::new(),
        status: String::new(),
        priority: Priority::default(),
        due_date: None,
        creation_date: Utc::now(),
        assignees: Vec::new(),
        subtasks: Vec::new(),
    }
}

/// Merge patch fields over a task. Status is the caller's concern.
fn apply_patch(task: &mut Task, patch: TaskPatch) {
    if let Some(title) = patch.title {
        task.title = title;
    }
    if let Some(description) = patch.description {
        task.description = description;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(due_date) = patch.due_date {
        task.due_date = due_date;
    }
    if let Some(assignees) = patch.assignees {
        task.assignees = assignees;
    }
    if let Some(drafts) = patch.subtasks {
        task.subtasks = rebuild_subtasks(drafts, &task.subtasks);
    }
}

/// Rebuild a subtask list from drafts. Supplied IDs are kept; completion is
/// the supplied flag, else the existing subtask's flag, else false.
fn rebuild_subtasks(drafts: Vec<SubtaskDraft>, existing: &[Subtask]) -> Vec<Subtask> {
    drafts
        .into_iter()
        .map(|draft| {
            let prior = draft
                .id
                .as_deref()
                .and_then(|id| existing.iter().find(|st| st.id == id));
            Subtask {
                is_completed: draft
                    .is_completed
                    .or(prior.map(|st| st.is_completed))
                    .unwrap_or(false),
                id: draft.id.unwrap_or_else(new_id),
                title: draft.title,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
