//! Every store mutation as a named command.
//!
//! UI events (form submits, drag releases, checkbox toggles) are turned into
//! a `Command` and handed to [`apply`], the single entry point that mutates a
//! [`Store`]. Commands deserialize from JSON so an event can be replayed as-is.

use serde::{Deserialize, Serialize};

use crate::model::store::{Store, ViewMode};
use crate::model::task::{Task, TaskDraft, TaskPatch};
use crate::ops::{board_ops, people_ops, task_ops};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    #[serde(rename_all = "camelCase")]
    AddBoard { name: String },
    #[serde(rename_all = "camelCase")]
    EditBoard { id: String, name: String },
    #[serde(rename_all = "camelCase")]
    DeleteBoard { id: String },
    #[serde(rename_all = "camelCase")]
    SetActiveBoard { id: String },
    #[serde(rename_all = "camelCase")]
    SetViewMode { mode: ViewMode },
    #[serde(rename_all = "camelCase")]
    AddTask {
        board_id: String,
        column_id: String,
        task: TaskDraft,
    },
    #[serde(rename_all = "camelCase")]
    EditTask {
        board_id: String,
        old_column_id: String,
        new_column_id: String,
        task_id: String,
        task: TaskPatch,
    },
    #[serde(rename_all = "camelCase")]
    MoveTask {
        board_id: String,
        task_id: String,
        to_column_id: String,
    },
    #[serde(rename_all = "camelCase")]
    DeleteTask {
        board_id: String,
        column_id: String,
        task_id: String,
    },
    #[serde(rename_all = "camelCase")]
    ToggleSubtask {
        board_id: String,
        column_id: String,
        task_id: String,
        subtask_id: String,
    },
    #[serde(rename_all = "camelCase")]
    ReorderTasks {
        board_id: String,
        column_id: String,
        tasks: Vec<Task>,
    },
    #[serde(rename_all = "camelCase")]
    AddPerson {
        name: String,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        role: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    EditPerson {
        id: String,
        name: String,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        role: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    DeletePerson { id: String },
    SeedDefaultPeople,
}

/// What a command did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "id", rename_all = "camelCase")]
pub enum Outcome {
    /// A new entity was created with this ID
    Created(String),
    /// State changed
    Applied,
    /// A coordinate did not resolve or the input was rejected; nothing changed
    NoOp,
}

impl Outcome {
    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::NoOp)
    }

    fn from_flag(applied: bool) -> Outcome {
        if applied { Outcome::Applied } else { Outcome::NoOp }
    }
}

/// Apply one command to the store.
pub fn apply(store: &mut Store, command: Command) -> Outcome {
    match command {
        Command::AddBoard { name } => Outcome::Created(board_ops::add_board(store, &name)),
        Command::EditBoard { id, name } => Outcome::from_flag(board_ops::edit_board(store, &id, &name)),
        Command::DeleteBoard { id } => Outcome::from_flag(board_ops::delete_board(store, &id)),
        Command::SetActiveBoard { id } => {
            board_ops::set_active_board(store, &id);
            Outcome::Applied
        }
        Command::SetViewMode { mode } => {
            board_ops::set_view_mode(store, mode);
            Outcome::Applied
        }
        Command::AddTask {
            board_id,
            column_id,
            task,
        } => task_ops::add_task(store, &board_id, &column_id, task)
            .map_or(Outcome::NoOp, Outcome::Created),
        Command::EditTask {
            board_id,
            old_column_id,
            new_column_id,
            task_id,
            task,
        } => Outcome::from_flag(task_ops::edit_task(
            store,
            &board_id,
            &old_column_id,
            &new_column_id,
            &task_id,
            task,
        )),
        Command::MoveTask {
            board_id,
            task_id,
            to_column_id,
        } => Outcome::from_flag(task_ops::move_task(store, &board_id, &task_id, &to_column_id)),
        Command::DeleteTask {
            board_id,
            column_id,
            task_id,
        } => Outcome::from_flag(task_ops::delete_task(store, &board_id, &column_id, &task_id)),
        Command::ToggleSubtask {
            board_id,
            column_id,
            task_id,
            subtask_id,
        } => Outcome::from_flag(task_ops::toggle_subtask(
            store,
            &board_id,
            &column_id,
            &task_id,
            &subtask_id,
        )),
        Command::ReorderTasks {
            board_id,
            column_id,
            tasks,
        } => Outcome::from_flag(task_ops::reorder_tasks(store, &board_id, &column_id, tasks)),
        Command::AddPerson { name, email, role } => {
            match people_ops::add_person(store, &name, email.as_deref(), role.as_deref()) {
                Ok(id) => Outcome::Created(id),
                Err(e) => {
                    tracing::debug!(error = %e, "add_person rejected");
                    Outcome::NoOp
                }
            }
        }
        Command::EditPerson {
            id,
            name,
            email,
            role,
        } => Outcome::from_flag(people_ops::edit_person(
            store,
            &id,
            &name,
            email.as_deref(),
            role.as_deref(),
        )),
        Command::DeletePerson { id } => Outcome::from_flag(people_ops::delete_person(store, &id)),
        Command::SeedDefaultPeople => {
            Outcome::from_flag(people_ops::seed_default_people(store) > 0)
        }
    }
}
