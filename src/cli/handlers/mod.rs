use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::persist::FileKv;
use crate::io::session::Session;
use crate::model::board::{Board, Column, StandardColumn};
use crate::model::config::AppConfig;
use crate::model::store::{Store, ViewMode};
use crate::model::task::{Priority, SubtaskDraft, Task, TaskDraft, TaskPatch};
use crate::ops::command::{Command, Outcome};
use crate::ops::list_view::{ListExpansion, group_board};
use crate::ops::people_ops::{self, PersonError};
use crate::ops::search::SearchMode;
use crate::ops::timeline::{self, TimelineWindow};
use crate::ops::{analytics, search, task_ops};
use crate::util::dates;

/// Data directory used when -C is not given
pub const DEFAULT_DATA_DIR: &str = ".kanban";

/// Errors for references and arguments the store cannot resolve
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no active board (create one with `kb board add <name>`)")]
    NoActiveBoard,
    #[error("board not found: {0}")]
    BoardNotFound(String),
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("subtask not found: {0}")]
    SubtaskNotFound(String),
    #[error("person not found: {0}")]
    PersonNotFound(String),
    #[error("'{0}' matches more than one item; use a longer ID")]
    Ambiguous(String),
    #[error("unknown priority '{0}' (expected: low, medium, high)")]
    InvalidPriority(String),
    #[error("could not parse date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("unknown view mode '{0}' (expected: kanban, list, timeline)")]
    InvalidViewMode(String),
    #[error("timeline step {0} moves past the supported date range")]
    TimelineOutOfRange(i32),
    #[error("nothing changed: {0}")]
    NoChange(String),
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn data_dir(cli: &Cli) -> PathBuf {
    PathBuf::from(cli.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, config: &AppConfig) -> CmdResult {
    let json = cli.json;
    let kv = Arc::new(FileKv::new(data_dir(&cli)));
    let mut session = Session::open(kv, &config.storage)?;

    if config.people.seed_defaults {
        session.dispatch(Command::SeedDefaultPeople);
    }

    match cli.command {
        None => cmd_show(&session, default_show_args(), config, json),
        Some(cmd) => match cmd {
            Commands::Board(args) => cmd_board(&mut session, args.action, json),
            Commands::Task(args) => cmd_task(&mut session, args.action, json),
            Commands::Toggle(args) => cmd_toggle(&mut session, args, json),
            Commands::Reorder(args) => cmd_reorder(&mut session, args, json),
            Commands::View(args) => cmd_view(&mut session, args, json),
            Commands::Show(args) => cmd_show(&session, args, config, json),
            Commands::Stats => cmd_stats(&session, json),
            Commands::Search(args) => cmd_search(&session, args, json),
            Commands::Person(args) => cmd_person(&mut session, args.action, json),
            Commands::Apply(args) => cmd_apply(&mut session, args),
        },
    }
}

fn default_show_args() -> ShowArgs {
    ShowArgs {
        mode: None,
        date: None,
        step: 0,
        collapse: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pick the single item whose ID equals `reference`, or failing that, the
/// single item whose ID starts with it.
fn match_id<'a, T>(
    items: impl Iterator<Item = &'a T> + Clone,
    id_of: impl Fn(&T) -> &str,
    reference: &str,
) -> Result<Option<&'a T>, CliError>
where
    T: 'a,
{
    if let Some(exact) = items.clone().find(|i| id_of(*i) == reference) {
        return Ok(Some(exact));
    }
    let mut prefixed = items.filter(|i| id_of(*i).starts_with(reference));
    let first = prefixed.next();
    if first.is_some() && prefixed.next().is_some() {
        return Err(CliError::Ambiguous(reference.to_string()));
    }
    Ok(first)
}

/// Board by ID, ID prefix or name; `None` means the active board.
fn resolve_board<'a>(store: &'a Store, reference: Option<&str>) -> Result<&'a Board, CliError> {
    let Some(reference) = reference else {
        return store.active_board().ok_or(CliError::NoActiveBoard);
    };
    if let Some(board) = match_id(store.boards().iter(), |b| b.id.as_str(), reference)? {
        return Ok(board);
    }
    store
        .boards()
        .iter()
        .find(|b| b.name.eq_ignore_ascii_case(reference))
        .ok_or_else(|| CliError::BoardNotFound(reference.to_string()))
}

/// Column by ID, name (case-insensitive) or a standard column alias.
fn resolve_column<'a>(board: &'a Board, reference: &str) -> Result<&'a Column, CliError> {
    if let Some(col) = board.columns.iter().find(|c| c.id == reference) {
        return Ok(col);
    }
    if let Some(col) = board
        .columns
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(reference))
    {
        return Ok(col);
    }
    let lowered = reference.trim().to_lowercase();
    StandardColumn::ALL
        .iter()
        .find(|k| k.aliases().contains(&lowered.as_str()))
        .and_then(|&k| board.standard_column(k))
        .ok_or_else(|| CliError::ColumnNotFound(reference.to_string()))
}

fn parse_standard_column(reference: &str) -> Result<StandardColumn, CliError> {
    let lowered = reference.trim().to_lowercase();
    StandardColumn::from_name(reference)
        .or_else(|| {
            StandardColumn::ALL
                .iter()
                .copied()
                .find(|k| k.aliases().contains(&lowered.as_str()))
        })
        .ok_or_else(|| CliError::ColumnNotFound(reference.to_string()))
}

/// Where a referenced task lives: (board ID, column ID, task ID)
struct TaskRef {
    board_id: String,
    column_id: String,
    task_id: String,
}

/// Task by ID or unique ID prefix across all boards.
fn resolve_task(store: &Store, reference: &str) -> Result<TaskRef, CliError> {
    if let Some(loc) = task_ops::locate_task(store, reference) {
        return Ok(TaskRef {
            board_id: loc.board_id,
            column_id: loc.column_id,
            task_id: reference.to_string(),
        });
    }
    let mut found: Option<TaskRef> = None;
    for board in store.boards() {
        for column in &board.columns {
            for task in column.tasks.iter().filter(|t| t.id.starts_with(reference)) {
                if found.is_some() {
                    return Err(CliError::Ambiguous(reference.to_string()));
                }
                found = Some(TaskRef {
                    board_id: board.id.clone(),
                    column_id: column.id.clone(),
                    task_id: task.id.clone(),
                });
            }
        }
    }
    found.ok_or_else(|| CliError::TaskNotFound(reference.to_string()))
}

fn task_at<'a>(store: &'a Store, r: &TaskRef) -> Result<(&'a Board, &'a Column, &'a Task), CliError> {
    store
        .board(&r.board_id)
        .and_then(|b| {
            b.column(&r.column_id)
                .and_then(|c| c.tasks.iter().find(|t| t.id == r.task_id).map(|t| (b, c, t)))
        })
        .ok_or_else(|| CliError::TaskNotFound(r.task_id.clone()))
}

fn resolve_person_id(store: &Store, reference: &str) -> Result<String, CliError> {
    match_id(store.people().iter(), |p| p.id.as_str(), reference)?
        .map(|p| p.id.clone())
        .ok_or_else(|| CliError::PersonNotFound(reference.to_string()))
}

fn parse_priority(value: &str) -> Result<Priority, CliError> {
    Priority::parse(value).ok_or_else(|| CliError::InvalidPriority(value.to_string()))
}

fn parse_due(value: &str) -> Result<NaiveDate, CliError> {
    dates::parse_date(value).ok_or_else(|| CliError::InvalidDate(value.to_string()))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Print a mutation's outcome. A no-op is an error for the CLI.
fn report(outcome: &Outcome, json: bool, what: &str) -> CmdResult {
    if !outcome.changed() {
        return Err(CliError::NoChange(what.to_string()).into());
    }
    if json {
        println!("{}", serde_json::to_string(outcome)?);
    } else if let Outcome::Created(id) = outcome {
        println!("{}", id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

fn cmd_board(session: &mut Session, action: BoardAction, json: bool) -> CmdResult {
    match action {
        BoardAction::Add(args) => {
            let outcome = session.dispatch(Command::AddBoard { name: args.name });
            report(&outcome, json, "board not created")
        }
        BoardAction::Edit(args) => {
            let id = resolve_board(session.store(), Some(&args.board))?.id.clone();
            let outcome = session.dispatch(Command::EditBoard {
                id,
                name: args.name,
            });
            report(&outcome, json, "board not edited")
        }
        BoardAction::Rm(args) => {
            let id = resolve_board(session.store(), Some(&args.board))?.id.clone();
            let outcome = session.dispatch(Command::DeleteBoard { id });
            report(&outcome, json, "board not deleted")
        }
        BoardAction::Use(args) => {
            let board = resolve_board(session.store(), Some(&args.board))?;
            let (id, name) = (board.id.clone(), board.name.clone());
            let outcome = session.dispatch(Command::SetActiveBoard { id });
            report(&outcome, json, "board not selected")?;
            if !json {
                println!("active board: {}", name);
            }
            Ok(())
        }
        BoardAction::List => {
            let store = session.store();
            let active = store.active_board_id();
            if json {
                let boards: Vec<_> = store
                    .boards()
                    .iter()
                    .map(|b| board_to_json(b, Some(b.id.as_str()) == active))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&boards)?);
            } else {
                for b in store.boards() {
                    println!("{}", format_board_line(b, Some(b.id.as_str()) == active));
                }
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

fn cmd_task(session: &mut Session, action: TaskAction, json: bool) -> CmdResult {
    match action {
        TaskAction::Add(args) => cmd_task_add(session, args, json),
        TaskAction::Edit(args) => cmd_task_edit(session, args, json),
        TaskAction::Mv(args) => {
            let r = resolve_task(session.store(), &args.id)?;
            let board = resolve_board(session.store(), Some(&r.board_id))?;
            let to = resolve_column(board, &args.column)?;
            let (to_column_id, to_name) = (to.id.clone(), to.name.clone());
            let outcome = session.dispatch(Command::MoveTask {
                board_id: r.board_id,
                task_id: r.task_id.clone(),
                to_column_id,
            });
            report(&outcome, json, "task is already in that column")?;
            if !json {
                println!("{} → {}", short_id(&r.task_id), to_name);
            }
            Ok(())
        }
        TaskAction::Rm(args) => {
            let r = resolve_task(session.store(), &args.id)?;
            let outcome = session.dispatch(Command::DeleteTask {
                board_id: r.board_id,
                column_id: r.column_id,
                task_id: r.task_id,
            });
            report(&outcome, json, "task not deleted")
        }
        TaskAction::Show(args) => {
            let store = session.store();
            let r = resolve_task(store, &args.id)?;
            let (board, column, task) = task_at(store, &r)?;
            let people = people_ops::resolve_assignees(store, task);
            if json {
                let detail = TaskDetailJson {
                    board_id: &board.id,
                    column_id: &column.id,
                    task,
                    completed: task.is_completed(),
                    assignee_people: people,
                };
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                for line in format_task_detail(board, column, task, &people, Utc::now()) {
                    println!("{}", line);
                }
            }
            Ok(())
        }
    }
}

fn cmd_task_add(session: &mut Session, args: TaskAddArgs, json: bool) -> CmdResult {
    let store = session.store();
    let board = resolve_board(store, args.board.as_deref())?;
    let column = resolve_column(board, &args.column)?;
    let assignees = args
        .assignees
        .iter()
        .map(|a| resolve_person_id(store, a))
        .collect::<Result<Vec<_>, _>>()?;

    let draft = TaskDraft {
        title: args.title,
        description: args.description.unwrap_or_default(),
        priority: args.priority.as_deref().map(parse_priority).transpose()?.unwrap_or_default(),
        due_date: args.due.as_deref().map(parse_due).transpose()?,
        creation_date: None,
        assignees,
        subtasks: args.subtasks.into_iter().map(SubtaskDraft::new).collect(),
    };
    let command = Command::AddTask {
        board_id: board.id.clone(),
        column_id: column.id.clone(),
        task: draft,
    };
    let outcome = session.dispatch(command);
    report(&outcome, json, "task not added")
}

fn cmd_task_edit(session: &mut Session, args: TaskEditArgs, json: bool) -> CmdResult {
    let store = session.store();
    let r = resolve_task(store, &args.id)?;
    let (board, _, task) = task_at(store, &r)?;
    let new_column_id = match &args.column {
        Some(c) => resolve_column(board, c)?.id.clone(),
        None => r.column_id.clone(),
    };

    let due_date = if args.clear_due {
        Some(None)
    } else {
        args.due.as_deref().map(parse_due).transpose()?.map(Some)
    };
    let assignees = if args.clear_assignees {
        Some(Vec::new())
    } else if args.assignees.is_empty() {
        None
    } else {
        Some(
            args.assignees
                .iter()
                .map(|a| resolve_person_id(store, a))
                .collect::<Result<Vec<_>, _>>()?,
        )
    };
    // new subtasks are appended to the existing ones
    let subtasks = if args.subtasks.is_empty() {
        None
    } else {
        let mut drafts: Vec<SubtaskDraft> = task
            .subtasks
            .iter()
            .map(|st| SubtaskDraft {
                id: Some(st.id.clone()),
                title: st.title.clone(),
                is_completed: Some(st.is_completed),
            })
            .collect();
        drafts.extend(args.subtasks.into_iter().map(SubtaskDraft::new));
        Some(drafts)
    };

    let patch = TaskPatch {
        title: args.title,
        description: args.description,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        due_date,
        assignees,
        subtasks,
    };
    let outcome = session.dispatch(Command::EditTask {
        board_id: r.board_id,
        old_column_id: r.column_id,
        new_column_id,
        task_id: r.task_id,
        task: patch,
    });
    report(&outcome, json, "task not edited")
}

fn cmd_toggle(session: &mut Session, args: ToggleArgs, json: bool) -> CmdResult {
    let store = session.store();
    let r = resolve_task(store, &args.task)?;
    let (_, _, task) = task_at(store, &r)?;

    let by_position = args
        .subtask
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| task.subtasks.get(i));
    let subtask = match by_position {
        Some(st) => st,
        None => match_id(task.subtasks.iter(), |st| st.id.as_str(), &args.subtask)?
            .ok_or_else(|| CliError::SubtaskNotFound(args.subtask.clone()))?,
    };
    let (subtask_id, title, now_done) = (subtask.id.clone(), subtask.title.clone(), !subtask.is_completed);

    let outcome = session.dispatch(Command::ToggleSubtask {
        board_id: r.board_id,
        column_id: r.column_id,
        task_id: r.task_id,
        subtask_id,
    });
    report(&outcome, json, "subtask not toggled")?;
    if !json {
        println!("[{}] {}", if now_done { 'x' } else { ' ' }, title);
    }
    Ok(())
}

fn cmd_reorder(session: &mut Session, args: ReorderArgs, json: bool) -> CmdResult {
    let store = session.store();
    let board = resolve_board(store, None)?;
    let column = resolve_column(board, &args.column)?;

    let mut remaining: Vec<Task> = column.tasks.clone();
    let mut ordered: Vec<Task> = Vec::with_capacity(remaining.len());
    for reference in &args.ids {
        let id = match_id(remaining.iter(), |t| t.id.as_str(), reference)?
            .map(|t| t.id.clone())
            .ok_or_else(|| CliError::TaskNotFound(reference.clone()))?;
        if let Some(idx) = remaining.iter().position(|t| t.id == id) {
            ordered.push(remaining.remove(idx));
        }
    }
    ordered.extend(remaining);

    let command = Command::ReorderTasks {
        board_id: board.id.clone(),
        column_id: column.id.clone(),
        tasks: ordered,
    };
    let outcome = session.dispatch(command);
    report(&outcome, json, "column not reordered")
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

fn cmd_view(session: &mut Session, args: ViewArgs, json: bool) -> CmdResult {
    let mode = ViewMode::parse(&args.mode).ok_or_else(|| CliError::InvalidViewMode(args.mode.clone()))?;
    let outcome = session.dispatch(Command::SetViewMode { mode });
    report(&outcome, json, "view mode not set")?;
    if !json {
        println!("view: {}", mode);
    }
    Ok(())
}

fn cmd_show(session: &Session, args: ShowArgs, config: &AppConfig, json: bool) -> CmdResult {
    let store = session.store();
    let board = resolve_board(store, None)?;
    let mode = match &args.mode {
        Some(m) => ViewMode::parse(m).ok_or_else(|| CliError::InvalidViewMode(m.clone()))?,
        None => store.view_mode(),
    };

    match mode {
        ViewMode::Kanban => {
            if json {
                println!("{}", serde_json::to_string_pretty(board)?);
            } else {
                for line in format_kanban(board) {
                    println!("{}", line);
                }
            }
        }
        ViewMode::List => {
            let mut expansion = ListExpansion::new();
            for c in &args.collapse {
                expansion.set_expanded(parse_standard_column(c)?, false);
            }
            let groups = group_board(board, &expansion);
            if json {
                let out: Vec<_> = groups.iter().map(list_group_to_json).collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for line in format_list(board, &groups) {
                    println!("{}", line);
                }
            }
        }
        ViewMode::Timeline => {
            let anchor = match &args.date {
                Some(d) => parse_due(d)?,
                None => today(),
            };
            let window = TimelineWindow::around(anchor, &config.timeline)
                .shift(i64::from(args.step))
                .ok_or(CliError::TimelineOutOfRange(args.step))?;
            let items = timeline::project(board, &window);
            if json {
                let out = TimelineJson {
                    start: window.start,
                    end: window.end(),
                    rows: timeline::row_count(&items),
                    items: &items,
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for line in format_timeline(board, &window, &items) {
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}

fn cmd_stats(session: &Session, json: bool) -> CmdResult {
    let stats = analytics::compute(session.store(), Utc::now());
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for line in format_stats(&stats) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(session: &Session, args: SearchArgs, json: bool) -> CmdResult {
    let mode = if args.regex {
        SearchMode::Regex
    } else {
        SearchMode::Literal
    };
    let re = search::search_regex(&args.pattern, mode)?;
    let hits = search::search_tasks(session.store(), &re);
    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }
    // one line per task, first matching field wins
    let mut seen = HashSet::new();
    for hit in &hits {
        if seen.insert(hit.task_id.as_str()) {
            println!("{}", format_search_hit(hit));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

fn cmd_person(session: &mut Session, action: PersonAction, json: bool) -> CmdResult {
    match action {
        PersonAction::Add(args) => {
            if args.name.trim().is_empty() {
                return Err(PersonError::EmptyName.into());
            }
            let outcome = session.dispatch(Command::AddPerson {
                name: args.name,
                email: args.email,
                role: args.role,
            });
            report(&outcome, json, "person not added")
        }
        PersonAction::Edit(args) => {
            let id = resolve_person_id(session.store(), &args.id)?;
            let outcome = session.dispatch(Command::EditPerson {
                id,
                name: args.name,
                email: args.email,
                role: args.role,
            });
            report(&outcome, json, "person not edited")
        }
        PersonAction::Rm(args) => {
            let id = resolve_person_id(session.store(), &args.id)?;
            let outcome = session.dispatch(Command::DeletePerson { id });
            report(&outcome, json, "person not removed")
        }
        PersonAction::List => {
            let people = session.store().people();
            if json {
                let all: Vec<_> = people.iter().collect();
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                for p in people.iter() {
                    println!("{}", format_person_line(p));
                }
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Raw events
// ---------------------------------------------------------------------------

fn cmd_apply(session: &mut Session, args: ApplyArgs) -> CmdResult {
    let text = if args.json == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.json
    };
    let command: Command = serde_json::from_str(&text)?;
    tracing::debug!(?command, "applying raw command");
    let outcome = session.dispatch(command);
    println!("{}", serde_json::to_string(&outcome)?);
    Ok(())
}
