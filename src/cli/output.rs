use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::model::board::{Board, Column};
use crate::model::person::Person;
use crate::model::task::{Priority, Task};
use crate::ops::analytics::{Analytics, is_overdue};
use crate::ops::list_view::ListGroup;
use crate::ops::search::{MatchField, SearchHit};
use crate::ops::timeline::{TimelineItem, TimelineWindow, row_count};
use crate::util::unicode::{display_width, fit_to_width};

/// Width of one kanban column in cells
const COLUMN_WIDTH: usize = 24;
/// Cells per timeline day
const DAY_WIDTH: usize = 3;
/// Characters of a task ID shown in listings
const SHORT_ID_LEN: usize = 8;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardInfoJson<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub active: bool,
    pub columns: Vec<ColumnInfoJson<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfoJson<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub tasks: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetailJson<'a> {
    pub board_id: &'a str,
    pub column_id: &'a str,
    #[serde(flatten)]
    pub task: &'a Task,
    pub completed: bool,
    pub assignee_people: Vec<&'a Person>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroupJson<'a> {
    pub column: &'a str,
    pub column_id: Option<&'a str>,
    pub expanded: bool,
    pub tasks: &'a [&'a Task],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineJson<'a> {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub rows: usize,
    pub items: &'a [TimelineItem],
}

pub fn board_to_json(board: &Board, active: bool) -> BoardInfoJson<'_> {
    BoardInfoJson {
        id: &board.id,
        name: &board.name,
        active,
        columns: board
            .columns
            .iter()
            .map(|c| ColumnInfoJson {
                id: &c.id,
                name: &c.name,
                tasks: c.tasks.len(),
            })
            .collect(),
    }
}

pub fn list_group_to_json<'a>(group: &'a ListGroup<'a>) -> ListGroupJson<'a> {
    ListGroupJson {
        column: group.column.name(),
        column_id: group.column_id,
        expanded: group.expanded,
        tasks: &group.tasks,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "",
        Priority::Medium => "!",
        Priority::High => "!!",
    }
}

/// Subtask progress like `[1/3]`, or `[ ]` for a task without subtasks
fn progress(task: &Task) -> String {
    if task.subtasks.is_empty() {
        "[ ]".to_string()
    } else {
        format!("[{}/{}]", task.completed_subtasks(), task.subtasks.len())
    }
}

/// One-line task summary
pub fn format_task_line(task: &Task) -> String {
    let mut line = format!("{} {} {}", short_id(&task.id), progress(task), task.title);
    let marker = priority_marker(task.priority);
    if !marker.is_empty() {
        line.push(' ');
        line.push_str(marker);
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due {}", due));
    }
    line
}

pub fn format_board_line(board: &Board, active: bool) -> String {
    let marker = if active { "*" } else { " " };
    format!(
        "{} {} {} ({} tasks)",
        marker,
        short_id(&board.id),
        board.name,
        board.task_count()
    )
}

pub fn format_person_line(person: &Person) -> String {
    let mut line = format!("{} {:<2} {}", short_id(&person.id), person.initials, person.name);
    if let Some(role) = &person.role {
        line.push_str(&format!(" ({})", role));
    }
    if let Some(email) = &person.email {
        line.push_str(&format!(" <{}>", email));
    }
    line
}

/// Detailed task view
pub fn format_task_detail(
    board: &Board,
    column: &Column,
    task: &Task,
    people: &[&Person],
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut lines = vec![task.title.clone()];
    lines.push(format!("id: {}", task.id));
    lines.push(format!("board: {} / {}", board.name, column.name));
    lines.push(format!("priority: {}", task.priority));
    if let Some(due) = task.due_date {
        let overdue = if is_overdue(task, now) { " (overdue)" } else { "" };
        lines.push(format!("due: {}{}", due, overdue));
    }
    lines.push(format!("created: {}", task.creation_date.date_naive()));
    if !people.is_empty() {
        let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
        lines.push(format!("assignees: {}", names.join(", ")));
    }
    if !task.description.is_empty() {
        lines.push("description:".to_string());
        for line in task.description.lines() {
            lines.push(format!("  {}", line));
        }
    }
    if !task.subtasks.is_empty() {
        lines.push(format!(
            "subtasks ({}/{}):",
            task.completed_subtasks(),
            task.subtasks.len()
        ));
        for (i, st) in task.subtasks.iter().enumerate() {
            let check = if st.is_completed { 'x' } else { ' ' };
            lines.push(format!("  {}. [{}] {}", i + 1, check, st.title));
        }
    }
    lines
}

/// Columns side by side, one task per row
pub fn format_kanban(board: &Board) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", board.name), String::new()];
    let cell = |s: &str| fit_to_width(s, COLUMN_WIDTH);

    let header: Vec<String> = board
        .columns
        .iter()
        .map(|c| cell(&format!("{} ({})", c.name, c.tasks.len())))
        .collect();
    lines.push(header.join(" | ").trim_end().to_string());
    let rule: Vec<String> = board.columns.iter().map(|_| "-".repeat(COLUMN_WIDTH)).collect();
    lines.push(rule.join("-+-"));

    let depth = board.columns.iter().map(|c| c.tasks.len()).max().unwrap_or(0);
    for row in 0..depth {
        let cells: Vec<String> = board
            .columns
            .iter()
            .map(|c| match c.tasks.get(row) {
                Some(task) => cell(&format!("{} {}", progress(task), task.title)),
                None => cell(""),
            })
            .collect();
        lines.push(cells.join(" | ").trim_end().to_string());
    }
    lines
}

/// Grouped list view
pub fn format_list(board: &Board, groups: &[ListGroup<'_>]) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", board.name)];
    for group in groups {
        lines.push(String::new());
        let arrow = if group.expanded { 'v' } else { '>' };
        lines.push(format!("{} {} ({})", arrow, group.column.name(), group.tasks.len()));
        if group.expanded {
            for task in &group.tasks {
                lines.push(format!("  {}", format_task_line(task)));
            }
        }
    }
    lines
}

/// Timeline grid: a date header, then one line per packed row
pub fn format_timeline(board: &Board, window: &TimelineWindow, items: &[TimelineItem]) -> Vec<String> {
    let mut lines = vec![format!(
        "== {} == {} to {}",
        board.name,
        window.start.format("%b %d"),
        window.end().format("%b %d %Y")
    )];
    lines.push(String::new());

    let header: String = window
        .dates()
        .iter()
        .map(|d| format!("{:>2} ", d.day()))
        .collect();
    lines.push(header.trim_end().to_string());

    for row in 0..row_count(items) {
        let mut in_row: Vec<&TimelineItem> = items.iter().filter(|i| i.row == row).collect();
        in_row.sort_by_key(|i| i.start_column);

        let mut line = String::new();
        for item in in_row {
            let offset = item.start_column * DAY_WIDTH;
            let pad = offset.saturating_sub(display_width(&line));
            line.push_str(&" ".repeat(pad));
            let width = (item.end_column - item.start_column + 1) * DAY_WIDTH;
            // one cell of gap is left before the next day block
            line.push('[');
            line.push_str(&fit_to_width(&item.title, width.saturating_sub(3)));
            line.push(']');
        }
        lines.push(line.trim_end().to_string());
    }

    if items.is_empty() {
        lines.push("(no dated tasks in this window)".to_string());
    }
    lines
}

pub fn format_search_hit(hit: &SearchHit) -> String {
    format!(
        "[{} / {}] {} {} (in {})",
        hit.board_name,
        hit.column_name,
        short_id(&hit.task_id),
        hit.task_title,
        match hit.field {
            MatchField::Title => "title",
            MatchField::Description => "description",
            MatchField::Subtask => "subtask",
        }
    )
}

pub fn format_stats(stats: &Analytics) -> Vec<String> {
    let mut lines = vec![
        format!(
            "boards: {}  tasks: {}  completed: {} ({}%)  overdue: {}",
            stats.total_boards,
            stats.total_tasks,
            stats.completed_tasks,
            stats.completion_rate,
            stats.overdue_tasks
        ),
        format!(
            "priority: high {}  medium {}  low {}",
            stats.priorities.high, stats.priorities.medium, stats.priorities.low
        ),
        format!(
            "age: <=7d {}  <=30d {}  >30d {}",
            stats.age.week, stats.age.month, stats.age.older
        ),
        format!(
            "complexity: simple {}  medium {}  complex {}",
            stats.complexity.simple, stats.complexity.medium, stats.complexity.complex
        ),
    ];

    if let Some(id) = &stats.most_active_board
        && let Some(b) = stats.boards.iter().find(|b| &b.id == id)
    {
        lines.push(format!("most active board: {} ({} tasks)", b.name, b.total_tasks));
    }
    if let Some(name) = &stats.most_efficient_column
        && let Some(c) = stats.columns.iter().find(|c| &c.name == name)
    {
        lines.push(format!(
            "most efficient column: {} ({:.0}%)",
            c.name,
            c.ratio * 100.0
        ));
    }

    if !stats.columns.is_empty() {
        lines.push(String::new());
        lines.push("columns:".to_string());
        for c in &stats.columns {
            lines.push(format!(
                "  {} {:>3}/{:<3} {:>3.0}%",
                fit_to_width(&c.name, 16),
                c.completed,
                c.total,
                c.ratio * 100.0
            ));
        }
    }
    if !stats.boards.is_empty() {
        lines.push(String::new());
        lines.push("boards:".to_string());
        for b in &stats.boards {
            lines.push(format!(
                "  {} {:>3} tasks {:>3}%  {} high  {} overdue",
                fit_to_width(&b.name, 16),
                b.total_tasks,
                b.completion_rate,
                b.high_priority_tasks,
                b.overdue_tasks
            ));
        }
    }
    lines
}
