use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::board::Board;
use crate::model::store::Store;
use crate::model::task::{Priority, Task};

/// Tasks per priority level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorityHistogram {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl PriorityHistogram {
    fn add(&mut self, priority: Priority) {
        match priority {
            Priority::Low => self.low += 1,
            Priority::Medium => self.medium += 1,
            Priority::High => self.high += 1,
        }
    }
}

/// Tasks by days since creation: up to a week, up to a month, older
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgeBuckets {
    pub week: usize,
    pub month: usize,
    pub older: usize,
}

/// Tasks by subtask count: 0-2 simple, 3-5 medium, 6+ complex
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplexityBuckets {
    pub simple: usize,
    pub medium: usize,
    pub complex: usize,
}

/// Completion of all tasks sharing a column name, across boards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnEfficiency {
    pub name: String,
    pub total: usize,
    pub completed: usize,
    /// completed / total, 0.0 for an empty column
    pub ratio: f64,
}

/// Per-board roll-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Rounded percentage, 0 for an empty board
    pub completion_rate: u32,
    pub high_priority_tasks: usize,
    pub overdue_tasks: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub total_boards: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Rounded percentage of completed tasks
    pub completion_rate: u32,
    pub priorities: PriorityHistogram,
    pub overdue_tasks: usize,
    pub age: AgeBuckets,
    pub complexity: ComplexityBuckets,
    pub columns: Vec<ColumnEfficiency>,
    pub boards: Vec<BoardSummary>,
    /// ID of the board with the most tasks (first on ties)
    pub most_active_board: Option<String>,
    /// Name of the column with the best completion ratio (first on ties)
    pub most_efficient_column: Option<String>,
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

/// Overdue once the due day has started: its midnight (UTC) is before `now`.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    task.due_date
        .and_then(|due| due.and_hms_opt(0, 0, 0))
        .is_some_and(|midnight| midnight.and_utc() < now)
}

pub fn summarize_board(board: &Board, now: DateTime<Utc>) -> BoardSummary {
    let total = board.task_count();
    let completed = board.tasks().filter(|t| t.is_completed()).count();
    BoardSummary {
        id: board.id.clone(),
        name: board.name.clone(),
        total_tasks: total,
        completed_tasks: completed,
        completion_rate: percent(completed, total),
        high_priority_tasks: board.tasks().filter(|t| t.priority == Priority::High).count(),
        overdue_tasks: board.tasks().filter(|t| is_overdue(t, now)).count(),
        columns: board.columns.len(),
    }
}

/// Reduce every task on every board into dashboard figures.
pub fn compute(store: &Store, now: DateTime<Utc>) -> Analytics {
    let mut total = 0;
    let mut completed = 0;
    let mut overdue = 0;
    let mut priorities = PriorityHistogram::default();
    let mut age = AgeBuckets::default();
    let mut complexity = ComplexityBuckets::default();
    let mut by_column: IndexMap<&str, (usize, usize)> = IndexMap::new();

    for board in store.boards() {
        for column in &board.columns {
            let entry = by_column.entry(column.name.as_str()).or_insert((0, 0));
            for task in &column.tasks {
                total += 1;
                entry.0 += 1;
                if task.is_completed() {
                    completed += 1;
                    entry.1 += 1;
                }
                if is_overdue(task, now) {
                    overdue += 1;
                }
                priorities.add(task.priority);

                let days = (now - task.creation_date).num_days();
                match days {
                    ..=7 => age.week += 1,
                    8..=30 => age.month += 1,
                    _ => age.older += 1,
                }
                match task.subtasks.len() {
                    0..=2 => complexity.simple += 1,
                    3..=5 => complexity.medium += 1,
                    _ => complexity.complex += 1,
                }
            }
        }
    }

    let columns: Vec<ColumnEfficiency> = by_column
        .into_iter()
        .map(|(name, (total, completed))| ColumnEfficiency {
            name: name.to_string(),
            total,
            completed,
            ratio: if total == 0 {
                0.0
            } else {
                completed as f64 / total as f64
            },
        })
        .collect();

    let mut most_efficient: Option<&ColumnEfficiency> = None;
    for col in &columns {
        if most_efficient.is_none_or(|best| col.ratio > best.ratio) {
            most_efficient = Some(col);
        }
    }
    let most_efficient_column = most_efficient.map(|c| c.name.clone());

    let boards: Vec<BoardSummary> = store
        .boards()
        .iter()
        .map(|b| summarize_board(b, now))
        .collect();
    let mut most_active: Option<&BoardSummary> = None;
    for b in &boards {
        if most_active.is_none_or(|best| b.total_tasks > best.total_tasks) {
            most_active = Some(b);
        }
    }
    let most_active_board = most_active.map(|b| b.id.clone());

    Analytics {
        total_boards: store.boards().len(),
        total_tasks: total,
        completed_tasks: completed,
        completion_rate: percent(completed, total),
        priorities,
        overdue_tasks: overdue,
        age,
        complexity,
        columns,
        boards,
        most_active_board,
        most_efficient_column,
    }
}
