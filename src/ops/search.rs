use std::ops::Range;

use regex::Regex;
use serde::Serialize;

use crate::model::board::{Board, Column};
use crate::model::store::Store;
use crate::model::task::Task;

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Title,
    Description,
    Subtask,
}

/// A search hit for one field of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub board_id: String,
    pub board_name: String,
    pub column_id: String,
    pub column_name: String,
    pub task_id: String,
    pub task_title: String,
    pub field: MatchField,
    /// Set for subtask hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtask_id: Option<String>,
    /// Byte ranges of every match within the field
    pub spans: Vec<Range<usize>>,
}

/// How a search term is read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Plain substring; metacharacters match themselves
    #[default]
    Literal,
    Regex,
}

/// Compile a case-insensitive matcher for `term`.
pub fn search_regex(term: &str, mode: SearchMode) -> Result<Regex, regex::Error> {
    let pattern = match mode {
        SearchMode::Literal => regex::escape(term),
        SearchMode::Regex => term.to_string(),
    };
    Regex::new(&format!("(?i){}", pattern))
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search every task on every board, in board then column order.
pub fn search_tasks(store: &Store, re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for board in store.boards() {
        for column in &board.columns {
            for task in &column.tasks {
                search_task(re, board, column, task, &mut hits);
            }
        }
    }
    hits
}

fn search_task(re: &Regex, board: &Board, column: &Column, task: &Task, hits: &mut Vec<SearchHit>) {
    let mut push = |field: MatchField, subtask_id: Option<&str>, spans: Vec<Range<usize>>| {
        hits.push(SearchHit {
            board_id: board.id.clone(),
            board_name: board.name.clone(),
            column_id: column.id.clone(),
            column_name: column.name.clone(),
            task_id: task.id.clone(),
            task_title: task.title.clone(),
            field,
            subtask_id: subtask_id.map(str::to_string),
            spans,
        });
    };

    let spans = find_matches(re, &task.title);
    if !spans.is_empty() {
        push(MatchField::Title, None, spans);
    }

    let spans = find_matches(re, &task.description);
    if !spans.is_empty() {
        push(MatchField::Description, None, spans);
    }

    for subtask in &task.subtasks {
        let spans = find_matches(re, &subtask.title);
        if !spans.is_empty() {
            push(MatchField::Subtask, Some(subtask.id.as_str()), spans);
        }
    }
}

/// IDs of the distinct tasks with at least one hit, in hit order
pub fn matching_task_ids(hits: &[SearchHit]) -> Vec<&str> {
    let mut ids: Vec<&str> = Vec::new();
    for hit in hits {
        if !ids.contains(&hit.task_id.as_str()) {
            ids.push(&hit.task_id);
        }
    }
    ids
}
