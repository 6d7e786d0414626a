use serde::{Deserialize, Serialize};

use super::id::new_id;
use super::task::Task;

/// The fixed four-stage column schema every board is normalized to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardColumn {
    #[serde(rename = "TO DO")]
    Todo,
    #[serde(rename = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "IN REVIEW")]
    InReview,
    #[serde(rename = "DONE")]
    Done,
}

impl StandardColumn {
    /// All standard columns in display order
    pub const ALL: [StandardColumn; 4] = [
        StandardColumn::Todo,
        StandardColumn::InProgress,
        StandardColumn::InReview,
        StandardColumn::Done,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StandardColumn::Todo => "TO DO",
            StandardColumn::InProgress => "IN PROGRESS",
            StandardColumn::InReview => "IN REVIEW",
            StandardColumn::Done => "DONE",
        }
    }

    /// Lowercase words that legacy free-form columns commonly used for this
    /// stage. Words that read the other way once negated ("not started",
    /// "incomplete") are left out.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            StandardColumn::Todo => &["todo", "backlog"],
            StandardColumn::InProgress => &["doing", "wip"],
            StandardColumn::InReview => &["review", "testing", "qa"],
            StandardColumn::Done => &[],
        }
    }

    /// Exact (case-insensitive) lookup by name
    pub fn from_name(name: &str) -> Option<StandardColumn> {
        let name = name.trim();
        StandardColumn::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for StandardColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered list of tasks sharing a status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Column {
    /// A fresh, empty column with a new ID
    pub fn new(name: impl Into<String>) -> Self {
        Column {
            id: new_id(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn standard(&self) -> Option<StandardColumn> {
        StandardColumn::from_name(&self.name)
    }
}

/// A board: the unit a user switches between
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Board {
    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    /// Find the column with a given standard name
    pub fn standard_column(&self, kind: StandardColumn) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == kind.name())
    }

    /// Column ID and task, for a task anywhere on this board
    pub fn find_task(&self, task_id: &str) -> Option<(&Column, &Task)> {
        self.columns.iter().find_map(|col| {
            col.tasks
                .iter()
                .find(|t| t.id == task_id)
                .map(|t| (col, t))
        })
    }

    /// All tasks in column order, then task order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.columns.iter().flat_map(|c| c.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_column_lookup() {
        assert_eq!(StandardColumn::from_name("to do"), Some(StandardColumn::Todo));
        assert_eq!(StandardColumn::from_name("DONE"), Some(StandardColumn::Done));
        assert_eq!(StandardColumn::from_name("Doing"), None);
    }

    #[test]
    fn standard_column_serializes_as_display_name() {
        let json = serde_json::to_string(&StandardColumn::InReview).unwrap();
        assert_eq!(json, "\"IN REVIEW\"");
    }

    #[test]
    fn legacy_column_fields_are_ignored() {
        let col: Column = serde_json::from_str(
            r#"{"id":"c1","name":"TO DO","color":"bg-blue-500","order":0,"tasks":[]}"#,
        )
        .unwrap();
        assert_eq!(col.standard(), Some(StandardColumn::Todo));
    }
}
