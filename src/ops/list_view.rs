use std::collections::HashMap;

use crate::model::board::{Board, StandardColumn};
use crate::model::store::Store;
use crate::model::task::Task;

/// Expanded/collapsed state per standard column. UI-local, never persisted.
/// Every column starts expanded.
#[derive(Debug, Clone, Default)]
pub struct ListExpansion {
    collapsed: HashMap<StandardColumn, bool>,
}

impl ListExpansion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, column: StandardColumn) -> bool {
        !self.collapsed.get(&column).copied().unwrap_or(false)
    }

    pub fn toggle(&mut self, column: StandardColumn) {
        let entry = self.collapsed.entry(column).or_insert(false);
        *entry = !*entry;
    }

    pub fn set_expanded(&mut self, column: StandardColumn, expanded: bool) {
        self.collapsed.insert(column, !expanded);
    }
}

/// One section of the list view
#[derive(Debug, Clone)]
pub struct ListGroup<'a> {
    pub column: StandardColumn,
    /// `None` when the board has no column with this name
    pub column_id: Option<&'a str>,
    pub tasks: Vec<&'a Task>,
    pub expanded: bool,
}

/// Group a board's tasks under the four standard columns, in fixed order.
pub fn group_board<'a>(board: &'a Board, expansion: &ListExpansion) -> Vec<ListGroup<'a>> {
    StandardColumn::ALL
        .iter()
        .map(|&kind| {
            let column = board.standard_column(kind);
            ListGroup {
                column: kind,
                column_id: column.map(|c| c.id.as_str()),
                tasks: column.map(|c| c.tasks.iter().collect()).unwrap_or_default(),
                expanded: expansion.is_expanded(kind),
            }
        })
        .collect()
}

/// List view of the active board. Empty when no board is active.
pub fn list_view<'a>(store: &'a Store, expansion: &ListExpansion) -> Vec<ListGroup<'a>> {
    store
        .active_board()
        .map(|board| group_board(board, expansion))
        .unwrap_or_default()
}
