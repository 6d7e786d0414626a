use crate::model::board::Board;
use crate::model::id::new_id;
use crate::model::store::{Store, ViewMode};
use crate::ops::normalize::{normalize_columns, standard_columns};

/// Create a board with the four standard columns and make it active.
/// Returns the new board's ID.
pub fn add_board(store: &mut Store, name: &str) -> String {
    let board = Board {
        id: new_id(),
        name: name.to_string(),
        columns: standard_columns(),
    };
    let id = board.id.clone();
    store.boards.push(board);
    store.active_board = Some(id.clone());
    id
}

/// Rename a board and re-derive its columns against the standard set.
/// Returns false if the board is unknown.
pub fn edit_board(store: &mut Store, board_id: &str, name: &str) -> bool {
    let Some(board) = store.board_mut(board_id) else {
        tracing::debug!(board = board_id, "edit_board: no such board");
        return false;
    };
    board.name = name.to_string();
    let columns = std::mem::take(&mut board.columns);
    board.columns = normalize_columns(columns);
    true
}

/// Delete a board. If it was active, the first remaining board becomes
/// active (or none).
pub fn delete_board(store: &mut Store, board_id: &str) -> bool {
    let Some(idx) = store.boards.iter().position(|b| b.id == board_id) else {
        tracing::debug!(board = board_id, "delete_board: no such board");
        return false;
    };
    store.boards.remove(idx);
    if store.active_board.as_deref() == Some(board_id) {
        store.active_board = store.boards.first().map(|b| b.id.clone());
    }
    true
}

/// Point the active-board selector at `board_id`. No existence check: callers
/// pass IDs they got from the store.
pub fn set_active_board(store: &mut Store, board_id: &str) {
    store.active_board = Some(board_id.to_string());
}

pub fn set_view_mode(store: &mut Store, mode: ViewMode) {
    store.view_mode = mode;
}
