use serde::{Deserialize, Serialize};

use super::board::Board;
use super::person::PersonDirectory;

/// Which view the main area shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Kanban,
    List,
    Timeline,
}

impl ViewMode {
    pub fn parse(s: &str) -> Option<ViewMode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kanban" | "board" => Some(ViewMode::Kanban),
            "list" => Some(ViewMode::List),
            "timeline" | "calendar" => Some(ViewMode::Timeline),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Kanban => write!(f, "kanban"),
            ViewMode::List => write!(f, "list"),
            ViewMode::Timeline => write!(f, "timeline"),
        }
    }
}

/// The whole board/task graph plus the person directory.
///
/// Fields are only written through the operations in `crate::ops`, which keep
/// task status in sync with the containing column and the active-board
/// pointer pointing at an existing board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    pub(crate) boards: Vec<Board>,
    pub(crate) active_board: Option<String>,
    pub(crate) view_mode: ViewMode,
    pub(crate) people: PersonDirectory,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == board_id)
    }

    pub(crate) fn board_mut(&mut self, board_id: &str) -> Option<&mut Board> {
        self.boards.iter_mut().find(|b| b.id == board_id)
    }

    pub fn active_board_id(&self) -> Option<&str> {
        self.active_board.as_deref()
    }

    /// The active board, if the pointer is set and resolves
    pub fn active_board(&self) -> Option<&Board> {
        self.active_board.as_deref().and_then(|id| self.board(id))
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn people(&self) -> &PersonDirectory {
        &self.people
    }
}
