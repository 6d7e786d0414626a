use serde::{Deserialize, Serialize};

use super::board::Board;
use super::person::{Person, PersonDirectory};
use super::store::{Store, ViewMode};

/// Persisted form of the store. Field names match the stored JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub boards: BoardsSlice,
    #[serde(default)]
    pub people: PeopleSlice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardsSlice {
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub active_board: Option<String>,
    #[serde(default)]
    pub view_mode: ViewMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeopleSlice {
    #[serde(default)]
    pub people: Vec<Person>,
}

impl Store {
    /// Rebuild a store from a snapshot. A dangling active-board pointer is
    /// repointed at the first board.
    pub fn from_snapshot(snapshot: Snapshot) -> Store {
        let Snapshot { boards, people } = snapshot;
        let mut active_board = boards.active_board;
        if let Some(id) = &active_board
            && !boards.boards.iter().any(|b| &b.id == id)
        {
            tracing::warn!(board = %id, "active board missing from snapshot");
            active_board = boards.boards.first().map(|b| b.id.clone());
        }
        Store {
            boards: boards.boards,
            active_board,
            view_mode: boards.view_mode,
            people: PersonDirectory::from_people(people.people),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            boards: BoardsSlice {
                boards: self.boards.clone(),
                active_board: self.active_board.clone(),
                view_mode: self.view_mode,
            },
            people: PeopleSlice {
                people: self.people.to_vec(),
            },
        }
    }
}
