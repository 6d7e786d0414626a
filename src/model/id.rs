use uuid::Uuid;

/// Generate a fresh opaque identifier for a board, column, task, subtask or person.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
