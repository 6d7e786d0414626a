use chrono::Utc;
use rand::seq::IndexedRandom;

use crate::model::id::new_id;
use crate::model::person::{AVATAR_COLORS, Person, initials};
use crate::model::store::Store;
use crate::model::task::Task;

/// Error type for person operations
#[derive(Debug, thiserror::Error)]
pub enum PersonError {
    #[error("person name cannot be empty")]
    EmptyName,
}

/// Trim an optional text field, mapping blank to `None`.
fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn random_color() -> String {
    AVATAR_COLORS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(AVATAR_COLORS[0])
        .to_string()
}

/// Add a person to the directory. Returns the new person's ID.
pub fn add_person(
    store: &mut Store,
    name: &str,
    email: Option<&str>,
    role: Option<&str>,
) -> Result<String, PersonError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PersonError::EmptyName);
    }
    let person = Person {
        id: new_id(),
        name: name.to_string(),
        email: clean(email),
        role: clean(role),
        initials: initials(name),
        color: random_color(),
        created_at: Utc::now(),
    };
    let id = person.id.clone();
    store.people.insert(person);
    Ok(id)
}

/// Replace a person's name, email and role. Color, ID and creation time are
/// kept. Returns false if the ID is unknown.
pub fn edit_person(
    store: &mut Store,
    person_id: &str,
    name: &str,
    email: Option<&str>,
    role: Option<&str>,
) -> bool {
    let Some(person) = store.people.get_mut(person_id) else {
        tracing::debug!(person = person_id, "edit_person: no such person");
        return false;
    };
    person.name = name.trim().to_string();
    person.initials = initials(name);
    person.email = clean(email);
    person.role = clean(role);
    true
}

/// Remove a person. Tasks still referencing the ID are left alone.
pub fn delete_person(store: &mut Store, person_id: &str) -> bool {
    store.people.remove(person_id).is_some()
}

/// Sample people seeded into an empty directory: (name, email, role)
const DEFAULT_PEOPLE: [(&str, &str, &str); 2] = [
    ("John Doe", "john@example.com", "Developer"),
    ("Jane Smith", "jane@example.com", "Designer"),
];

/// Seed the two sample people, only into an empty directory.
/// Returns the number of people added.
pub fn seed_default_people(store: &mut Store) -> usize {
    if !store.people.is_empty() {
        return 0;
    }
    seed_people(store, &DEFAULT_PEOPLE)
}

/// Add each (name, email, role) entry, counting the ones accepted.
fn seed_people(store: &mut Store, people: &[(&str, &str, &str)]) -> usize {
    let mut added = 0;
    for &(name, email, role) in people {
        match add_person(store, name, Some(email), Some(role)) {
            Ok(_) => added += 1,
            Err(e) => tracing::warn!(name, error = %e, "skipping seed person"),
        }
    }
    added
}

/// Assignees of a task that still exist in the directory, in assignment order.
/// Dangling IDs are skipped.
pub fn resolve_assignees<'a>(store: &'a Store, task: &Task) -> Vec<&'a Person> {
    task.assignees
        .iter()
        .filter_map(|id| store.people.get(id))
        .collect()
}
