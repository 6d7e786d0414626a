use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Avatar colors handed out to new people. Not unique per person.
pub const AVATAR_COLORS: [&str; 8] = [
    "#635FC7", // primary purple
    "#3B82F6", // blue
    "#10B981", // green
    "#F59E0B", // orange
    "#EF4444", // red
    "#8B5CF6", // violet
    "#EC4899", // pink
    "#14B8A6", // teal
];

/// Someone who can be assigned to tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Derived from `name`; recomputed on every rename
    pub initials: String,
    /// One of `AVATAR_COLORS`
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Derive display initials from a person's name.
///
/// A single-word name yields its first two characters; a longer name yields
/// the first character of the first and last words. Both are uppercased.
pub fn initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => "??".to_string(),
        [only] => only.graphemes(true).take(2).collect::<String>().to_uppercase(),
        [first, .., last] => {
            let a = first.graphemes(true).next().unwrap_or("");
            let b = last.graphemes(true).next().unwrap_or("");
            format!("{}{}", a, b).to_uppercase()
        }
    }
}

/// People keyed by ID, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonDirectory {
    people: IndexMap<String, Person>,
}

impl PersonDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from a persisted list. Later duplicates of an ID win.
    pub fn from_people(people: Vec<Person>) -> Self {
        PersonDirectory {
            people: people.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.people.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Person> {
        self.people.get_mut(id)
    }

    pub fn insert(&mut self, person: Person) {
        self.people.insert(person.id.clone(), person);
    }

    /// Remove by ID, keeping the order of the remaining people
    pub fn remove(&mut self, id: &str) -> Option<Person> {
        self.people.shift_remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> + Clone {
        self.people.values()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Person> {
        self.people.values().cloned().collect()
    }
}
