//! In-memory bookmark and history lists.
//!
//! Both lists live behind a single lock so concurrent requests never observe
//! a half-applied insert or trim. Nothing is persisted.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub const HISTORY_CAPACITY: usize = 200;

const ID_LEN: usize = 8;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelf {
    Bookmarks,
    History,
}

impl Shelf {
    fn capacity(&self) -> Option<usize> {
        match self {
            Shelf::Bookmarks => None,
            Shelf::History => Some(HISTORY_CAPACITY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryList {
    pub items: Vec<Entry>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LibraryError {
    #[error("Missing url")]
    MissingUrl,
}

#[derive(Debug, Default)]
struct Shelves {
    bookmarks: Vec<Entry>,
    history: Vec<Entry>,
}

impl Shelves {
    fn get_mut(&mut self, shelf: Shelf) -> &mut Vec<Entry> {
        match shelf {
            Shelf::Bookmarks => &mut self.bookmarks,
            Shelf::History => &mut self.history,
        }
    }

    fn get(&self, shelf: Shelf) -> &Vec<Entry> {
        match shelf {
            Shelf::Bookmarks => &self.bookmarks,
            Shelf::History => &self.history,
        }
    }
}

#[derive(Debug, Default)]
pub struct Library {
    shelves: RwLock<Shelves>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, newest first.
    pub async fn list(&self, shelf: Shelf) -> Vec<Entry> {
        self.shelves.read().await.get(shelf).clone()
    }

    pub async fn add(&self, shelf: Shelf, new: NewEntry) -> Result<Entry, LibraryError> {
        let url = new
            .url
            .filter(|u| !u.is_empty())
            .ok_or(LibraryError::MissingUrl)?;
        let title = new
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| url.clone());
        let entry = Entry {
            id: new_id(),
            title,
            url,
            ts: chrono::Utc::now().timestamp_millis(),
        };

        let mut shelves = self.shelves.write().await;
        let list = shelves.get_mut(shelf);
        list.insert(0, entry.clone());
        if let Some(cap) = shelf.capacity() {
            list.truncate(cap);
        }
        Ok(entry)
    }

    /// Removes the entry if present. Unknown ids are not an error.
    pub async fn remove(&self, shelf: Shelf, id: &str) -> bool {
        let mut shelves = self.shelves.write().await;
        let list = shelves.get_mut(shelf);
        match list.iter().position(|e| e.id == id) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }
}

fn new_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
