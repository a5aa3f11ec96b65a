//! JSON-file persistence for flashcards.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// One card: a prompt on the front, the answer on the back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Prompt side.
    pub front: String,
    /// Answer side.
    pub back: String,
}

impl Flashcard {
    /// Creates a card.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Topic name to its cards. Topics and cards keep insertion order, on disk too.
pub type Deck = IndexMap<String, Vec<Flashcard>>;

/// Failures reading or writing the flashcard file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file could not be read or written.
    #[error("không thể truy cập tệp thẻ ghi nhớ {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file exists but is not a valid deck.
    #[error("tệp thẻ ghi nhớ {path} bị hỏng: {source}")]
    Corrupt {
        /// File involved.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Flashcards persisted as one pretty-printed JSON document.
///
/// Every read-modify-write cycle runs under an exclusive lock and the file is
/// replaced through a rename, so a crash never leaves a half-written deck.
#[derive(Debug)]
pub struct FlashcardStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FlashcardStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `card` to `topic`, creating the topic if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck cannot be loaded or saved.
    pub fn add(&self, topic: &str, card: Flashcard) -> Result<usize, StoreError> {
        let _guard = self.lock.lock();
        let mut deck = self.load()?;
        let cards = deck.entry(topic.to_string()).or_default();
        cards.push(card);
        let count = cards.len();
        self.save(&deck)?;
        debug!(topic, count, "Flashcard added");
        Ok(count)
    }

    /// Cards of `topic`, empty if the topic does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck cannot be loaded.
    pub fn cards(&self, topic: &str) -> Result<Vec<Flashcard>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.shift_remove(topic).unwrap_or_default())
    }

    /// Topic names in the order they were first added.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck cannot be loaded.
    pub fn topics(&self) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.into_keys().collect())
    }

    fn load(&self) -> Result<Deck, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Deck::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if raw.trim().is_empty() {
            return Ok(Deck::new());
        }

        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, deck: &Deck) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        deck.serialize(&mut serializer)
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, &buf).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store() -> (TempDir, FlashcardStore) {
        let dir = TempDir::new().unwrap();
        let store = FlashcardStore::new(dir.path().join("flashcards.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_empty_deck() {
        let (_dir, store) = store();
        assert!(store.topics().unwrap().is_empty());
        assert!(store.cards("Toán").unwrap().is_empty());
    }

    #[test]
    fn test_add_preserves_order_within_topic() {
        let (_dir, store) = store();
        store.add("Toán", Flashcard::new("1+1", "2")).unwrap();
        let count = store.add("Toán", Flashcard::new("2+2", "4")).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            store.cards("Toán").unwrap(),
            vec![Flashcard::new("1+1", "2"), Flashcard::new("2+2", "4")]
        );
    }

    #[test]
    fn test_existing_topic_order_survives_rewrite() {
        let (_dir, store) = store();
        fs::write(
            store.path(),
            r#"{"Vật lý": [{"front": "F", "back": "ma"}], "Hóa học": [{"front": "H2O", "back": "Nước"}]}"#,
        )
        .unwrap();

        store.add("Anh văn", Flashcard::new("cat", "mèo")).unwrap();
        store.add("Vật lý", Flashcard::new("v", "s/t")).unwrap();

        assert_eq!(store.topics().unwrap(), vec!["Vật lý", "Hóa học", "Anh văn"]);
        let raw = fs::read_to_string(store.path()).unwrap();
        let positions: Vec<usize> = ["Vật lý", "Hóa học", "Anh văn"]
            .iter()
            .map(|topic| raw.find(topic).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_file_is_utf8_with_four_space_indent() {
        let (_dir, store) = store();
        store.add("Lịch sử", Flashcard::new("Năm 1945", "Độc lập")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("Lịch sử"));
        assert!(raw.contains("\n    \"Lịch sử\": ["));
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let (_dir, store) = store();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.topics(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let (_dir, store) = store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .add("Sinh học", Flashcard::new(format!("q{i}"), "a"))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.cards("Sinh học").unwrap().len(), 8);
    }
}
