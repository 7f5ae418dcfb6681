//! Persistent key-value storage for the high score and the answer log.
//!
//! Values are strings, as in browser local storage. `FileStore` keeps every
//! key in a single JSON object on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::AnsweredRecord;

pub const HIGH_SCORE_KEY: &str = "highScore";
pub const ANSWER_LOG_KEY: &str = "userAnswers";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store at {} is unreadable: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stored value for {key:?} is corrupt: {value:?}")]
    Corrupt { key: String, value: String },
    #[error("store at {} is not a JSON object: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode store contents: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A string key-value capability.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// A scalar high score. Overwrites unconditionally.
pub trait ScoreStore {
    /// Zero when nothing has been stored yet.
    fn high_score(&self) -> Result<u32, StoreError>;
    fn set_high_score(&mut self, score: u32) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> ScoreStore for S {
    fn high_score(&self) -> Result<u32, StoreError> {
        match self.get(HIGH_SCORE_KEY)? {
            None => Ok(0),
            Some(value) => value.trim().parse().map_err(|_| StoreError::Corrupt {
                key: HIGH_SCORE_KEY.to_string(),
                value,
            }),
        }
    }

    fn set_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        self.set(HIGH_SCORE_KEY, score.to_string())
    }
}

/// Replace the stored answer log with `records`.
pub fn save_answer_log<S: KeyValueStore + ?Sized>(
    store: &mut S,
    records: &[AnsweredRecord],
) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(records)?;
    store.set(ANSWER_LOG_KEY, encoded)
}

/// The answer log of the last finished session, empty if none.
pub fn load_answer_log<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Vec<AnsweredRecord>, StoreError> {
    match store.get(ANSWER_LOG_KEY)? {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_str(&value).map_err(|_| StoreError::Corrupt {
            key: ANSWER_LOG_KEY.to_string(),
            value,
        }),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// A JSON object file. Read on open, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(source) => return Err(StoreError::Malformed { path, source }),
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        debug!(path = %path.display(), keys = entries.len(), "store opened");
        Ok(Self { path, entries })
    }

    /// Like [`FileStore::open`], but a file that is not a JSON object is moved
    /// to `<name>.corrupt` and the store starts empty.
    pub fn open_or_reset<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        match Self::open(path) {
            Err(StoreError::Malformed { path, source }) => {
                let aside = set_aside_path(&path);
                warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    error = %source,
                    "store file is damaged, starting with an empty store"
                );
                if let Err(err) = fs::rename(&path, &aside) {
                    warn!(error = %err, "could not move the damaged store aside");
                }
                Ok(Self {
                    path,
                    entries: BTreeMap::new(),
                })
            }
            opened => opened,
        }
    }

    /// `<data dir>/timed-quiz/store.json`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("timed-quiz"))
            .unwrap_or_default()
            .join("store.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, contents).map_err(io_err)
    }
}

fn set_aside_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }
}
