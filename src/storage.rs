//! Session persistence: the whole document is loaded and saved as one JSON file.

use crate::models::Session;
use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors reading or writing the session file.
#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "Storage I/O error: {}", e),
            StorageError::Json(e) => write!(f, "Malformed session data: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Json(e)
    }
}

/// Why a saved change did not go through.
#[derive(Debug)]
pub enum CommitError<E> {
    /// The change itself was refused; nothing was written.
    Rejected(E),
    /// The change was applied in memory but could not be written.
    Unsaved(StorageError),
}

impl<E: std::fmt::Display> std::fmt::Display for CommitError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitError::Rejected(e) => write!(f, "{}", e),
            CommitError::Unsaved(e) => write!(f, "Change applied but not saved: {}", e),
        }
    }
}

impl<E: std::fmt::Debug + std::fmt::Display> std::error::Error for CommitError<E> {}

/// Parse a saved session, backfilling missing fields and normalizing legacy values.
pub fn parse_session(json: &str) -> Result<Session, StorageError> {
    let mut session: Session = serde_json::from_str(json)?;
    session.normalize();
    Ok(session)
}

/// JSON file store. Single writer, last write wins.
#[derive(Clone, Debug)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved session; `Ok(None)` when nothing has been saved yet.
    pub fn try_load(&self) -> Result<Option<Session>, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        parse_session(&json).map(Some)
    }

    /// Load the saved session, or start fresh if it is missing or unreadable.
    /// A file that is not a session document is moved aside first.
    pub fn load(&self) -> Session {
        match self.try_load() {
            Ok(Some(session)) => {
                log::info!(
                    "Loaded {} player(s) and {} round(s) from {}",
                    session.players.len(),
                    session.rounds.len(),
                    self.path.display()
                );
                session
            }
            Ok(None) => {
                log::info!("No saved session at {}, starting fresh", self.path.display());
                Session::new()
            }
            Err(StorageError::Json(e)) => {
                match self.backup_unreadable() {
                    Ok(backup) => log::warn!(
                        "Could not parse {}: {}; moved it to {} and starting fresh",
                        self.path.display(),
                        e,
                        backup.display()
                    ),
                    Err(io) => log::error!(
                        "Could not parse {}: {}; backup failed ({}), starting fresh",
                        self.path.display(),
                        e,
                        io
                    ),
                }
                Session::new()
            }
            Err(e) => {
                log::warn!("Could not load {}: {}; starting fresh", self.path.display(), e);
                Session::new()
            }
        }
    }

    /// Move an unreadable session file aside so the next save cannot overwrite it.
    pub fn backup_unreadable(&self) -> io::Result<PathBuf> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".unreadable-{}", stamp));
        let backup = PathBuf::from(name);
        fs::rename(&self.path, &backup)?;
        Ok(backup)
    }

    /// Apply `f` to `session`, then save the whole document. Nothing is written
    /// when `f` fails.
    pub fn commit<T, E, F>(&self, session: &mut Session, f: F) -> Result<T, CommitError<E>>
    where
        F: FnOnce(&mut Session) -> Result<T, E>,
    {
        let value = f(session).map_err(CommitError::Rejected)?;
        if let Err(e) = self.save(session) {
            log::error!("Failed to save {}: {}", self.path.display(), e);
            return Err(CommitError::Unsaved(e));
        }
        Ok(value)
    }

    /// Write the whole session via a temporary file renamed over the old one.
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
