use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use console_logging::console_warn;

use crate::persist::write_secret;

const TOKEN_FILENAME: &str = ".console_token";

/// Single current-token slot for the session.
///
/// The store is injected into every component that issues authenticated
/// calls; callers read the token at call time so a refresh or clear is
/// observed immediately. When rooted at a directory, the token survives
/// restarts via an atomically replaced file.
pub struct TokenStore {
    dir: Option<PathBuf>,
    slot: Mutex<Option<String>>,
}

impl TokenStore {
    /// In-memory store; nothing is persisted.
    pub fn ephemeral() -> Self {
        Self {
            dir: None,
            slot: Mutex::new(None),
        }
    }

    /// Opens the store rooted at `dir`, loading any previously persisted
    /// token. A missing or unreadable file just means no session.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let token = match fs::read_to_string(dir.join(TOKEN_FILENAME)) {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                console_warn!("Failed to read persisted token from {:?}: {}", dir, err);
                None
            }
        };

        Self {
            dir: Some(dir),
            slot: Mutex::new(token),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.slot.lock().expect("lock token slot").clone()
    }

    pub fn set(&self, token: &str) {
        *self.slot.lock().expect("lock token slot") = Some(token.to_string());
        if let Some(dir) = &self.dir {
            if let Err(err) = write_secret(dir, TOKEN_FILENAME, token) {
                console_warn!("Failed to persist token to {:?}: {}", dir, err);
            }
        }
    }

    /// Drops the token; called on logout and whenever a response reports
    /// the token as invalid or expired.
    pub fn clear(&self) {
        *self.slot.lock().expect("lock token slot") = None;
        if let Some(dir) = &self.dir {
            let path = dir.join(TOKEN_FILENAME);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => console_warn!("Failed to remove token file {:?}: {}", path, err),
            }
        }
    }
}
