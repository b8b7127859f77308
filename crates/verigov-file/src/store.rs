//! Filesystem storage for the session token pair.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use verigov_core::Result;
use verigov_core::error::{Error, StorageError};
use verigov_core::{CredentialPair, TokenStore};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

fn map_io(path: &Path) -> impl Fn(io::Error) -> Error + '_ {
    move |err| {
        Error::Storage(StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }
}

/// On-disk session format.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
    refresh_token: String,
    saved_at: DateTime<Utc>,
}

/// A [`TokenStore`] persisted as a JSON file.
///
/// The file is read once when the store is opened; reads are then served
/// from memory. Writes go to a temporary sibling file that is renamed over
/// the session file while an exclusive advisory lock is held, so another
/// process never reads a half-written pair.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cache: RwLock<Option<CredentialPair>>,
}

impl FileTokenStore {
    /// Open the store at `path`, loading any session already saved there.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file exists but cannot be read or
    /// parsed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tokens = Self::load(&path)?;

        debug!(found = tokens.is_some(), "Opened token store");

        Ok(Self {
            path,
            cache: RwLock::new(tokens),
        })
    }

    /// Returns the session file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    fn load(path: &Path) -> Result<Option<CredentialPair>> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(map_io(path)(err)),
        };

        let stored: StoredSession = serde_json::from_str(&json).map_err(|e| {
            Error::Storage(StorageError::Format {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;

        Ok(Some(CredentialPair::new(
            stored.access_token,
            stored.refresh_token,
        )))
    }

    /// Take the cross-process lock. Released when the returned file is dropped.
    fn lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(map_io(parent))?;
        }

        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(map_io(&lock_path))?;

        FileExt::lock_exclusive(&lock_file).map_err(map_io(&lock_path))?;
        Ok(lock_file)
    }

    fn write_file(&self, tokens: &CredentialPair) -> Result<()> {
        let stored = StoredSession {
            access_token: tokens.access_token.as_str().to_string(),
            refresh_token: tokens.refresh_token.as_str().to_string(),
            saved_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&stored).map_err(|e| {
            Error::Storage(StorageError::Format {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
        })?;

        let temp_path = self.temp_path();
        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&temp_path).map_err(map_io(&temp_path))?;
        file.write_all(json.as_bytes())
            .map_err(map_io(&temp_path))?;
        file.sync_data().map_err(map_io(&temp_path))?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(map_io(&self.path))?;
        Ok(())
    }

    fn remove_file(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(map_io(&self.path)(err)),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn tokens(&self) -> Option<CredentialPair> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn set_tokens(&self, tokens: CredentialPair) -> Result<()> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let lock = self.lock()?;

        self.write_file(&tokens)?;
        *cache = Some(tokens);

        if let Err(e) = FileExt::unlock(&lock) {
            warn!(error = %e, "Failed to release token store lock");
        }

        debug!("Saved session tokens");
        Ok(())
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn clear_tokens(&self) -> Result<()> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let lock = self.lock()?;

        self.remove_file()?;
        *cache = None;

        if let Err(e) = FileExt::unlock(&lock) {
            warn!(error = %e, "Failed to release token store lock");
        }

        debug!("Cleared session tokens");
        Ok(())
    }
}
