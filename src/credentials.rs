//! Durable client-side credential storage.
//!
//! Two named entries survive a restart: the opaque bearer token and a JSON
//! snapshot of the signed-in user. Each entry carries a seven-day expiry;
//! expired or corrupted entries are discarded on read and reported as absent,
//! never as errors. Reads are synchronous so initial auth state can be derived
//! without a network round-trip.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{AUTH_TOKEN_ENTRY, CREDENTIAL_TTL_DAYS, USER_SNAPSHOT_ENTRY};
use crate::models::User;

/// One persisted entry with its expiry stamp.
#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// File-backed store for the bearer token and the user snapshot.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The persisted bearer token, if a live entry exists.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read_entry(AUTH_TOKEN_ENTRY)
    }

    /// Persist the bearer token with a fresh expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    pub fn store_token(&self, token: &str) -> io::Result<()> {
        self.write_entry(AUTH_TOKEN_ENTRY, token)
    }

    /// The persisted user snapshot, if a live, well-formed entry exists.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        let raw = self.read_entry(USER_SNAPSHOT_ENTRY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                // Corrupted snapshot content is treated as absence.
                warn!(error = %e, "Discarding unreadable user snapshot");
                self.discard(USER_SNAPSHOT_ENTRY);
                None
            }
        }
    }

    /// Persist the user snapshot with a fresh expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    pub fn store_user(&self, user: &User) -> io::Result<()> {
        let raw = serde_json::to_string(user).map_err(io::Error::other)?;
        self.write_entry(USER_SNAPSHOT_ENTRY, &raw)
    }

    /// Remove both entries. Used on logout and on a 401 session wipe.
    pub fn clear(&self) {
        self.discard(AUTH_TOKEN_ENTRY);
        self.discard(USER_SNAPSHOT_ENTRY);
    }

    /// Whether a live token entry is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn read_entry(&self, name: &str) -> Option<String> {
        let path = self.entry_path(name);
        let raw = fs::read_to_string(&path).ok()?;
        let entry: Entry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(entry = name, error = %e, "Discarding corrupted credential entry");
                self.discard(name);
                return None;
            }
        };
        if entry.expires_at <= Utc::now() {
            debug!(entry = name, "Credential entry expired");
            self.discard(name);
            return None;
        }
        Some(entry.value)
    }

    fn write_entry(&self, name: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let entry = Entry {
            value: value.to_string(),
            expires_at: Utc::now() + Duration::days(CREDENTIAL_TTL_DAYS),
        };
        let path = self.entry_path(name);
        fs::write(&path, serde_json::to_string(&entry).map_err(io::Error::other)?)?;
        restrict_permissions(&path)?;
        Ok(())
    }

    fn discard(&self, name: &str) {
        let _ = fs::remove_file(self.entry_path(name));
    }
}

/// Credential entries are readable by the owning user only.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
