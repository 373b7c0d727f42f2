//! Local key-value store.
//!
//! File-backed persistence for the handful of records the storefront keeps
//! on the client side: the current user profile, the accumulated order
//! history, the auth token pair and the language preference. One JSON
//! document per key under the configured data directory.
//!
//! Reads follow a parse-or-default contract: a missing file or malformed
//! JSON yields the default value (logged at warn), never an error. Only
//! writes can fail.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use souk_core::{Lang, OrderRecord, UserProfile};

/// Store keys. One JSON file per key.
pub mod keys {
    /// Current user profile (single record, overwritten in place).
    pub const PROFILE: &str = "profile";

    /// Append-only order history array.
    pub const ORDERS: &str = "orders";

    /// Bearer access token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Bearer refresh token.
    pub const REFRESH_TOKEN: &str = "refresh_token";

    /// Interface language preference.
    pub const LANGUAGE: &str = "language";
}

/// Errors that can occur when writing to the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Cached profile slot: distinguishes "not read yet" from "read, absent".
enum ProfileSlot {
    Unloaded,
    Loaded(Option<UserProfile>),
}

/// The local key-value store.
///
/// Cheaply cloneable; all clones share the same directory, write lock and
/// profile cache. The profile cache is a session-scoped read-through cache
/// over the `profile` key, invalidated explicitly on login, logout and
/// profile updates.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<LocalStoreInner>,
}

struct LocalStoreInner {
    dir: PathBuf,
    // Serializes read-modify-write cycles (order history appends).
    write_lock: Mutex<()>,
    profile_cache: Mutex<ProfileSlot>,
}

impl LocalStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(Self {
            inner: Arc::new(LocalStoreInner {
                dir,
                write_lock: Mutex::new(()),
                profile_cache: Mutex::new(ProfileSlot::Unloaded),
            }),
        })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.inner.dir.join(format!("{key}.json"))
    }

    // =========================================================================
    // Generic key-value access
    // =========================================================================

    /// Read and parse the value stored under `key`.
    ///
    /// Missing files and malformed JSON both yield `None`; the latter is
    /// logged, since it means the file was corrupted on disk.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read store file");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "malformed store file, using default");
                None
            }
        }
    }

    /// Serialize `value` and write it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the write fails.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        fs::write(self.path(key), raw)?;
        Ok(())
    }

    /// Delete the value stored under `key`. Deleting a missing key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the delete fails.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    // =========================================================================
    // User profile (read-through cached)
    // =========================================================================

    /// The current user profile, if one has been saved.
    ///
    /// The first read loads from disk; subsequent reads hit the cache until
    /// it is invalidated by [`save_profile`](Self::save_profile),
    /// [`clear_profile`](Self::clear_profile) or logout.
    pub fn profile(&self) -> Option<UserProfile> {
        let mut slot = self
            .inner
            .profile_cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if let ProfileSlot::Loaded(profile) = &*slot {
            return profile.clone();
        }

        let profile: Option<UserProfile> = self.get(keys::PROFILE);
        *slot = ProfileSlot::Loaded(profile.clone());
        profile
    }

    /// Save (create or overwrite) the user profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.set(keys::PROFILE, profile)?;
        let mut slot = self
            .inner
            .profile_cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = ProfileSlot::Loaded(Some(profile.clone()));
        Ok(())
    }

    /// Delete the user profile and invalidate the cache.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the delete fails.
    pub fn clear_profile(&self) -> Result<(), StoreError> {
        self.remove(keys::PROFILE)?;
        let mut slot = self
            .inner
            .profile_cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = ProfileSlot::Loaded(None);
        Ok(())
    }

    // =========================================================================
    // Order history
    // =========================================================================

    /// The full persisted order history, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<OrderRecord> {
        self.get(keys::ORDERS).unwrap_or_default()
    }

    /// Append records to the order history.
    ///
    /// The read-modify-write cycle runs under an internal lock, so
    /// concurrent in-process submissions cannot lose each other's records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn append_orders(&self, records: &[OrderRecord]) -> Result<(), StoreError> {
        let _guard = self
            .inner
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut history = self.orders();
        history.extend_from_slice(records);
        self.set(keys::ORDERS, &history)
    }

    // =========================================================================
    // Auth tokens (persisted independently)
    // =========================================================================

    /// The stored bearer access token.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.get(keys::ACCESS_TOKEN)
    }

    /// Persist the access token.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn set_access_token(&self, token: &str) -> Result<(), StoreError> {
        self.set(keys::ACCESS_TOKEN, &token)
    }

    /// The stored bearer refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.get(keys::REFRESH_TOKEN)
    }

    /// Persist the refresh token.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn set_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        self.set(keys::REFRESH_TOKEN, &token)
    }

    /// Delete both tokens. Part of logout and forced logout.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if a delete fails.
    pub fn clear_tokens(&self) -> Result<(), StoreError> {
        self.remove(keys::ACCESS_TOKEN)?;
        self.remove(keys::REFRESH_TOKEN)
    }

    // =========================================================================
    // Language preference
    // =========================================================================

    /// The persisted interface language, if any.
    #[must_use]
    pub fn language(&self) -> Option<Lang> {
        self.get(keys::LANGUAGE)
    }

    /// Persist the interface language.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn set_language(&self, lang: Lang) -> Result<(), StoreError> {
        self.set(keys::LANGUAGE, &lang)
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("dir", &self.inner.dir)
            .finish_non_exhaustive()
    }
}
