use std::{fs, path::PathBuf, sync::Mutex};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

use crate::models::{AuthTokens, UserProfile};
use crate::utils;

/// Locally persisted profile: name, city, and the selected interest keys.
/// Loaded eagerly, written back on every mutation; last local write wins.
pub struct ProfileStore {
    path: PathBuf,
    data: Mutex<UserProfile>,
}

impl ProfileStore {
    pub fn load() -> Self {
        Self::at_path(utils::profile_path())
    }

    pub fn at_path(path: PathBuf) -> Self {
        let data = read_json(&path).unwrap_or_else(|err| {
            tracing::warn!("profile store unreadable, starting empty: {err:#}");
            UserProfile::default()
        });
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub fn read(&self) -> UserProfile {
        self.data.lock().expect("profile mutex poisoned").clone()
    }

    pub fn update<F>(&self, transform: F) -> Result<UserProfile>
    where
        F: FnOnce(&mut UserProfile),
    {
        let mut guard = self.data.lock().expect("profile mutex poisoned");
        transform(&mut guard);
        write_json(&self.path, &*guard)?;
        Ok(guard.clone())
    }

    /// Adds the key to the selection if absent, removes it otherwise. The
    /// selection is replaced wholesale and persisted before returning.
    pub fn toggle_interest(&self, key: &str) -> Result<UserProfile> {
        self.update(|profile| {
            if let Some(position) = profile.selected.iter().position(|k| k == key) {
                profile.selected.remove(position);
            } else {
                profile.selected.push(key.to_string());
            }
        })
    }
}

pub struct TokenStore {
    path: PathBuf,
    data: Mutex<AuthTokens>,
}

impl TokenStore {
    pub fn load() -> Self {
        Self::at_path(utils::tokens_path())
    }

    pub fn at_path(path: PathBuf) -> Self {
        let data = read_json(&path).unwrap_or_else(|err| {
            tracing::warn!("token store unreadable, starting empty: {err:#}");
            AuthTokens::default()
        });
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.data
            .lock()
            .expect("token mutex poisoned")
            .access_token
            .clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.data
            .lock()
            .expect("token mutex poisoned")
            .refresh_token
            .clone()
    }

    /// `None` clears the stored token.
    pub fn set_access_token(&self, token: Option<String>) -> Result<()> {
        self.update(|tokens| tokens.access_token = token)
    }

    pub fn set_refresh_token(&self, token: Option<String>) -> Result<()> {
        self.update(|tokens| tokens.refresh_token = token)
    }

    fn update<F>(&self, transform: F) -> Result<()>
    where
        F: FnOnce(&mut AuthTokens),
    {
        let mut guard = self.data.lock().expect("token mutex poisoned");
        transform(&mut guard);
        write_json(&self.path, &*guard)
    }
}

fn read_json<T: DeserializeOwned + Default>(path: &PathBuf) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {path:?}"))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {path:?}"))
}

fn write_json<T: Serialize>(path: &PathBuf, value: &T) -> Result<()> {
    utils::ensure_parent(path);
    let contents = serde_json::to_string_pretty(value).context("failed to serialize store")?;
    fs::write(path, contents).with_context(|| format!("failed to write {path:?}"))
}
