//! Per-user subscription and category storage
//!
//! Each user's records live in one JSON document,
//! `<data_dir>/users/<user_id>.json`. A sibling `.lock` file serializes
//! concurrent CLI invocations: shared for reads, exclusive for
//! read-modify-write.

use crate::types::{Category, CategorySet, Profile, Result, Subscription, SubsleuthError};
use fs2::FileExt;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Persistence collaborator. Failures are returned, never swallowed.
pub trait SubscriptionStore {
    fn list_subscriptions(&self, user_id: &str) -> Result<Vec<Subscription>>;
    fn create_subscription(&self, user_id: &str, sub: &Subscription) -> Result<()>;
    fn delete_subscription(&self, user_id: &str, id: &str) -> Result<()>;

    fn list_categories(&self, user_id: &str) -> Result<Vec<Category>>;
    fn create_category(&self, user_id: &str, category: &Category) -> Result<()>;
    fn delete_category(&self, user_id: &str, id: &str) -> Result<()>;

    /// `None` until the user saves one
    fn get_profile(&self, user_id: &str) -> Result<Option<Profile>>;
    /// Insert or replace
    fn save_profile(&self, user_id: &str, profile: &Profile) -> Result<()>;
}

/// On-disk document for one user
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

pub struct JsonFileStore {
    users_dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `<data_dir>/users`
    pub fn new(data_dir: &Path) -> Self {
        Self {
            users_dir: data_dir.join("users"),
        }
    }

    pub fn user_path(&self, user_id: &str) -> Result<PathBuf> {
        validate_user_id(user_id)?;
        Ok(self.users_dir.join(format!("{}.json", user_id)))
    }

    fn lock_path(&self, user_id: &str) -> PathBuf {
        self.users_dir.join(format!("{}.lock", user_id))
    }

    fn open_lock(&self, user_id: &str) -> Result<File> {
        fs::create_dir_all(&self.users_dir)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path(user_id))?;
        Ok(file)
    }

    fn load(&self, user_id: &str) -> Result<UserData> {
        let path = self.user_path(user_id)?;
        let lock = self.open_lock(user_id)?;
        lock.lock_shared()
            .map_err(|e| SubsleuthError::Store(format!("Failed to acquire read lock: {}", e)))?;

        let data = read_user_data(&path);
        let _ = lock.unlock();
        data
    }

    /// Read, apply `f`, and write back under one exclusive lock
    fn update<T, F>(&self, user_id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut UserData) -> Result<T>,
    {
        let path = self.user_path(user_id)?;
        let lock = self.open_lock(user_id)?;
        lock.lock_exclusive()
            .map_err(|e| SubsleuthError::Store(format!("Failed to acquire write lock: {}", e)))?;

        let result = read_user_data(&path).and_then(|mut data| {
            let value = f(&mut data)?;
            write_user_data(&path, &data)?;
            Ok(value)
        });

        let _ = lock.unlock();
        result
    }
}

impl SubscriptionStore for JsonFileStore {
    fn list_subscriptions(&self, user_id: &str) -> Result<Vec<Subscription>> {
        Ok(self.load(user_id)?.subscriptions)
    }

    fn create_subscription(&self, user_id: &str, sub: &Subscription) -> Result<()> {
        self.update(user_id, |data| {
            if data.subscriptions.iter().any(|s| s.id == sub.id) {
                return Err(SubsleuthError::Store(format!(
                    "subscription {} already exists",
                    sub.id
                )));
            }
            data.subscriptions.push(sub.clone());
            Ok(())
        })?;
        debug!("stored subscription {} for user {}", sub.id, user_id);
        Ok(())
    }

    fn delete_subscription(&self, user_id: &str, id: &str) -> Result<()> {
        self.update(user_id, |data| {
            let before = data.subscriptions.len();
            data.subscriptions.retain(|s| s.id != id);
            if data.subscriptions.len() == before {
                return Err(SubsleuthError::NotFound(format!("subscription {}", id)));
            }
            Ok(())
        })?;
        debug!("deleted subscription {} for user {}", id, user_id);
        Ok(())
    }

    fn list_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        Ok(self.load(user_id)?.categories)
    }

    fn create_category(&self, user_id: &str, category: &Category) -> Result<()> {
        let name = self.update(user_id, |data| {
            let name = CategorySet::new(&data.categories).check_new(&category.name)?;
            data.categories.push(Category {
                id: category.id.clone(),
                name: name.clone(),
            });
            Ok(name)
        })?;
        debug!("stored category '{}' for user {}", name, user_id);
        Ok(())
    }

    fn delete_category(&self, user_id: &str, id: &str) -> Result<()> {
        self.update(user_id, |data| {
            let before = data.categories.len();
            data.categories.retain(|c| c.id != id);
            if data.categories.len() == before {
                return Err(SubsleuthError::NotFound(format!("category {}", id)));
            }
            Ok(())
        })
    }

    fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        Ok(self.load(user_id)?.profile)
    }

    fn save_profile(&self, user_id: &str, profile: &Profile) -> Result<()> {
        self.update(user_id, |data| {
            data.profile = Some(profile.clone());
            Ok(())
        })?;
        debug!("saved profile for user {}", user_id);
        Ok(())
    }
}

/// Missing file means a user with no records yet
fn read_user_data(path: &Path) -> Result<UserData> {
    if !path.exists() {
        return Ok(UserData::default());
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        SubsleuthError::Store(format!("Corrupted store file {}: {}", path.display(), e))
    })
}

/// Atomic write (temp file + rename); caller holds the exclusive lock
fn write_user_data(path: &Path, data: &UserData) -> Result<()> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| SubsleuthError::Store(format!("Serialization failed: {}", e)))?;
    let temp_path = path.with_extension("json.tmp");

    {
        let mut file = File::create(&temp_path)
            .map_err(|e| SubsleuthError::Store(format!("Failed to create temp file: {}", e)))?;
        file.write_all(content.as_bytes())
            .map_err(|e| SubsleuthError::Store(format!("Failed to write temp file: {}", e)))?;
        file.sync_all()
            .map_err(|e| SubsleuthError::Store(format!("Failed to sync temp file: {}", e)))?;
    }

    fs::rename(&temp_path, path)
        .map_err(|e| SubsleuthError::Store(format!("Failed to rename temp file: {}", e)))?;
    Ok(())
}

fn validate_user_id(user_id: &str) -> Result<()> {
    let ok = !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(SubsleuthError::Store(format!("invalid user id '{}'", user_id)))
    }
}
