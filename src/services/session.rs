//! Local sign-in session
//!
//! `<data_dir>/session.json` holds the signed-in user, and
//! `<data_dir>/accounts.json` maps emails to stable user ids so signing in
//! again with the same email reaches the same records. `accounts.lock`
//! serializes concurrent sign-ins.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::info;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Result, SubsleuthError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

pub struct SessionService {
    data_dir: PathBuf,
}

impl SessionService {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    fn accounts_path(&self) -> PathBuf {
        self.data_dir.join("accounts.json")
    }

    /// Current session, if signed in. An unreadable session file counts as signed out.
    pub fn current(&self) -> Option<Session> {
        let content = fs::read_to_string(self.session_path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Current session or an auth error
    pub fn require(&self) -> Result<Session> {
        self.current().ok_or_else(|| {
            SubsleuthError::Auth("Not signed in. Run `subsleuth login <email>` first.".into())
        })
    }

    pub fn sign_in(&self, email: &str) -> Result<Session> {
        let email = normalize_email(email)?;
        fs::create_dir_all(&self.data_dir)?;

        let user_id = self.user_id_for(&email)?;

        let session = Session {
            user_id,
            email,
            signed_in_at: Utc::now(),
        };
        write_json(&self.session_path(), &session)?;
        info!("signed in as {}", session.email);
        Ok(session)
    }

    /// Idempotent
    pub fn sign_out(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path)?;
            info!("signed out");
        }
        Ok(())
    }

    /// Look up or allocate the id for `email` under the accounts lock
    fn user_id_for(&self, email: &str) -> Result<String> {
        let lock = self.open_lock()?;
        lock.lock_exclusive()
            .map_err(|e| SubsleuthError::Store(format!("Failed to lock accounts: {}", e)))?;

        let result = self.load_accounts().and_then(|mut accounts| {
            if let Some(id) = accounts.get(email) {
                return Ok(id.clone());
            }
            let id = Uuid::new_v4().to_string();
            accounts.insert(email.to_string(), id.clone());
            write_json(&self.accounts_path(), &accounts)?;
            Ok(id)
        });

        let _ = lock.unlock();
        result
    }

    fn open_lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.data_dir.join("accounts.lock"))?;
        Ok(file)
    }

    fn load_accounts(&self) -> Result<HashMap<String, String>> {
        let path = self.accounts_path();
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| SubsleuthError::Parse(format!("Invalid accounts file: {}", e)))
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex");
    let email = email.trim().to_lowercase();
    if re.is_match(&email) {
        Ok(email)
    } else {
        Err(SubsleuthError::Auth(format!("'{}' is not a valid email", email)))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| SubsleuthError::Parse(format!("Serialization failed: {}", e)))?;
    fs::write(path, content)?;
    Ok(())
}
