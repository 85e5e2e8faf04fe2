//! Account profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display details kept alongside a user's records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Stamped with the current time
    pub fn new(full_name: &str) -> Self {
        Self {
            full_name: full_name.trim().to_string(),
            updated_at: Utc::now(),
        }
    }
}
