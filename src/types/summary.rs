//! Derived dashboard values and advisor output

use serde::{Deserialize, Serialize};

use super::Subscription;

/// Monthly spend for one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySpend {
    pub name: String,
    pub monthly_cost: f64,
}

/// A breakdown entry with its chart color attached
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSlice {
    pub name: String,
    pub monthly_cost: f64,
    /// Hex color, e.g. "#3b82f6"
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct DashboardSummary {
    pub subscription_count: usize,
    pub total_monthly: f64,
    pub total_yearly: f64,
    /// In first-appearance order of each category
    pub categories: Vec<ChartSlice>,
    pub next_renewal: Option<Subscription>,
}

/// A cheaper service suggested by the advisor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeService {
    pub name: String,
    pub price_description: String,
    pub savings_description: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_link: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Transient, dismissible user notification
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notice {
    pub id: String,
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message: message.into(),
            kind,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }
}
