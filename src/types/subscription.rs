//! Subscription and category records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{Result, SubsleuthError};

/// Categories every user has without creating them
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Streaming",
    "Software",
    "Fitness",
    "Utilities",
    "Gaming",
    "Other",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = SubsleuthError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(SubsleuthError::Parse(format!(
                "unknown billing cycle '{}' (expected monthly or yearly)",
                other
            ))),
        }
    }
}

/// One user's recurring charge. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    /// Amount charged per billing cycle
    pub cost: f64,
    pub billing_cycle: BillingCycle,
    pub category: String,
    pub renewal_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    /// Create a custom category with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

/// Default categories plus one user's custom ones
#[derive(Debug, Clone)]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    pub fn new(custom: &[Category]) -> Self {
        let names = DEFAULT_CATEGORIES
            .iter()
            .map(|s| s.to_string())
            .chain(custom.iter().map(|c| c.name.clone()))
            .collect();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Exact match, as stored on subscriptions
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Check a candidate custom category name; returns the trimmed name.
    ///
    /// Collisions are case-insensitive so "netflix" and "Netflix" can't coexist.
    pub fn check_new(&self, name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SubsleuthError::Validation(
                "category name cannot be empty".into(),
            ));
        }
        if self.names.iter().any(|n| n.eq_ignore_ascii_case(trimmed)) {
            return Err(SubsleuthError::Validation(format!(
                "category '{}' already exists",
                trimmed
            )));
        }
        Ok(trimmed.to_string())
    }
}

/// Unvalidated subscription as entered by the user
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub name: String,
    pub cost: f64,
    pub billing_cycle: BillingCycle,
    pub category: String,
    pub renewal_date: NaiveDate,
}

impl NewSubscription {
    /// Validate against the user's categories and assign an id
    pub fn validate(self, categories: &CategorySet) -> Result<Subscription> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SubsleuthError::Validation("name cannot be empty".into()));
        }
        if !self.cost.is_finite() || self.cost <= 0.0 {
            return Err(SubsleuthError::Validation(format!(
                "cost must be a positive amount, got {}",
                self.cost
            )));
        }
        if !categories.contains(&self.category) {
            return Err(SubsleuthError::Validation(format!(
                "unknown category '{}'",
                self.category
            )));
        }

        Ok(Subscription {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            cost: self.cost,
            billing_cycle: self.billing_cycle,
            category: self.category,
            renewal_date: self.renewal_date,
        })
    }
}

/// Parse a `YYYY-MM-DD` renewal date
pub fn parse_renewal_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| SubsleuthError::Parse(format!("invalid date '{}': {}", s, e)))
}
