//! Subscription spend tracking: dashboard aggregation, per-user storage,
//! and AI-backed cancellation guides and cheaper-alternative suggestions.

pub mod cli;
pub mod config;
pub mod services;
pub mod types;
