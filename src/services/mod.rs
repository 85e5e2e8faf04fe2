//! Services for aggregation, storage and text generation

pub mod advisor;
pub mod aggregator;
pub mod currency;
pub mod gemini;
pub mod ledger;
pub mod session;
pub mod store;

pub use advisor::Advisor;
pub use aggregator::Aggregator;
pub use currency::Currency;
pub use gemini::{GeminiClient, TextGenerator};
pub use ledger::SubscriptionLedger;
pub use session::SessionService;
pub use store::{JsonFileStore, SubscriptionStore};
