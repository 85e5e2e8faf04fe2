//! Type definitions for subsleuth

mod error;
mod profile;
mod subscription;
mod summary;

pub use error::*;
pub use profile::*;
pub use subscription::*;
pub use summary::*;
