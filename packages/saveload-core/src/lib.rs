//! Persistence engine for structured objects.
//!
//! Provides pluggable serialization methods, transparent password-based
//! encryption, storage path resolution across a writable data root and a
//! read-only bundle root, and the save-file lifecycle.

pub mod config;
pub mod crypto;
pub mod error;
pub mod manager;
pub mod method;
pub mod storage;

pub use config::SaveLoadConfig;
pub use error::SaveLoadError;
pub use manager::{JsonCarrier, SaveLoadManager};
pub use method::{CustomFormat, SerializationMethod};
