//! Manager configuration.

use std::env;
use std::path::PathBuf;

use crate::method::SerializationMethod;
use crate::storage::paths::{DEFAULT_BASE_FOLDER, DEFAULT_SUB_FOLDER};

/// Save/load manager configuration.
///
/// `key` and `salt` may stay empty unless an encrypted method is used;
/// they are validated when the encrypted method is first constructed.
#[derive(Debug, Clone)]
pub struct SaveLoadConfig {
    /// Writable root for saved files
    pub data_root: PathBuf,
    /// Read-only root for assets shipped with the application
    pub bundle_root: PathBuf,
    /// Base folder under the root
    pub base_folder: String,
    /// Default sub-folder for files saved without an explicit folder
    pub default_folder: String,
    /// Serialization method bound to the manager
    pub method: SerializationMethod,
    /// Encryption key for encrypted methods
    pub key: String,
    /// Encryption salt for encrypted methods
    pub salt: String,
}

impl Default for SaveLoadConfig {
    fn default() -> Self {
        Self {
            data_root: dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")),
            bundle_root: default_bundle_root(),
            base_folder: DEFAULT_BASE_FOLDER.to_string(),
            default_folder: DEFAULT_SUB_FOLDER.to_string(),
            method: SerializationMethod::default(),
            key: String::new(),
            salt: String::new(),
        }
    }
}

/// Assets directory next to the running executable.
fn default_bundle_root() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
        .unwrap_or_else(|| PathBuf::from("./assets"))
}
