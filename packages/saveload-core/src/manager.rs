//! Save/load manager façade.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::SaveLoadConfig;
use crate::error::SaveLoadError;
use crate::method::registry::MethodRegistry;
use crate::method::{CustomFormat, SerializationMethod};
use crate::storage::paths::{StoragePaths, StorageRoot};
use crate::storage::FileStore;

/// Carrier for a pre-serialized JSON payload.
///
/// Host-side integrations that serialize objects the structural methods
/// cannot traverse wrap the resulting JSON string in this record and push
/// it through the normal save pipeline. The core treats it like any other
/// plain value; unwrapping is the host side's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCarrier {
    pub json_data: String,
}

/// Manager for saving and loading values to and from disk.
///
/// Binds a default serialization method, default folders and encryption
/// credentials at construction. Every operation uses the bound defaults
/// unless an explicit folder or method is supplied for that call.
///
/// Methods taking `&mut self` may populate the method cache on first use;
/// the manager is single-threaded by contract and provides no internal
/// locking.
#[derive(Debug)]
pub struct SaveLoadManager {
    method: SerializationMethod,
    base_folder: String,
    default_folder: String,
    key: String,
    salt: String,
    store: FileStore,
    methods: MethodRegistry,
}

impl SaveLoadManager {
    pub fn new(config: SaveLoadConfig) -> Self {
        let SaveLoadConfig {
            data_root,
            bundle_root,
            base_folder,
            default_folder,
            method,
            key,
            salt,
        } = config;
        Self {
            method,
            base_folder,
            default_folder,
            key,
            salt,
            store: FileStore::new(StoragePaths::new(data_root, bundle_root)),
            methods: MethodRegistry::new(),
        }
    }

    /// Saves a value with the bound method.
    pub fn save<T: Serialize>(
        &mut self,
        value: &T,
        filename: &str,
        folder: Option<&str>,
    ) -> Result<(), SaveLoadError> {
        self.save_with_method(self.method, value, filename, folder)
    }

    /// Saves a value with an explicit method for this call.
    pub fn save_with_method<T: Serialize>(
        &mut self,
        method: SerializationMethod,
        value: &T,
        filename: &str,
        folder: Option<&str>,
    ) -> Result<(), SaveLoadError> {
        let backend = self.methods.get(method, &self.key, &self.salt)?;
        let sub = sub_folder(folder, &self.default_folder);
        self.store
            .save(value, backend, filename, Some(sub), Some(&self.base_folder))
    }

    /// Loads a value with the bound method.
    ///
    /// Returns `Ok(None)` when the file was never saved.
    pub fn load<T: DeserializeOwned>(
        &mut self,
        filename: &str,
        folder: Option<&str>,
    ) -> Result<Option<T>, SaveLoadError> {
        self.load_with_method(self.method, filename, folder)
    }

    /// Loads a value with an explicit method for this call.
    pub fn load_with_method<T: DeserializeOwned>(
        &mut self,
        method: SerializationMethod,
        filename: &str,
        folder: Option<&str>,
    ) -> Result<Option<T>, SaveLoadError> {
        let backend = self.methods.get(method, &self.key, &self.salt)?;
        let sub = sub_folder(folder, &self.default_folder);
        self.store.load(
            backend,
            filename,
            Some(sub),
            Some(&self.base_folder),
            StorageRoot::Data,
        )
    }

    /// Loads a read-only asset shipped with the application.
    pub fn load_bundled<T: DeserializeOwned>(
        &mut self,
        filename: &str,
        folder: Option<&str>,
    ) -> Result<Option<T>, SaveLoadError> {
        let backend = self.methods.get(self.method, &self.key, &self.salt)?;
        let sub = sub_folder(folder, &self.default_folder);
        self.store.load(
            backend,
            filename,
            Some(sub),
            Some(&self.base_folder),
            StorageRoot::Bundle,
        )
    }

    /// Deep-copies a value by round-tripping it through the bound method.
    pub fn copy<T>(&mut self, value: &T) -> Result<T, SaveLoadError>
    where
        T: Serialize + DeserializeOwned,
    {
        let backend = self.methods.get(self.method, &self.key, &self.salt)?;
        backend.copy(value)
    }

    /// Deletes a saved file. No-op when it does not exist.
    pub fn delete(&self, filename: &str, folder: Option<&str>) -> Result<(), SaveLoadError> {
        let sub = sub_folder(folder, &self.default_folder);
        self.store.delete(filename, Some(sub), Some(&self.base_folder))
    }

    /// Removes a save folder and everything in it. No-op when the folder
    /// was never created.
    pub fn delete_all(&self, folder: Option<&str>) -> Result<(), SaveLoadError> {
        let sub = sub_folder(folder, &self.default_folder);
        let dir = self
            .store
            .paths()
            .resolve(Some(sub), Some(&self.base_folder), StorageRoot::Data);
        if !dir.exists() {
            return Ok(());
        }
        self.store.delete_directory(&dir)
    }

    /// Whether a saved file exists.
    pub fn exists(&self, filename: &str, folder: Option<&str>) -> bool {
        let sub = sub_folder(folder, &self.default_folder);
        self.store.exists(filename, Some(sub), Some(&self.base_folder))
    }

    /// Lists saved files by bare name, recursively, optionally filtered by
    /// extension.
    pub fn list_files(&self, folder: Option<&str>, extension: Option<&str>) -> Vec<String> {
        let sub = sub_folder(folder, &self.default_folder);
        self.store.list_files(
            Some(sub),
            Some(&self.base_folder),
            extension,
            StorageRoot::Data,
        )
    }

    /// Lists read-only bundled assets by bare name.
    pub fn list_bundled_files(&self, folder: Option<&str>, extension: Option<&str>) -> Vec<String> {
        let sub = sub_folder(folder, &self.default_folder);
        self.store.list_files(
            Some(sub),
            Some(&self.base_folder),
            extension,
            StorageRoot::Bundle,
        )
    }

    /// Installs a custom serialization format under
    /// [`SerializationMethod::Custom`], replacing any previous one.
    pub fn set_custom_format(&mut self, format: Box<dyn CustomFormat>) {
        self.methods.register_custom(format);
    }

    /// The method bound at construction.
    pub fn method(&self) -> SerializationMethod {
        self.method
    }

    /// True when the bound method encrypts file contents.
    pub fn is_encrypted(&self) -> bool {
        self.method.is_encrypted()
    }

    /// Whether both key and salt are configured.
    pub fn has_credentials(&self) -> bool {
        !self.key.is_empty() && !self.salt.is_empty()
    }

    /// The directory files are saved to when no folder is given.
    pub fn default_save_path(&self) -> PathBuf {
        self.store.paths().resolve(
            Some(&self.default_folder),
            Some(&self.base_folder),
            StorageRoot::Data,
        )
    }

    pub fn base_folder(&self) -> &str {
        &self.base_folder
    }

    pub fn default_folder(&self) -> &str {
        &self.default_folder
    }
}

impl Default for SaveLoadManager {
    fn default() -> Self {
        Self::new(SaveLoadConfig::default())
    }
}

fn sub_folder<'a>(folder: Option<&'a str>, default: &'a str) -> &'a str {
    match folder {
        Some(folder) if !folder.is_empty() => folder,
        _ => default,
    }
}
