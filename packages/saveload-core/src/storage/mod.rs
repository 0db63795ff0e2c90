//! File lifecycle for saved artifacts.

pub mod paths;


use std::fs::{self, File};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::SaveLoadError;
use crate::method::SerializationBackend;

use paths::{StoragePaths, StorageRoot};

/// File-level save/load/exists/delete/list operations.
///
/// Owns directory creation and stream lifetimes. Writes go through a
/// temporary file followed by an atomic rename, so a reader opening the
/// final path never observes partial content.
#[derive(Debug)]
pub struct FileStore {
    paths: StoragePaths,
}

impl FileStore {
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Saves `value` under the writable root, creating the directory tree
    /// if absent. The temporary file is removed on every failure path
    /// before the error propagates.
    pub fn save<T: Serialize>(
        &self,
        value: &T,
        backend: &SerializationBackend,
        filename: &str,
        sub_folder: Option<&str>,
        base_folder: Option<&str>,
    ) -> Result<(), SaveLoadError> {
        let dir = self.paths.resolve(sub_folder, base_folder, StorageRoot::Data);
        fs::create_dir_all(&dir)
            .map_err(|e| SaveLoadError::io("Failed to create save directory", e))?;

        let final_path = dir.join(filename);
        let temp_path = dir.join(format!("{}.tmp", filename));

        let mut file = File::create(&temp_path)
            .map_err(|e| SaveLoadError::io("Failed to create temp file", e))?;

        let written = backend
            .save(value, &mut file)
            .and_then(|_| {
                file.sync_all()
                    .map_err(|e| SaveLoadError::io("Failed to sync save file", e))
            });
        drop(file);

        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }

        fs::rename(&temp_path, &final_path)
            .map_err(|e| SaveLoadError::io("Failed to rename save file", e))?;

        tracing::debug!("Saved {}", final_path.display());
        Ok(())
    }

    /// Loads a value from the given root.
    ///
    /// Returns `Ok(None)` when the directory or file does not exist; the
    /// handle is closed on every exit path.
    pub fn load<T: DeserializeOwned>(
        &self,
        backend: &SerializationBackend,
        filename: &str,
        sub_folder: Option<&str>,
        base_folder: Option<&str>,
        root: StorageRoot,
    ) -> Result<Option<T>, SaveLoadError> {
        let path = self.paths.resolve(sub_folder, base_folder, root).join(filename);
        if !path.is_file() {
            return Ok(None);
        }

        let mut file =
            File::open(&path).map_err(|e| SaveLoadError::io("Failed to open save file", e))?;
        let value = backend.load(&mut file)?;

        tracing::debug!("Loaded {}", path.display());
        Ok(Some(value))
    }

    /// Whether a saved file exists under the writable root.
    pub fn exists(&self, filename: &str, sub_folder: Option<&str>, base_folder: Option<&str>) -> bool {
        self.paths
            .resolve(sub_folder, base_folder, StorageRoot::Data)
            .join(filename)
            .is_file()
    }

    /// Lazily enumerates saved files in the resolved directory and all of
    /// its sub-directories, yielding bare file names.
    ///
    /// Re-calling produces a fresh walk over the directory's current state.
    /// A directory that does not exist yields an empty sequence.
    pub fn enumerate_files(
        &self,
        sub_folder: Option<&str>,
        base_folder: Option<&str>,
        extension: Option<&str>,
        root: StorageRoot,
    ) -> impl Iterator<Item = String> {
        let dir = self.paths.resolve(sub_folder, base_folder, root);
        let extension = extension.map(|e| e.trim_start_matches('.').to_string());

        WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(move |entry| match &extension {
                Some(ext) => entry
                    .path()
                    .extension()
                    .map_or(false, |e| e == std::ffi::OsStr::new(ext.as_str())),
                None => true,
            })
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
    }

    /// Collected flavor of [`enumerate_files`](Self::enumerate_files).
    pub fn list_files(
        &self,
        sub_folder: Option<&str>,
        base_folder: Option<&str>,
        extension: Option<&str>,
        root: StorageRoot,
    ) -> Vec<String> {
        self.enumerate_files(sub_folder, base_folder, extension, root)
            .collect()
    }

    /// Deletes a saved file. No-op when the file does not exist.
    pub fn delete(
        &self,
        filename: &str,
        sub_folder: Option<&str>,
        base_folder: Option<&str>,
    ) -> Result<(), SaveLoadError> {
        let path = self
            .paths
            .resolve(sub_folder, base_folder, StorageRoot::Data)
            .join(filename);
        if !path.is_file() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|e| SaveLoadError::io("Failed to delete save file", e))?;
        tracing::debug!("Deleted {}", path.display());
        Ok(())
    }

    /// Recursively removes a directory: files first, then each
    /// sub-directory, then the directory itself.
    ///
    /// Refuses targets outside the writable data root; removals blocked by
    /// the filesystem propagate as I/O errors.
    pub fn delete_directory(&self, path: &Path) -> Result<(), SaveLoadError> {
        if !path.starts_with(self.paths.data_root()) {
            return Err(SaveLoadError::UnsupportedOperation(format!(
                "refusing to remove '{}': outside the writable data root",
                path.display()
            )));
        }
        remove_tree(path)?;
        tracing::debug!("Removed directory {}", path.display());
        Ok(())
    }
}

fn remove_tree(dir: &Path) -> Result<(), SaveLoadError> {
    let entries =
        fs::read_dir(dir).map_err(|e| SaveLoadError::io("Failed to read directory", e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SaveLoadError::io("Failed to read directory entry", e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| SaveLoadError::io("Failed to inspect directory entry", e))?;
        if file_type.is_dir() {
            remove_tree(&entry.path())?;
        } else {
            fs::remove_file(entry.path())
                .map_err(|e| SaveLoadError::io("Failed to delete file", e))?;
        }
    }
    fs::remove_dir(dir).map_err(|e| SaveLoadError::io("Failed to remove directory", e))
}
