//! Storage path resolution.

use std::path::{Path, PathBuf};

/// Sub-folder used when a save call does not name one.
pub const DEFAULT_SUB_FOLDER: &str = "saveload";

/// Base folder used when a save call does not name one.
pub const DEFAULT_BASE_FOLDER: &str = "data";

/// Which base location a path resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageRoot {
    /// Writable machine-local data location
    Data,
    /// Read-only assets shipped with the application; load-only
    Bundle,
}

/// Resolves `(base folder, sub folder, root)` tuples to directories.
///
/// Layout is `<root>/<base folder>/<sub folder>/`. Resolution is a plain
/// join with no normalization of `..` or separators; folder names are
/// trusted caller input, not untrusted user input.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    data_root: PathBuf,
    bundle_root: PathBuf,
}

impl StoragePaths {
    pub fn new(data_root: PathBuf, bundle_root: PathBuf) -> Self {
        Self {
            data_root,
            bundle_root,
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn bundle_root(&self) -> &Path {
        &self.bundle_root
    }

    /// Resolves the directory for a folder pair under the given root.
    ///
    /// Missing or empty folder names fall back to the fixed defaults.
    pub fn resolve(
        &self,
        sub_folder: Option<&str>,
        base_folder: Option<&str>,
        root: StorageRoot,
    ) -> PathBuf {
        let base = named_or(base_folder, DEFAULT_BASE_FOLDER);
        let sub = named_or(sub_folder, DEFAULT_SUB_FOLDER);
        let root = match root {
            StorageRoot::Data => &self.data_root,
            StorageRoot::Bundle => &self.bundle_root,
        };
        root.join(base).join(sub)
    }
}

fn named_or<'a>(name: Option<&'a str>, default: &'a str) -> &'a str {
    match name {
        Some(name) if !name.is_empty() => name,
        _ => default,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn paths() -> StoragePaths {
        StoragePaths::new(PathBuf::from("/tmp/data"), PathBuf::from("/tmp/bundle"))
    }

    #[test]
    fn resolves_explicit_folders() {
        let resolved = paths().resolve(Some("saves"), Some("game"), StorageRoot::Data);
        assert_eq!(resolved, PathBuf::from("/tmp/data/game/saves"));
    }

    #[test]
    fn empty_names_fall_back_to_defaults() {
        let resolved = paths().resolve(Some(""), None, StorageRoot::Data);
        assert_eq!(
            resolved,
            PathBuf::from("/tmp/data")
                .join(DEFAULT_BASE_FOLDER)
                .join(DEFAULT_SUB_FOLDER)
        );
    }

    #[test]
    fn bundle_root_switches_base_location() {
        let resolved = paths().resolve(Some("saves"), Some("game"), StorageRoot::Bundle);
        assert_eq!(resolved, PathBuf::from("/tmp/bundle/game/saves"));
    }
}
