//! Per-manager method cache.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::crypto::Credentials;
use crate::error::SaveLoadError;

use super::{CustomFormat, SerializationBackend, SerializationMethod};

/// Lazily-populated map from method identifier to constructed backend.
///
/// One instance per identifier per registry; a cached backend is never
/// reconstructed. The registry is owned by its manager and mutated through
/// `&mut`, so concurrent population is a caller concern by construction.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    methods: HashMap<SerializationMethod, SerializationBackend>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Returns the backend for `method`, constructing it on first use.
    ///
    /// Encrypted methods are built from `key` and `salt`, which are
    /// validated at that point. Requesting `Custom` before
    /// [`register_custom`](Self::register_custom) fails with
    /// [`SaveLoadError::MissingCustomFormat`].
    pub fn get(
        &mut self,
        method: SerializationMethod,
        key: &str,
        salt: &str,
    ) -> Result<&SerializationBackend, SaveLoadError> {
        match self.methods.entry(method) {
            Entry::Occupied(cached) => Ok(cached.into_mut()),
            Entry::Vacant(slot) => {
                let backend = match method {
                    SerializationMethod::Binary => SerializationBackend::Binary,
                    SerializationMethod::Text => SerializationBackend::Text,
                    SerializationMethod::BinaryEncrypted => {
                        SerializationBackend::BinaryEncrypted(Credentials::new(key, salt)?)
                    }
                    SerializationMethod::TextEncrypted => {
                        SerializationBackend::TextEncrypted(Credentials::new(key, salt)?)
                    }
                    SerializationMethod::Custom => return Err(SaveLoadError::MissingCustomFormat),
                };
                Ok(slot.insert(backend))
            }
        }
    }

    /// Installs a custom format, replacing any previous registration.
    pub fn register_custom(&mut self, format: Box<dyn CustomFormat>) {
        self.methods.insert(
            SerializationMethod::Custom,
            SerializationBackend::Custom(format),
        );
    }
}
