//! Serialization methods: identifiers, backends, custom formats.

mod binary;
pub mod registry;
mod text;


use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::crypto::{self, Credentials};
use crate::error::SaveLoadError;

/// Identifier for a serialization method.
///
/// Each tag except `Custom` maps to exactly one built-in backend. `Custom`
/// has no built-in backend and must be registered before use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SerializationMethod {
    /// Compact binary encoding
    Binary,
    /// Human-readable structured text
    #[default]
    Text,
    /// Binary encoding, encrypted on disk
    BinaryEncrypted,
    /// Structured text, encrypted on disk
    TextEncrypted,
    /// Externally registered format
    Custom,
}

impl SerializationMethod {
    /// True for the methods that encrypt file contents.
    pub fn is_encrypted(self) -> bool {
        matches!(
            self,
            SerializationMethod::BinaryEncrypted | SerializationMethod::TextEncrypted
        )
    }
}

impl fmt::Display for SerializationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SerializationMethod::Binary => "binary",
            SerializationMethod::Text => "text",
            SerializationMethod::BinaryEncrypted => "binary-encrypted",
            SerializationMethod::TextEncrypted => "text-encrypted",
            SerializationMethod::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl FromStr for SerializationMethod {
    type Err = SaveLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(SerializationMethod::Binary),
            "text" => Ok(SerializationMethod::Text),
            "binary-encrypted" => Ok(SerializationMethod::BinaryEncrypted),
            "text-encrypted" => Ok(SerializationMethod::TextEncrypted),
            "custom" => Ok(SerializationMethod::Custom),
            other => Err(SaveLoadError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Externally supplied format, installed under [`SerializationMethod::Custom`].
///
/// Implementations convert between a self-describing value tree and their
/// own wire bytes. The value tree is `serde_json::Value`, which keeps the
/// trait object-safe while the built-in backends stay fully generic.
pub trait CustomFormat: Send + Sync {
    /// Encode a value tree into wire bytes.
    fn encode(&self, value: &serde_json::Value) -> Result<Vec<u8>, SaveLoadError>;

    /// Decode wire bytes back into a value tree.
    fn decode(&self, bytes: &[u8]) -> Result<serde_json::Value, SaveLoadError>;

    /// Format name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// A constructed serialization backend.
///
/// Plain variants are stateless; encrypted variants carry credentials
/// validated at construction. All variants share one contract:
/// [`save`](Self::save), [`load`](Self::load) and a deep
/// [`copy`](Self::copy) that round-trips through the backend's own
/// encode/decode.
pub enum SerializationBackend {
    Binary,
    Text,
    BinaryEncrypted(Credentials),
    TextEncrypted(Credentials),
    Custom(Box<dyn CustomFormat>),
}

impl fmt::Debug for SerializationBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationBackend::Binary => f.write_str("Binary"),
            SerializationBackend::Text => f.write_str("Text"),
            SerializationBackend::BinaryEncrypted(_) => f.write_str("BinaryEncrypted"),
            SerializationBackend::TextEncrypted(_) => f.write_str("TextEncrypted"),
            SerializationBackend::Custom(format) => write!(f, "Custom({})", format.name()),
        }
    }
}

impl SerializationBackend {
    /// Encodes `value` into `writer`.
    ///
    /// Encrypted variants encode into an in-memory buffer first and write
    /// only ciphertext to the destination.
    pub fn save<T: Serialize>(
        &self,
        value: &T,
        writer: &mut dyn Write,
    ) -> Result<(), SaveLoadError> {
        match self {
            SerializationBackend::Binary => binary::to_writer(value, writer),
            SerializationBackend::Text => text::to_writer(value, writer),
            SerializationBackend::BinaryEncrypted(credentials) => {
                let mut plaintext = Vec::new();
                binary::to_writer(value, &mut plaintext)?;
                write_encrypted(&plaintext, credentials, writer)
            }
            SerializationBackend::TextEncrypted(credentials) => {
                let mut plaintext = Vec::new();
                text::to_writer(value, &mut plaintext)?;
                write_encrypted(&plaintext, credentials, writer)
            }
            SerializationBackend::Custom(format) => {
                let tree = serde_json::to_value(value)
                    .map_err(|e| SaveLoadError::Serialization(e.to_string()))?;
                let bytes = format.encode(&tree)?;
                writer
                    .write_all(&bytes)
                    .map_err(|e| SaveLoadError::io("Failed to write custom format output", e))
            }
        }
    }

    /// Decodes a value of type `T` from `reader`.
    ///
    /// Encrypted variants decrypt the whole stream into memory, then decode
    /// from the plaintext buffer.
    pub fn load<T: DeserializeOwned>(&self, reader: &mut dyn Read) -> Result<T, SaveLoadError> {
        match self {
            SerializationBackend::Binary => binary::from_reader(reader),
            SerializationBackend::Text => text::from_reader(reader),
            SerializationBackend::BinaryEncrypted(credentials) => {
                let plaintext = read_decrypted(reader, credentials)?;
                binary::from_reader(&mut plaintext.as_slice())
            }
            SerializationBackend::TextEncrypted(credentials) => {
                let plaintext = read_decrypted(reader, credentials)?;
                text::from_reader(&mut plaintext.as_slice())
            }
            SerializationBackend::Custom(format) => {
                let mut bytes = Vec::new();
                reader
                    .read_to_end(&mut bytes)
                    .map_err(|e| SaveLoadError::io("Failed to read custom format input", e))?;
                let tree = format.decode(&bytes)?;
                serde_json::from_value(tree)
                    .map_err(|e| SaveLoadError::Deserialization(e.to_string()))
            }
        }
    }

    /// Deep-copies `value` by round-tripping it through this backend.
    ///
    /// Every nested value is reconstructed from bytes; the result shares no
    /// state with the original. Encryption is irrelevant to a same-process
    /// copy, so encrypted variants delegate to their plaintext codec.
    pub fn copy<T>(&self, value: &T) -> Result<T, SaveLoadError>
    where
        T: Serialize + DeserializeOwned,
    {
        match self {
            SerializationBackend::BinaryEncrypted(_) => SerializationBackend::Binary.copy(value),
            SerializationBackend::TextEncrypted(_) => SerializationBackend::Text.copy(value),
            _ => {
                let mut buffer = Vec::new();
                self.save(value, &mut buffer)?;
                let mut slice = buffer.as_slice();
                self.load(&mut slice)
            }
        }
    }
}

fn write_encrypted(
    plaintext: &[u8],
    credentials: &Credentials,
    writer: &mut dyn Write,
) -> Result<(), SaveLoadError> {
    let ciphertext = crypto::encrypt(plaintext, credentials);
    writer
        .write_all(&ciphertext)
        .map_err(|e| SaveLoadError::io("Failed to write ciphertext", e))
}

fn read_decrypted(
    reader: &mut dyn Read,
    credentials: &Credentials,
) -> Result<Vec<u8>, SaveLoadError> {
    let mut ciphertext = Vec::new();
    reader
        .read_to_end(&mut ciphertext)
        .map_err(|e| SaveLoadError::io("Failed to read ciphertext", e))?;
    crypto::decrypt(&ciphertext, credentials)
}
