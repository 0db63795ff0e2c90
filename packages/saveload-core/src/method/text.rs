//! Structured-text codec backed by serde_json.
//!
//! Human-readable save files. Known limitations: map keys must be strings
//! or integers (structured keys fail to encode), and polymorphic values
//! survive only as far as serde's enum tagging records them.

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SaveLoadError;

pub fn to_writer<T: Serialize>(value: &T, writer: &mut dyn Write) -> Result<(), SaveLoadError> {
    serde_json::to_writer(writer, value).map_err(|e| SaveLoadError::Serialization(e.to_string()))
}

pub fn from_reader<T: DeserializeOwned>(reader: &mut dyn Read) -> Result<T, SaveLoadError> {
    serde_json::from_reader(reader).map_err(|e| SaveLoadError::Deserialization(e.to_string()))
}
