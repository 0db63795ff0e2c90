//! Binary codec backed by bincode.
//!
//! Compact, not self-describing. Handles nested structures, maps and enums;
//! like every serde codec it works on value trees, so shared or cyclic
//! references are out of scope.

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SaveLoadError;

pub fn to_writer<T: Serialize>(value: &T, writer: &mut dyn Write) -> Result<(), SaveLoadError> {
    bincode::serialize_into(writer, value).map_err(|e| SaveLoadError::Serialization(e.to_string()))
}

pub fn from_reader<T: DeserializeOwned>(reader: &mut dyn Read) -> Result<T, SaveLoadError> {
    bincode::deserialize_from(reader).map_err(|e| SaveLoadError::Deserialization(e.to_string()))
}
