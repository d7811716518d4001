use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::errors::SGError;

///
/// Encodings of grid snapshots. The `Lz4` variants compress the encoded
/// bytes with a size prefix.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SerializationFormat {
    /// Human readable, largest
    Json,
    JsonLz4,
    /// Compact binary
    Bincode,
    #[default]
    BincodeLz4,
}

impl SerializationFormat {
    pub fn is_compressed(&self) -> bool {
        matches!(self, SerializationFormat::JsonLz4 | SerializationFormat::BincodeLz4)
    }

    fn is_json(&self) -> bool {
        matches!(self, SerializationFormat::Json | SerializationFormat::JsonLz4)
    }
}

/// Encodes `data` in `format`.
pub fn serialize<T: Serialize>(data: &T, format: SerializationFormat) -> Result<Vec<u8>, SGError> {
    let bytes = if format.is_json() {
        serde_json::to_vec(data).map_err(|_| SGError::SerializationFailed)?
    } else {
        bincode::serde::encode_to_vec(data, bincode::config::standard()).map_err(|_| SGError::SerializationFailed)?
    };
    if format.is_compressed() {
        Ok(lz4_flex::compress_prepend_size(&bytes))
    } else {
        Ok(bytes)
    }
}

/// Decodes bytes written by [`serialize`] with the same `format`.
pub fn deserialize<T: DeserializeOwned>(data: &[u8], format: SerializationFormat) -> Result<T, SGError> {
    let decompressed;
    let bytes = if format.is_compressed() {
        decompressed = lz4_flex::decompress_size_prepended(data).map_err(|_| SGError::LZ4DecompressionFailed)?;
        decompressed.as_slice()
    } else {
        data
    };
    if format.is_json() {
        serde_json::from_slice(bytes).map_err(|_| SGError::DeserializationFailed)
    } else {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map(|(value, _)| value)
            .map_err(|_| SGError::DeserializationFailed)
    }
}
