//! JSON codec over the filesystem seam
//!
//! Encode is pretty-printed with a trailing newline and replaces the target
//! file wholesale; decode is lenient about absent optional fields (serde
//! defaults) but hard-fails on malformed bytes. Every error carries the path
//! it happened at.

use crate::fsys::FileSystem;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from JSON encode/decode against a file
#[derive(Debug, Error)]
pub enum CodecError {
    /// Reading or writing the file failed
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file's bytes do not match the expected schema
    #[error("malformed JSON at {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The value could not be serialized
    #[error("failed to encode JSON for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Write `value` as pretty-printed JSON to `path`, replacing any existing
/// file.
pub fn encode<F, T>(fs: &F, path: &Path, value: &T) -> Result<(), CodecError>
where
    F: FileSystem,
    T: Serialize,
{
    let json = serde_json::to_string_pretty(value).map_err(|source| CodecError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    fs.write(path, &format!("{}\n", json))
        .map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Read the file at `path` and decode it as `T`.
pub fn decode<F, T>(fs: &F, path: &Path) -> Result<T, CodecError>
where
    F: FileSystem,
    T: DeserializeOwned,
{
    let contents = fs
        .read_to_string(path)
        .map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&contents).map_err(|source| CodecError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
