//! Configuration store
//!
//! Persists per-(identifier, target triple) path overrides for installed SDK
//! bundles and resolves effective destinations by layering those overrides
//! on top of bundle-declared defaults.
//!
//! The store owns one directory, `<sdk_root>/configuration`, and nothing
//! else: there is no index file and no in-memory cache. The override for a
//! pair lives at `<sdk_id>_<triple>.json` inside that directory, every
//! operation re-reads the filesystem, and external edits to the directory
//! are observed on the next call.

use crate::bundle;
use crate::codec::{self, CodecError};
use crate::destination::{Destination, DestinationPaths};
use crate::fsys::FileSystem;
use crate::triple::Triple;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the store's subdirectory under the SDK root
pub const CONFIGURATION_DIRECTORY: &str = "configuration";

/// Errors from configuration store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The configuration directory path exists but is not a directory
    #[error("expected a directory at {}", .0.display())]
    PathIsNotDirectory(PathBuf),

    /// Directory creation, file removal, or discovery I/O failed
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An override file exists but could not be written or decoded
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Store for per-(identifier, triple) destination overrides.
pub struct ConfigurationStore<F: FileSystem> {
    host_triple: Triple,
    sdk_root: PathBuf,
    configuration_directory: PathBuf,
    fs: F,
}

impl<F: FileSystem> ConfigurationStore<F> {
    /// Open the store under `sdk_root`, creating its configuration
    /// directory if it does not exist yet.
    ///
    /// Fails with [`StoreError::PathIsNotDirectory`] when something other
    /// than a directory already occupies the path. Performs no other I/O.
    pub fn new(
        host_triple: Triple,
        sdk_root: impl Into<PathBuf>,
        fs: F,
    ) -> Result<Self, StoreError> {
        let sdk_root = sdk_root.into();
        let configuration_directory = sdk_root.join(CONFIGURATION_DIRECTORY);

        if fs.exists(&configuration_directory) {
            if !fs.is_directory(&configuration_directory) {
                return Err(StoreError::PathIsNotDirectory(configuration_directory));
            }
        } else {
            fs.create_directory(&configuration_directory)
                .map_err(|source| StoreError::Io {
                    path: configuration_directory.clone(),
                    source,
                })?;
        }

        Ok(Self {
            host_triple,
            sdk_root,
            configuration_directory,
            fs,
        })
    }

    /// SDK root this store resolves bundles under.
    pub fn sdk_root(&self) -> &Path {
        &self.sdk_root
    }

    /// Deterministic override file path for (`sdk_id`, `triple`).
    ///
    /// The `<sdk_id>_<triple>.json` concatenation is the persisted-format
    /// contract; the pair encoded in the name is the sole key.
    pub fn configuration_path(&self, sdk_id: &str, triple: &Triple) -> PathBuf {
        self.configuration_directory
            .join(format!("{}_{}.json", sdk_id, triple))
    }

    /// Write (or overwrite) the override record for
    /// (`sdk_id`, `destination.target_triple`).
    ///
    /// Only populated path fields are serialized. The identifier is not
    /// checked against installed bundles: an override for an uninstalled
    /// bundle is inert until a matching bundle appears.
    pub fn update_configuration(
        &self,
        sdk_id: &str,
        destination: &Destination,
    ) -> Result<(), StoreError> {
        let path = self.configuration_path(sdk_id, &destination.target_triple);
        codec::encode(&self.fs, &path, &destination.paths)?;
        debug!(sdk_id, triple = %destination.target_triple, path = %path.display(), "wrote override");
        Ok(())
    }

    /// Resolve the effective destination for (`sdk_id`, `triple`).
    ///
    /// Returns `Ok(None)` when no installed bundle matches the identifier,
    /// host, and target. With a match but no override file, the bundle's
    /// declared default is returned unchanged. With an override file, its
    /// fields replace the default's field by field; a malformed override is
    /// a hard decode error, never silently treated as "no override".
    pub fn read_configuration(
        &self,
        sdk_id: &str,
        triple: &Triple,
    ) -> Result<Option<Destination>, StoreError> {
        let bundles =
            bundle::discover_bundles(&self.sdk_root, &self.fs).map_err(|source| StoreError::Io {
                path: self.sdk_root.clone(),
                source,
            })?;

        let default = bundles
            .iter()
            .find_map(|b| b.select_destination(sdk_id, &self.host_triple, triple));
        let Some(default) = default else {
            debug!(sdk_id, triple = %triple, "no matching bundle");
            return Ok(None);
        };

        let path = self.configuration_path(sdk_id, triple);
        if !self.fs.is_file(&path) {
            return Ok(Some(default));
        }

        let overrides: DestinationPaths = codec::decode(&self.fs, &path)?;
        Ok(Some(default.merged_with(&overrides)))
    }

    /// Remove the override file for (`sdk_id`, `triple`) if present.
    ///
    /// Returns `true` when a file existed and was removed, `false` when
    /// there was nothing to remove. The corresponding bundle is neither
    /// touched nor validated.
    pub fn reset_configuration(&self, sdk_id: &str, triple: &Triple) -> Result<bool, StoreError> {
        let path = self.configuration_path(sdk_id, triple);
        if !self.fs.exists(&path) {
            return Ok(false);
        }

        self.fs
            .remove_file_tree(&path)
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        debug!(sdk_id, triple = %triple, "removed override");
        Ok(true)
    }
}
