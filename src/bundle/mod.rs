//! SDK bundle discovery and validation
//!
//! An installed bundle is a `<name>.sdkbundle` directory directly under the
//! SDK root, carrying an `info.json` manifest that declares its identifier
//! and the destinations it provides per target triple. Discovery scans the
//! root, parses each manifest, and skips anything invalid with a warning so
//! one broken bundle never hides the rest.

use crate::codec::{self, CodecError};
use crate::destination::{Destination, DestinationPaths};
use crate::fsys::FileSystem;
use crate::triple::Triple;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Manifest schema version understood by this crate
pub const SCHEMA_VERSION: u32 = 1;

/// Manifest file name inside a bundle directory
pub const MANIFEST_NAME: &str = "info.json";

/// Extension marking a directory as an installable bundle
pub const BUNDLE_EXTENSION: &str = "sdkbundle";

/// Errors from loading a single bundle
#[derive(Debug, Error)]
pub enum BundleError {
    /// The bundle directory has no manifest file
    #[error("missing {} in bundle at {}", MANIFEST_NAME, .0.display())]
    MissingManifest(PathBuf),

    /// The manifest declares a schema version this crate does not understand
    #[error("unsupported bundle schema version {found} at {} (expected {})", .path.display(), SCHEMA_VERSION)]
    UnsupportedSchemaVersion { path: PathBuf, found: u32 },

    /// The manifest could not be read or decoded
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// One destination declaration inside a bundle manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationEntry {
    /// Hosts this destination can run on; absent means any host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_triples: Option<Vec<Triple>>,

    /// Target this destination builds for
    pub target_triple: Triple,

    /// Default path configuration declared by the bundle
    #[serde(default)]
    pub paths: DestinationPaths,
}

/// Bundle manifest (`info.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Manifest schema version
    pub schema_version: u32,

    /// Identifier users refer to the bundle by
    pub identifier: String,

    /// Destinations this bundle provides
    #[serde(default)]
    pub destinations: Vec<DestinationEntry>,
}

/// A validated, installed bundle.
#[derive(Debug, Clone)]
pub struct Bundle {
    path: PathBuf,
    manifest: BundleManifest,
}

impl Bundle {
    /// Load and validate the bundle at `path`.
    pub fn load<F: FileSystem>(path: &Path, fs: &F) -> Result<Self, BundleError> {
        let manifest_path = path.join(MANIFEST_NAME);
        if !fs.is_file(&manifest_path) {
            return Err(BundleError::MissingManifest(path.to_path_buf()));
        }

        let manifest: BundleManifest = codec::decode(fs, &manifest_path)?;
        if manifest.schema_version != SCHEMA_VERSION {
            return Err(BundleError::UnsupportedSchemaVersion {
                path: path.to_path_buf(),
                found: manifest.schema_version,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            manifest,
        })
    }

    /// Directory this bundle was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier declared in the manifest.
    pub fn identifier(&self) -> &str {
        &self.manifest.identifier
    }

    /// Target triples this bundle declares destinations for.
    pub fn target_triples(&self) -> impl Iterator<Item = &Triple> {
        self.manifest.destinations.iter().map(|d| &d.target_triple)
    }

    /// Select the default destination for (`sdk_id`, `host`, `target`).
    ///
    /// Returns the declared destination when the identifier matches, the
    /// entry is usable from `host` (no `host_triples` means any host), and
    /// the entry targets `target`. `None` when this bundle has nothing to
    /// offer for the request.
    pub fn select_destination(
        &self,
        sdk_id: &str,
        host: &Triple,
        target: &Triple,
    ) -> Option<Destination> {
        if self.manifest.identifier != sdk_id {
            return None;
        }

        self.manifest
            .destinations
            .iter()
            .find(|entry| {
                entry.target_triple == *target
                    && entry
                        .host_triples
                        .as_ref()
                        .map_or(true, |hosts| hosts.iter().any(|h| h.is_compatible_with(host)))
            })
            .map(|entry| Destination::new(entry.target_triple.clone(), entry.paths.clone()))
    }
}

/// Discover all valid bundles directly under `root`.
///
/// Only `*.sdkbundle` directories are considered. Invalid candidates
/// (missing or malformed manifest, unsupported schema version) are skipped
/// with a warning rather than failing the scan.
pub fn discover_bundles<F: FileSystem>(root: &Path, fs: &F) -> io::Result<Vec<Bundle>> {
    if !fs.is_directory(root) {
        return Ok(Vec::new());
    }

    let mut bundles = Vec::new();
    for entry in fs.list_directory(root)? {
        if !fs.is_directory(&entry)
            || entry.extension().and_then(|e| e.to_str()) != Some(BUNDLE_EXTENSION)
        {
            continue;
        }

        match Bundle::load(&entry, fs) {
            Ok(bundle) => {
                debug!(path = %entry.display(), identifier = bundle.identifier(), "discovered bundle");
                bundles.push(bundle);
            }
            Err(e) => {
                warn!(path = %entry.display(), error = %e, "skipping invalid bundle");
            }
        }
    }

    Ok(bundles)
}
