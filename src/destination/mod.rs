//! Destination descriptors
//!
//! A destination is the resolved set of paths needed to build for one target
//! triple: SDK root, toolchain, search paths. Bundles declare default
//! destinations; users may override individual path fields, and the two are
//! combined with a field-by-field merge where the override wins when present.

use crate::triple::Triple;
use serde::{Deserialize, Serialize};

/// Path configuration for a destination.
///
/// Every field is independently optional. Fields left unset are omitted from
/// serialized form entirely, so a stored override never clobbers a bundle
/// default it did not mean to touch. The field set is the persisted-format
/// contract: adding a field means extending [`DestinationPaths::merged_with`]
/// in the same change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DestinationPaths {
    /// Root of the target SDK (sysroot)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_root_path: Option<String>,

    /// Root of the toolchain used to build for the target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolchain_path: Option<String>,

    /// Additional header search paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_search_paths: Option<Vec<String>>,

    /// Additional library search paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_search_paths: Option<Vec<String>>,

    /// Paths to toolset descriptor files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolset_paths: Option<Vec<String>>,
}

impl DestinationPaths {
    /// Merge `overlay` into `self` field by field.
    ///
    /// Each field takes the overlay's value when the overlay sets it and
    /// keeps `self`'s value otherwise. Fields are enumerated explicitly so a
    /// newly added field cannot silently skip merge handling.
    pub fn merged_with(&self, overlay: &DestinationPaths) -> DestinationPaths {
        DestinationPaths {
            sdk_root_path: overlay
                .sdk_root_path
                .clone()
                .or_else(|| self.sdk_root_path.clone()),
            toolchain_path: overlay
                .toolchain_path
                .clone()
                .or_else(|| self.toolchain_path.clone()),
            include_search_paths: overlay
                .include_search_paths
                .clone()
                .or_else(|| self.include_search_paths.clone()),
            library_search_paths: overlay
                .library_search_paths
                .clone()
                .or_else(|| self.library_search_paths.clone()),
            toolset_paths: overlay
                .toolset_paths
                .clone()
                .or_else(|| self.toolset_paths.clone()),
        }
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == DestinationPaths::default()
    }
}

/// Resolved destination for one target triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Target this destination builds for
    pub target_triple: Triple,

    /// Path configuration, fully or partially populated
    pub paths: DestinationPaths,
}

impl Destination {
    /// Create a destination for `target_triple` with the given paths.
    pub fn new(target_triple: Triple, paths: DestinationPaths) -> Self {
        Self {
            target_triple,
            paths,
        }
    }

    /// Layer `overrides` on top of this destination's paths.
    ///
    /// The result keeps this destination's target triple; override contents
    /// are properties only and never carry a triple of their own.
    pub fn merged_with(&self, overrides: &DestinationPaths) -> Destination {
        Destination {
            target_triple: self.target_triple.clone(),
            paths: self.paths.merged_with(overrides),
        }
    }
}
