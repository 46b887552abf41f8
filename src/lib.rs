//! SDK Destinations - per-target destination resolution and override store
//!
//! This crate resolves build destinations declared by installed SDK bundles
//! and persists user path overrides per (identifier, target triple) pair.
//! Reads layer the stored override on top of the bundle's declared defaults,
//! field by field, with the override winning where present.

pub mod bundle;
pub mod codec;
pub mod destination;
pub mod fsys;
pub mod store;
pub mod triple;

pub use bundle::{discover_bundles, Bundle, BundleError};
pub use codec::CodecError;
pub use destination::{Destination, DestinationPaths};
pub use fsys::{FileSystem, HostFileSystem};
pub use store::{ConfigurationStore, StoreError};
pub use triple::{Triple, TripleError};
