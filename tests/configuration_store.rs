//! Integration tests for the configuration store
//!
//! Each test builds a throwaway SDK root with bundle fixtures on disk and
//! exercises the full update/read/reset cycle against it.

use sdk_destinations::{
    ConfigurationStore, Destination, DestinationPaths, HostFileSystem, Triple,
};
use std::path::Path;
use tempfile::TempDir;

const TARGET: &str = "x86_64-unknown-linux-gnu";

fn host() -> Triple {
    Triple::parse("aarch64-apple-darwin").unwrap()
}

fn target() -> Triple {
    Triple::parse(TARGET).unwrap()
}

/// Install a bundle fixture declaring one destination for TARGET, usable
/// from any host, with both default paths populated.
fn install_bundle(sdk_root: &Path, identifier: &str) {
    let bundle_dir = sdk_root.join(format!("{}.sdkbundle", identifier));
    std::fs::create_dir_all(&bundle_dir).unwrap();
    std::fs::write(
        bundle_dir.join("info.json"),
        format!(
            r#"{{
  "schema_version": 1,
  "identifier": "{identifier}",
  "destinations": [
    {{
      "target_triple": "{TARGET}",
      "paths": {{
        "sdk_root_path": "/bundles/{identifier}/sysroot",
        "toolchain_path": "/bundles/{identifier}/toolchain"
      }}
    }}
  ]
}}"#
        ),
    )
    .unwrap();
}

fn open_store(sdk_root: &Path) -> ConfigurationStore<HostFileSystem> {
    ConfigurationStore::new(host(), sdk_root, HostFileSystem).unwrap()
}

#[test]
fn bootstrap_creates_and_reuses_configuration_directory() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("configuration");

    assert!(!config_dir.exists());
    open_store(temp.path());
    assert!(config_dir.is_dir());

    // Constructing again against the same root is a no-op.
    open_store(temp.path());
    assert!(config_dir.is_dir());
}

#[test]
fn read_without_override_returns_bundle_default() {
    let temp = TempDir::new().unwrap();
    install_bundle(temp.path(), "my-sdk");
    let store = open_store(temp.path());

    let destination = store.read_configuration("my-sdk", &target()).unwrap().unwrap();
    assert_eq!(destination.target_triple, target());
    assert_eq!(
        destination.paths.sdk_root_path.as_deref(),
        Some("/bundles/my-sdk/sysroot")
    );
    assert_eq!(
        destination.paths.toolchain_path.as_deref(),
        Some("/bundles/my-sdk/toolchain")
    );
    assert!(destination.paths.include_search_paths.is_none());
}

#[test]
fn read_unknown_identifier_is_none() {
    let temp = TempDir::new().unwrap();
    install_bundle(temp.path(), "my-sdk");
    let store = open_store(temp.path());

    let result = store.read_configuration("nonexistent-id", &target()).unwrap();
    assert!(result.is_none());
}

#[test]
fn read_unsupported_target_is_none() {
    let temp = TempDir::new().unwrap();
    install_bundle(temp.path(), "my-sdk");
    let store = open_store(temp.path());

    let other = Triple::parse("wasm32-unknown-wasi").unwrap();
    assert!(store.read_configuration("my-sdk", &other).unwrap().is_none());
}

#[test]
fn partial_override_merges_field_by_field() {
    let temp = TempDir::new().unwrap();
    install_bundle(temp.path(), "my-sdk");
    let store = open_store(temp.path());

    // Override only sdk_root_path.
    let override_dest = Destination::new(
        target(),
        DestinationPaths {
            sdk_root_path: Some("/x".to_string()),
            ..Default::default()
        },
    );
    store.update_configuration("my-sdk", &override_dest).unwrap();

    let resolved = store.read_configuration("my-sdk", &target()).unwrap().unwrap();
    assert_eq!(resolved.paths.sdk_root_path.as_deref(), Some("/x"));
    // The field the override left absent keeps the bundle default.
    assert_eq!(
        resolved.paths.toolchain_path.as_deref(),
        Some("/bundles/my-sdk/toolchain")
    );
}

#[test]
fn toolchain_path_override_example() {
    let temp = TempDir::new().unwrap();
    install_bundle(temp.path(), "mySDK");
    let store = open_store(temp.path());

    let override_dest = Destination::new(
        target(),
        DestinationPaths {
            toolchain_path: Some("/opt/tc".to_string()),
            ..Default::default()
        },
    );
    store.update_configuration("mySDK", &override_dest).unwrap();

    let resolved = store.read_configuration("mySDK", &target()).unwrap().unwrap();
    assert_eq!(resolved.paths.toolchain_path.as_deref(), Some("/opt/tc"));
    assert_eq!(
        resolved.paths.sdk_root_path.as_deref(),
        Some("/bundles/mySDK/sysroot")
    );
}

#[test]
fn update_overwrites_previous_override() {
    let temp = TempDir::new().unwrap();
    install_bundle(temp.path(), "my-sdk");
    let store = open_store(temp.path());

    let first = Destination::new(
        target(),
        DestinationPaths {
            sdk_root_path: Some("/first".to_string()),
            include_search_paths: Some(vec!["/inc".to_string()]),
            ..Default::default()
        },
    );
    store.update_configuration("my-sdk", &first).unwrap();

    // The second write replaces the whole file, so the earlier
    // include_search_paths override disappears.
    let second = Destination::new(
        target(),
        DestinationPaths {
            sdk_root_path: Some("/second".to_string()),
            ..Default::default()
        },
    );
    store.update_configuration("my-sdk", &second).unwrap();

    let resolved = store.read_configuration("my-sdk", &target()).unwrap().unwrap();
    assert_eq!(resolved.paths.sdk_root_path.as_deref(), Some("/second"));
    assert!(resolved.paths.include_search_paths.is_none());
}

#[test]
fn reset_is_idempotent() {
    let temp = TempDir::new().unwrap();
    install_bundle(temp.path(), "my-sdk");
    let store = open_store(temp.path());

    let override_dest = Destination::new(
        target(),
        DestinationPaths {
            sdk_root_path: Some("/x".to_string()),
            ..Default::default()
        },
    );
    store.update_configuration("my-sdk", &override_dest).unwrap();
    let override_path = store.configuration_path("my-sdk", &target());
    assert!(override_path.is_file());

    assert!(store.reset_configuration("my-sdk", &target()).unwrap());
    assert!(!override_path.exists());

    // Second reset has nothing to remove and reports that.
    assert!(!store.reset_configuration("my-sdk", &target()).unwrap());
    assert!(!override_path.exists());
}

#[test]
fn reset_restores_bundle_defaults_on_read() {
    let temp = TempDir::new().unwrap();
    install_bundle(temp.path(), "my-sdk");
    let store = open_store(temp.path());

    let override_dest = Destination::new(
        target(),
        DestinationPaths {
            toolchain_path: Some("/opt/tc".to_string()),
            ..Default::default()
        },
    );
    store.update_configuration("my-sdk", &override_dest).unwrap();
    store.reset_configuration("my-sdk", &target()).unwrap();

    let resolved = store.read_configuration("my-sdk", &target()).unwrap().unwrap();
    assert_eq!(
        resolved.paths.toolchain_path.as_deref(),
        Some("/bundles/my-sdk/toolchain")
    );
}

#[test]
fn corrupt_override_surfaces_decode_error() {
    let temp = TempDir::new().unwrap();
    install_bundle(temp.path(), "my-sdk");
    let store = open_store(temp.path());

    let override_path = store.configuration_path("my-sdk", &target());
    std::fs::write(&override_path, "garbage bytes, not the schema").unwrap();

    let result = store.read_configuration("my-sdk", &target());
    assert!(result.is_err(), "corrupt override must not fall back to defaults");
}

#[test]
fn override_for_uninstalled_bundle_is_inert() {
    let temp = TempDir::new().unwrap();
    let store = open_store(temp.path());

    // Writing an override for a bundle that is not installed succeeds...
    let override_dest = Destination::new(
        target(),
        DestinationPaths {
            sdk_root_path: Some("/x".to_string()),
            ..Default::default()
        },
    );
    store.update_configuration("future-sdk", &override_dest).unwrap();
    assert!(store.configuration_path("future-sdk", &target()).is_file());

    // ...but reads still report absence until a matching bundle appears.
    assert!(store
        .read_configuration("future-sdk", &target())
        .unwrap()
        .is_none());

    install_bundle(temp.path(), "future-sdk");
    let resolved = store
        .read_configuration("future-sdk", &target())
        .unwrap()
        .unwrap();
    assert_eq!(resolved.paths.sdk_root_path.as_deref(), Some("/x"));
}

#[test]
fn external_directory_edits_are_observed() {
    let temp = TempDir::new().unwrap();
    install_bundle(temp.path(), "my-sdk");
    let store = open_store(temp.path());

    // Another process (here: direct fs access) drops an override file in.
    let override_path = store.configuration_path("my-sdk", &target());
    std::fs::write(&override_path, "{\n  \"sdk_root_path\": \"/external\"\n}\n").unwrap();

    let resolved = store.read_configuration("my-sdk", &target()).unwrap().unwrap();
    assert_eq!(resolved.paths.sdk_root_path.as_deref(), Some("/external"));
}

#[test]
fn overrides_for_different_pairs_are_independent() {
    let temp = TempDir::new().unwrap();
    install_bundle(temp.path(), "sdk-a");
    install_bundle(temp.path(), "sdk-b");
    let store = open_store(temp.path());

    let override_dest = Destination::new(
        target(),
        DestinationPaths {
            sdk_root_path: Some("/only-a".to_string()),
            ..Default::default()
        },
    );
    store.update_configuration("sdk-a", &override_dest).unwrap();

    let a = store.read_configuration("sdk-a", &target()).unwrap().unwrap();
    let b = store.read_configuration("sdk-b", &target()).unwrap().unwrap();
    assert_eq!(a.paths.sdk_root_path.as_deref(), Some("/only-a"));
    assert_eq!(b.paths.sdk_root_path.as_deref(), Some("/bundles/sdk-b/sysroot"));
}
