//! Target triple values
//!
//! A triple names the machine/vendor/OS (and optionally ABI) a destination
//! builds for, e.g. `x86_64-unknown-linux-gnu` or `aarch64-apple-darwin`.
//! Triples are opaque immutable values: parsed once, compared by equality,
//! and rendered back through their canonical string form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from triple parsing
#[derive(Debug, Error)]
pub enum TripleError {
    /// The string does not look like an `arch-vendor-os[-abi]` triple
    #[error("invalid target triple: {0}")]
    InvalidTriple(String),
}

/// Canonical `arch-vendor-os[-abi]` identifier for a build target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Triple {
    arch: String,
    vendor: String,
    os: String,
    abi: Option<String>,
}

impl Triple {
    /// Parse a triple from its canonical string form.
    pub fn parse(s: &str) -> Result<Self, TripleError> {
        let parts: Vec<&str> = s.split('-').collect();
        if !(3..=4).contains(&parts.len()) || parts.iter().any(|p| p.is_empty()) {
            return Err(TripleError::InvalidTriple(s.to_string()));
        }

        Ok(Self {
            arch: parts[0].to_string(),
            vendor: parts[1].to_string(),
            os: parts[2].to_string(),
            abi: parts.get(3).map(|p| p.to_string()),
        })
    }

    /// The triple of the machine this process is running on.
    pub fn host() -> Self {
        let vendor = if cfg!(target_vendor = "apple") {
            "apple"
        } else if cfg!(target_vendor = "pc") {
            "pc"
        } else {
            "unknown"
        };

        let os = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };

        let abi = if cfg!(target_env = "gnu") {
            Some("gnu".to_string())
        } else if cfg!(target_env = "musl") {
            Some("musl".to_string())
        } else if cfg!(target_env = "msvc") {
            Some("msvc".to_string())
        } else {
            None
        };

        Self {
            arch: std::env::consts::ARCH.to_string(),
            vendor: vendor.to_string(),
            os: os.to_string(),
            abi,
        }
    }

    /// Architecture component (e.g. `x86_64`).
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Operating system component (e.g. `linux`, `darwin`).
    pub fn os(&self) -> &str {
        &self.os
    }

    /// Whether a destination declared for `self` can run on a host
    /// identified by `other`.
    ///
    /// Equal triples are always compatible. Otherwise architecture and OS
    /// must match exactly; an `unknown` vendor on either side matches any
    /// vendor, and a missing ABI on either side matches any ABI.
    pub fn is_compatible_with(&self, other: &Triple) -> bool {
        if self == other {
            return true;
        }
        if self.arch != other.arch || self.os != other.os {
            return false;
        }

        let vendor_ok =
            self.vendor == other.vendor || self.vendor == "unknown" || other.vendor == "unknown";
        let abi_ok = match (&self.abi, &other.abi) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };

        vendor_ok && abi_ok
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.arch, self.vendor, self.os)?;
        if let Some(ref abi) = self.abi {
            write!(f, "-{}", abi)?;
        }
        Ok(())
    }
}

impl FromStr for Triple {
    type Err = TripleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Triple {
    type Error = TripleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Triple> for String {
    fn from(triple: Triple) -> Self {
        triple.to_string()
    }
}
