//! # Test Discovery Module / 测试发现模块
//!
//! Turns a fixture directory into an ordered [`TestCollection`].
//!
//! Discovery is pluggable through the [`TestProvider`] trait. A
//! [`ProviderRegistry`] decides which provider owns a directory:
//!
//! 1. a provider registered for that exact directory,
//! 2. otherwise the directory's `tests.toml` manifest, if present,
//! 3. otherwise the convention-based scan of the directory's files.
//!
//! Nothing found in a directory is ever executed as code; per-directory
//! customization is either declarative (the manifest) or compiled in
//! (a registered provider).
//!
//! 将测试夹具目录转换为有序的 [`TestCollection`]。
//! 通过 [`TestProvider`] trait 实现可插拔的发现机制，
//! [`ProviderRegistry`] 决定由哪个提供者负责某个目录。

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::{
    case::TestDescriptor, config::MANIFEST_FILE_NAME, convention::ConventionProvider,
    manifest::ManifestProvider,
};

/// Ordered test descriptors. Order is discovery order, which is also
/// execution and report order.
pub type TestCollection = Vec<TestDescriptor>;

/// Errors that abort discovery, and with it the whole run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read test directory {}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read test manifest {}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed test manifest {}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("test manifest {} has no `tests` entry", path.display())]
    MissingEntryPoint { path: PathBuf },

    #[error("invalid test case `{name}` in {}: {reason}", path.display())]
    InvalidCase {
        path: PathBuf,
        name: String,
        reason: String,
    },
}

/// Produces the test collection of a directory.
///
/// Implement this trait to give a directory its own enumeration logic and
/// register it with [`ProviderRegistry::register`].
pub trait TestProvider: Send + Sync {
    /// Short name used in logs and in the run banner.
    fn name(&self) -> &str;

    /// Produce all tests of `dir`, in execution order.
    fn produce_tests(&self, dir: &Path) -> Result<TestCollection, DiscoveryError>;
}

/// Which provider a directory was resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// A provider registered for the directory, by name.
    Registered(String),
    /// The directory's manifest file.
    Manifest(PathBuf),
    /// The convention-based file scan.
    Convention,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Registered(name) => write!(f, "registered provider `{name}`"),
            Strategy::Manifest(path) => write!(f, "manifest {}", path.display()),
            Strategy::Convention => f.write_str("convention"),
        }
    }
}

/// The outcome of discovery: the tests, and where they came from.
#[derive(Debug)]
pub struct Discovery {
    pub strategy: Strategy,
    pub tests: TestCollection,
}

/// Maps directories to the provider responsible for them.
pub struct ProviderRegistry {
    overrides: HashMap<PathBuf, Box<dyn TestProvider>>,
    convention: ConventionProvider,
    manifest_file_name: String,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(ConventionProvider::default())
    }
}

impl ProviderRegistry {
    /// Creates a registry without overrides that falls back to `convention`.
    pub fn new(convention: ConventionProvider) -> Self {
        Self {
            overrides: HashMap::new(),
            convention,
            manifest_file_name: MANIFEST_FILE_NAME.to_string(),
        }
    }

    /// Uses a different file name for the per-directory manifest.
    pub fn with_manifest_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.manifest_file_name = file_name.into();
        self
    }

    /// Registers `provider` as the owner of `dir`, replacing any earlier one.
    pub fn register(&mut self, dir: impl AsRef<Path>, provider: impl TestProvider + 'static) {
        let key = directory_key(dir.as_ref());
        debug!(dir = %key.display(), provider = provider.name(), "registered test provider");
        self.overrides.insert(key, Box::new(provider));
    }

    /// Resolves `dir` to its provider and produces its tests.
    ///
    /// # Errors
    /// Any [`DiscoveryError`] of the chosen provider. No fallback is tried
    /// once a provider has been chosen: a broken manifest is an error, not a
    /// reason to scan by convention.
    pub fn resolve(&self, dir: &Path) -> Result<Discovery, DiscoveryError> {
        if let Some(provider) = self.overrides.get(&directory_key(dir)) {
            info!(provider = provider.name(), "using registered test provider");
            return Ok(Discovery {
                strategy: Strategy::Registered(provider.name().to_string()),
                tests: provider.produce_tests(dir)?,
            });
        }

        let manifest_path = dir.join(&self.manifest_file_name);
        if manifest_path.is_file() {
            info!(manifest = %manifest_path.display(), "using test manifest");
            let provider = ManifestProvider::new(&self.manifest_file_name);
            return Ok(Discovery {
                strategy: Strategy::Manifest(manifest_path),
                tests: provider.produce_tests(dir)?,
            });
        }

        info!(extension = self.convention.extension(), "using convention-based discovery");
        Ok(Discovery {
            strategy: Strategy::Convention,
            tests: self.convention.produce_tests(dir)?,
        })
    }
}

/// Canonical form of a directory for registry lookups, so `fixtures`,
/// `./fixtures` and its absolute path all hit the same entry. Directories
/// that cannot be canonicalized are keyed as given.
fn directory_key(dir: &Path) -> PathBuf {
    dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf())
}
