//! Module discovery and binding.
//!
//! A [`ModuleSource`] enumerates candidate modules and binds each of them to a
//! [`SentenceParser`] implementation. Implementations are never loaded from disk:
//! binding resolves a candidate's name in a [`ModuleCatalog`] of constructors
//! compiled into the process.

use std::{
    env,
    ffi::{OsStr, OsString},
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{BindError, DiscoveryError},
    module::SentenceParser,
};

/// Environment variable overriding the module search path.
pub const PARSER_PATH_ENV: &str = "NMEA_PARSER_PATH";

/// Default module search path.
pub const DEFAULT_PARSER_PATH: &str = "/usr/lib/nmea/";

/// Creates a fresh, uninitialized parser module.
pub type ModuleConstructor = fn() -> Box<dyn SentenceParser>;

/// Where the registry looks for modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    search_path: PathBuf,
}

impl RegistryConfig {
    pub fn new(search_path: impl Into<PathBuf>) -> Self {
        RegistryConfig {
            search_path: search_path.into(),
        }
    }

    /// Reads the search path from [`PARSER_PATH_ENV`], falling back to
    /// [`DEFAULT_PARSER_PATH`].
    pub fn from_env() -> Self {
        RegistryConfig::from_var(env::var_os(PARSER_PATH_ENV))
    }

    /// Uses `value` as the search path unless it is unset or empty.
    pub fn from_var(value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => RegistryConfig::new(path),
            _ => RegistryConfig::default(),
        }
    }

    pub fn search_path(&self) -> &Path {
        &self.search_path
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig::new(DEFAULT_PARSER_PATH)
    }
}

/// A candidate module found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    name: String,
    path: Option<PathBuf>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        ModuleDescriptor {
            name: name.into(),
            path: None,
        }
    }

    pub fn with_path(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ModuleDescriptor {
            name: name.into(),
            path: Some(path.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the candidate was discovered as, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Named module constructors known to the process.
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    entries: Vec<(String, ModuleConstructor)>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        ModuleCatalog::default()
    }

    /// The modules shipped with the crate: `gpgga` and `gpgll`.
    pub fn builtin() -> Self {
        #[allow(unused_mut)]
        let mut catalog = ModuleCatalog::new();

        #[cfg(feature = "sentences")]
        {
            use crate::sentences::{GgaParser, GllParser};

            catalog.insert("gpgga", || Box::new(GgaParser));
            catalog.insert("gpgll", || Box::new(GllParser));
        }

        catalog
    }

    /// Adds a constructor, replacing any previous one of the same name.
    pub fn insert(&mut self, name: impl Into<String>, constructor: ModuleConstructor) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = constructor,
            None => self.entries.push((name, constructor)),
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, constructor: ModuleConstructor) -> Self {
        self.insert(name, constructor);
        self
    }

    pub fn get(&self, name: &str) -> Option<ModuleConstructor> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, constructor)| *constructor)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn construct(&self, name: &str) -> Result<Box<dyn SentenceParser>, BindError> {
        self.get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| BindError::UnknownModule(name.into()))
    }
}

/// Enumerates candidate modules and binds them.
pub trait ModuleSource {
    /// Lists candidates in discovery order.
    fn discover(&self) -> Result<Vec<ModuleDescriptor>, DiscoveryError>;

    /// Binds a candidate to its implementation.
    fn bind(&self, descriptor: &ModuleDescriptor) -> Result<Box<dyn SentenceParser>, BindError>;
}

/// Offers every catalog entry, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    catalog: ModuleCatalog,
}

impl StaticSource {
    pub fn new(catalog: ModuleCatalog) -> Self {
        StaticSource { catalog }
    }
}

impl ModuleSource for StaticSource {
    fn discover(&self) -> Result<Vec<ModuleDescriptor>, DiscoveryError> {
        Ok(self.catalog.names().map(ModuleDescriptor::new).collect())
    }

    fn bind(&self, descriptor: &ModuleDescriptor) -> Result<Box<dyn SentenceParser>, BindError> {
        self.catalog.construct(descriptor.name())
    }
}

/// Offers the loadable-module files of a directory.
///
/// Only regular, non-hidden files ending in the platform's loadable-module suffix
/// ([`std::env::consts::DLL_SUFFIX`]) are candidates. A file `gpgga.so` is bound to
/// the catalog entry `gpgga`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    path: PathBuf,
    catalog: ModuleCatalog,
}

impl DirectorySource {
    pub fn new(path: impl Into<PathBuf>, catalog: ModuleCatalog) -> Self {
        DirectorySource {
            path: path.into(),
            catalog,
        }
    }

    pub fn from_config(config: &RegistryConfig, catalog: ModuleCatalog) -> Self {
        DirectorySource::new(config.search_path(), catalog)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModuleSource for DirectorySource {
    fn discover(&self) -> Result<Vec<ModuleDescriptor>, DiscoveryError> {
        if !self.path.is_dir() {
            return Err(DiscoveryError::NotADirectory(self.path.clone()));
        }

        let io_error = |source: std::io::Error| DiscoveryError::Io {
            path: self.path.clone(),
            source,
        };

        let mut descriptors = Vec::new();
        for entry in fs::read_dir(&self.path).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();

            let Some(name) = module_name(&path) else {
                continue;
            };

            if !path.is_file() {
                continue;
            }

            tracing::debug!(module = name, path = %path.display(), "discovered parser module");
            descriptors.push(ModuleDescriptor::with_path(name, &path));
        }

        Ok(descriptors)
    }

    fn bind(&self, descriptor: &ModuleDescriptor) -> Result<Box<dyn SentenceParser>, BindError> {
        if let Some(path) = descriptor.path() {
            fs::File::open(path).map_err(|source| BindError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        }

        self.catalog.construct(descriptor.name())
    }
}

/// Module name of a candidate file, `None` when the file is not a candidate.
fn module_name(path: &Path) -> Option<&str> {
    let file_name = path.file_name().and_then(OsStr::to_str)?;
    if file_name.starts_with('.') {
        return None;
    }

    file_name
        .strip_suffix(env::consts::DLL_SUFFIX)
        .filter(|name| !name.is_empty())
}
