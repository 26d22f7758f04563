//! # Parser Registry
//!
//! The registry owns every bound parser module and indexes them by
//! [`SentenceType`] and by [`TypeWord`].
//!
//! It is an explicit context object: build it once with [`Registry::register_all`]
//! before dispatching, share it by reference, and tear it down with
//! [`Registry::unregister_all`] (or by dropping it).
//!
//! ```rust
//! # #[cfg(feature = "sentences")] {
//! use nmea0183_stream::{ModuleCatalog, Registry, SentenceType, StaticSource};
//!
//! let mut registry = Registry::new();
//! let count = registry
//!     .register_all(&StaticSource::new(ModuleCatalog::builtin()))
//!     .unwrap();
//! assert_eq!(count, 2);
//!
//! assert!(registry.lookup_by_type_word("GGA").is_some());
//! assert!(registry.lookup_by_type(SentenceType::Gll).is_some());
//! assert!(registry.lookup_by_type_word("ZDA").is_none());
//!
//! registry.unregister_all();
//! assert!(registry.is_empty());
//! # }
//! ```

mod discovery;

pub use discovery::{
    DEFAULT_PARSER_PATH, DirectorySource, ModuleCatalog, ModuleConstructor, ModuleDescriptor,
    ModuleSource, PARSER_PATH_ENV, RegistryConfig, StaticSource,
};

use std::collections::HashMap;

use crate::{
    error::{RegisterError, RegistryError},
    module::ParserModule,
    sentence::{SentenceType, TypeWord},
};

/// Index of the available sentence parser modules.
#[derive(Debug, Default)]
pub struct Registry {
    modules: Vec<ParserModule>,
    by_type: HashMap<SentenceType, usize>,
    by_type_word: HashMap<TypeWord, usize>,
}

impl Registry {
    /// Creates an empty registry. Nothing can be dispatched until
    /// [`register_all`](Registry::register_all) succeeds.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Registers the modules shipped with the crate.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Registry::new();
        registry.register_all(&StaticSource::new(ModuleCatalog::builtin()))?;
        Ok(registry)
    }

    /// Registers the built-in modules found in the directory named by
    /// [`PARSER_PATH_ENV`], or [`DEFAULT_PARSER_PATH`].
    pub fn from_env() -> Result<Self, RegistryError> {
        let source =
            DirectorySource::from_config(&RegistryConfig::from_env(), ModuleCatalog::builtin());
        let mut registry = Registry::new();
        registry.register_all(&source)?;
        Ok(registry)
    }

    /// Discovers, binds and initializes every candidate of `source`.
    ///
    /// Registration is best-effort per module: a module that fails to bind or
    /// initialize, or that duplicates the sentence type or type-word of an earlier
    /// module, is logged and skipped. Returns the number of registered modules.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyRegistered`] if the registry is already populated.
    /// - [`RegistryError::Discovery`] if the candidates cannot be enumerated.
    /// - [`RegistryError::RegistrationEmpty`] if no module could be registered.
    pub fn register_all(&mut self, source: &dyn ModuleSource) -> Result<usize, RegistryError> {
        if !self.modules.is_empty() {
            return Err(RegistryError::AlreadyRegistered);
        }

        for descriptor in source.discover()? {
            let name = descriptor.name().to_owned();

            let registered = source
                .bind(&descriptor)
                .map_err(RegisterError::from)
                .and_then(|parser| {
                    ParserModule::init(name.clone(), parser).map_err(RegisterError::from)
                })
                .and_then(|module| self.insert(module));

            if let Err(error) = registered {
                tracing::warn!(module = %name, %error, "skipping parser module");
            }
        }

        if self.modules.is_empty() {
            return Err(RegistryError::RegistrationEmpty);
        }

        tracing::info!(count = self.modules.len(), "parser modules registered");
        Ok(self.modules.len())
    }

    fn insert(&mut self, module: ParserModule) -> Result<(), RegisterError> {
        if self.by_type.contains_key(&module.sentence_type()) {
            return Err(RegisterError::DuplicateType(module.sentence_type()));
        }
        if self.by_type_word.contains_key(&module.type_word()) {
            return Err(RegisterError::DuplicateTypeWord(module.type_word()));
        }

        tracing::debug!(
            module = module.name(),
            sentence_type = ?module.sentence_type(),
            type_word = %module.type_word(),
            "registered parser module"
        );

        let slot = self.modules.len();
        self.by_type.insert(module.sentence_type(), slot);
        self.by_type_word.insert(module.type_word(), slot);
        self.modules.push(module);
        Ok(())
    }

    /// Releases every module and clears the indexes.
    ///
    /// Safe to call on an empty or partially built registry.
    pub fn unregister_all(&mut self) {
        if !self.modules.is_empty() {
            tracing::info!(count = self.modules.len(), "parser modules unregistered");
        }

        self.by_type.clear();
        self.by_type_word.clear();
        self.modules.clear();
    }

    pub fn lookup_by_type(&self, sentence_type: SentenceType) -> Option<&ParserModule> {
        self.by_type
            .get(&sentence_type)
            .and_then(|&slot| self.modules.get(slot))
    }

    /// Looks up the module for a three character type-word, e.g. `GGA`.
    ///
    /// Matching is exact and case-sensitive; anything but three alphanumeric
    /// ASCII characters finds nothing.
    pub fn lookup_by_type_word(&self, word: impl AsRef<[u8]>) -> Option<&ParserModule> {
        let word = TypeWord::from_bytes(word.as_ref())?;
        self.by_type_word
            .get(&word)
            .and_then(|&slot| self.modules.get(slot))
    }

    /// Registered modules, in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &ParserModule> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Whether a successful [`register_all`](Registry::register_all) is in effect.
    pub fn is_registered(&self) -> bool {
        !self.modules.is_empty()
    }
}
