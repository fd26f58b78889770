//! Dictionary registry.
//!
//! The registry is an explicit value, usually shared behind an `Arc`, that
//! discovers engine providers once and then answers lookups. Discovery walks
//! the provider table given at construction (for the binary, the engines
//! compiled into this crate) and registers each provider under a name derived
//! from its identity.
//!
//! # Lifecycle
//!
//! - Discovery runs lazily on the first lookup or listing, at most once even
//!   when several threads race to trigger it.
//! - Discovery is skipped when dictionaries were registered explicitly before
//!   it ran.
//! - The first dictionary ever registered is the default one.

use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, info, warn};
use parking_lot::{Once, RwLock};

use crate::dictionary::schema::FeatureSchema;
use crate::dictionary::{Dictionary, derive_name};
use crate::engine::{EngineProvider, builtin_providers};
use crate::error::{PolydictError, Result};

#[derive(Default)]
struct RegistryState {
    dictionaries: AHashMap<String, Arc<Dictionary>>,
    /// Names in first-registration order.
    names: Vec<String>,
    default: Option<Arc<Dictionary>>,
}

/// Registry of all known dictionaries.
pub struct DictionaryRegistry {
    providers: Vec<Arc<dyn EngineProvider>>,
    discovery: Once,
    state: RwLock<RegistryState>,
}

impl DictionaryRegistry {
    /// Create a registry that discovers the given providers on first use.
    pub fn new(providers: Vec<Arc<dyn EngineProvider>>) -> Self {
        DictionaryRegistry {
            providers,
            discovery: Once::new(),
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Create a registry over the engines compiled into this crate.
    pub fn with_builtin_engines() -> Self {
        Self::new(builtin_providers())
    }

    /// Create a registry with nothing to discover.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Register every known provider, unless the registry is already populated.
    ///
    /// Idempotent: calls after the first one are no-ops.
    pub fn discover(&self) {
        self.discovery.call_once(|| {
            let populated = !self.state.read().dictionaries.is_empty();
            if populated {
                debug!("Skipping engine discovery, registry already populated");
                return;
            }

            for provider in &self.providers {
                self.register_provider(Arc::clone(provider));
            }
            debug!("Discovered {} engine(s)", self.providers.len());
        });
    }

    /// Register a provider under a name derived from its identity.
    pub fn register_provider(&self, provider: Arc<dyn EngineProvider>) -> Arc<Dictionary> {
        let name = derive_name(provider.identity());
        self.register(name, provider)
    }

    /// Register a provider under `name`.
    ///
    /// A later registration under the same name replaces the earlier one but
    /// keeps its place in [`names`](Self::names). The first dictionary ever
    /// registered stays the default.
    pub fn register<S: Into<String>>(
        &self,
        name: S,
        provider: Arc<dyn EngineProvider>,
    ) -> Arc<Dictionary> {
        let name = name.into();
        let schema = extract_schema(&name, provider.as_ref());
        let identity = provider.identity().to_string();
        let dictionary = Arc::new(Dictionary::new(name.clone(), provider, schema));

        {
            let mut state = self.state.write();
            if state
                .dictionaries
                .insert(name.clone(), Arc::clone(&dictionary))
                .is_none()
            {
                state.names.push(name.clone());
            }
            if state.default.is_none() {
                state.default = Some(Arc::clone(&dictionary));
            }
        }

        info!("Registered {name}: {identity}");
        dictionary
    }

    /// Look up a dictionary by name, or the default dictionary for `None`.
    pub fn lookup(&self, name: Option<&str>) -> Result<Arc<Dictionary>> {
        self.discover();

        let state = self.state.read();
        match name {
            None => state
                .default
                .clone()
                .ok_or_else(PolydictError::no_dictionaries),
            Some(name) => state
                .dictionaries
                .get(name)
                .cloned()
                .ok_or_else(|| PolydictError::unknown_dictionary(name)),
        }
    }

    /// Names of all registered dictionaries, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.discover();
        self.state.read().names.clone()
    }

    /// All registered dictionaries, in registration order.
    pub fn dictionaries(&self) -> Vec<Arc<Dictionary>> {
        self.discover();
        let state = self.state.read();
        state
            .names
            .iter()
            .filter_map(|name| state.dictionaries.get(name).cloned())
            .collect()
    }

    /// The default dictionary, if any dictionary is registered.
    pub fn default_dictionary(&self) -> Option<Arc<Dictionary>> {
        self.discover();
        self.state.read().default.clone()
    }

    /// Number of registered dictionaries.
    pub fn len(&self) -> usize {
        self.discover();
        self.state.read().names.len()
    }

    /// Whether no dictionary is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DictionaryRegistry {
    fn default() -> Self {
        Self::with_builtin_engines()
    }
}

/// Best-effort schema extraction: failures leave the schema empty.
fn extract_schema(name: &str, provider: &dyn EngineProvider) -> FeatureSchema {
    match provider.feature_schema() {
        Ok(schema) => {
            for (field, index) in schema.iter() {
                debug!("Found field: {field} = {index}");
            }
            schema
        }
        Err(e) => {
            warn!(
                "Failed to extract feature schema for {name} ({}): {e}",
                provider.identity()
            );
            FeatureSchema::empty()
        }
    }
}
