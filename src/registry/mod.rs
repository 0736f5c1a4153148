//! Capability registry: maps a language id to the backend that serves it.
//!
//! There is one table per [`Capability`]. Resolution for an element tries the
//! element's own language, then its declared base language, then every
//! registered backend in registration order, and takes the first backend that
//! is available and accepts the element.

/// Memoized language-support probes.
pub mod gate;

pub use gate::AvailabilityGate;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, trace};

use crate::config::{family_chain, NavConfig};
use crate::model::ProjectContext;
use crate::types::{
    CallDirection, CallNode, ElementReference, SuperMethodEntry, Symbol, SymbolMatch, TypeNode,
};

/// A navigation capability a backend can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    TypeHierarchy,
    CallHierarchy,
    Implementations,
    SymbolSearch,
    SuperMethods,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::TypeHierarchy => "type_hierarchy",
            Capability::CallHierarchy => "call_hierarchy",
            Capability::Implementations => "implementations",
            Capability::SymbolSearch => "symbol_search",
            Capability::SuperMethods => "super_methods",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common surface of every language backend.
pub trait Backend: Send + Sync {
    /// Short name used in logs, e.g. `"jvm"`.
    fn name(&self) -> &'static str;

    /// Language ids (including dialects) this backend understands.
    fn languages(&self) -> &[&'static str];

    /// Whether the host has semantic support for this backend's language.
    fn is_available(&self) -> bool;

    /// Whether `element` is the right kind of declaration for `capability`,
    /// whatever its language.
    fn accepts(&self, capability: Capability, element: &Symbol) -> bool;

    fn understands(&self, language: &str) -> bool {
        self.languages().contains(&language)
    }

    /// Whether this backend can serve `capability` for `element` on its own
    /// account: it knows the element's language and accepts its kind.
    fn can_handle(&self, capability: Capability, element: &Symbol) -> bool {
        self.understands(&element.language) && self.accepts(capability, element)
    }
}

pub trait TypeHierarchyProvider: Backend {
    /// Supertype tree and direct subtypes of `element`, or `None` when the
    /// element is not a type declaration.
    fn type_hierarchy(&self, ctx: &ProjectContext, element: &Symbol) -> Option<TypeNode>;
}

pub trait CallHierarchyProvider: Backend {
    /// Callers or callees of `element` up to `depth` levels, or `None` when
    /// the element is not callable.
    fn call_hierarchy(
        &self,
        ctx: &ProjectContext,
        element: &Symbol,
        direction: CallDirection,
        depth: usize,
    ) -> Option<CallNode>;
}

pub trait ImplementationsProvider: Backend {
    fn implementations(
        &self,
        ctx: &ProjectContext,
        element: &Symbol,
    ) -> Option<Vec<ElementReference>>;
}

pub trait SymbolSearchProvider: Backend {
    /// Ranked matches for `pattern` among this backend's languages.
    fn search_symbols(
        &self,
        ctx: &ProjectContext,
        pattern: &str,
        include_libraries: bool,
        limit: usize,
    ) -> Vec<SymbolMatch>;
}

pub trait SuperMethodsProvider: Backend {
    fn super_methods(&self, ctx: &ProjectContext, element: &Symbol)
        -> Option<Vec<SuperMethodEntry>>;
}

struct Registration<T: ?Sized> {
    sequence: u64,
    backend: Arc<T>,
}

/// Backends registered for one capability, keyed by language id.
pub struct CapabilityTable<T: ?Sized> {
    capability: Capability,
    backends: DashMap<String, Registration<T>>,
    sequence: AtomicU64,
}

impl<T: ?Sized + Backend> CapabilityTable<T> {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            backends: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Registers `backend` for `language_id`. A later registration for the
    /// same language replaces the earlier one.
    pub fn register(&self, language_id: &str, backend: Arc<T>) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let replaced = self
            .backends
            .insert(language_id.to_string(), Registration { sequence, backend })
            .is_some();
        debug!(
            capability = %self.capability,
            language = language_id,
            replaced,
            "registered backend"
        );
    }

    /// The backend registered for exactly `language_id`, available or not.
    pub fn get(&self, language_id: &str) -> Option<Arc<T>> {
        self.backends.get(language_id).map(|r| r.backend.clone())
    }

    /// Picks the backend that should serve `element`.
    ///
    /// A backend registered for the element's language, or for one of its
    /// base languages, only has to accept the element's kind. The final scan
    /// over every backend also requires the backend to know the language.
    pub fn resolve(
        &self,
        element: &Symbol,
        families: &BTreeMap<String, String>,
    ) -> Option<Arc<T>> {
        let accepts = |b: &Arc<T>| b.is_available() && b.accepts(self.capability, element);

        if let Some(backend) = self.get(&element.language).filter(accepts) {
            trace!(capability = %self.capability, language = %element.language, "exact backend");
            return Some(backend);
        }

        for base in family_chain(families, &element.language) {
            if let Some(backend) = self.get(base).filter(accepts) {
                trace!(
                    capability = %self.capability,
                    language = %element.language,
                    base,
                    "family backend"
                );
                return Some(backend);
            }
        }

        let found = self
            .ordered()
            .into_iter()
            .find(|b| b.is_available() && b.can_handle(self.capability, element));
        if found.is_none() {
            debug!(
                capability = %self.capability,
                language = %element.language,
                "no backend accepts element"
            );
        }
        found
    }

    /// Every available backend, once each, in registration order.
    pub fn all_available(&self) -> Vec<Arc<T>> {
        let mut seen: HashSet<*const u8> = HashSet::new();
        self.ordered()
            .into_iter()
            .filter(|b| b.is_available())
            .filter(|b| seen.insert(Arc::as_ptr(b).cast::<u8>()))
            .collect()
    }

    /// Registered language ids in registration order.
    pub fn languages(&self) -> Vec<String> {
        let mut entries: Vec<(u64, String)> = self
            .backends
            .iter()
            .map(|e| (e.value().sequence, e.key().clone()))
            .collect();
        entries.sort();
        entries.into_iter().map(|(_, lang)| lang).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    fn ordered(&self) -> Vec<Arc<T>> {
        let mut entries: Vec<(u64, Arc<T>)> = self
            .backends
            .iter()
            .map(|e| (e.value().sequence, e.value().backend.clone()))
            .collect();
        entries.sort_by_key(|(sequence, _)| *sequence);
        entries.into_iter().map(|(_, b)| b).collect()
    }
}

/// Per-capability backend tables plus the dialect family map.
pub struct Registry {
    families: BTreeMap<String, String>,
    type_hierarchy: CapabilityTable<dyn TypeHierarchyProvider>,
    call_hierarchy: CapabilityTable<dyn CallHierarchyProvider>,
    implementations: CapabilityTable<dyn ImplementationsProvider>,
    symbol_search: CapabilityTable<dyn SymbolSearchProvider>,
    super_methods: CapabilityTable<dyn SuperMethodsProvider>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

impl Registry {
    pub fn new(families: BTreeMap<String, String>) -> Self {
        Self {
            families,
            type_hierarchy: CapabilityTable::new(Capability::TypeHierarchy),
            call_hierarchy: CapabilityTable::new(Capability::CallHierarchy),
            implementations: CapabilityTable::new(Capability::Implementations),
            symbol_search: CapabilityTable::new(Capability::SymbolSearch),
            super_methods: CapabilityTable::new(Capability::SuperMethods),
        }
    }

    pub fn from_config(config: &NavConfig) -> Self {
        Self::new(config.language_families.clone())
    }

    pub fn families(&self) -> &BTreeMap<String, String> {
        &self.families
    }

    pub fn type_hierarchy(&self) -> &CapabilityTable<dyn TypeHierarchyProvider> {
        &self.type_hierarchy
    }

    pub fn call_hierarchy(&self) -> &CapabilityTable<dyn CallHierarchyProvider> {
        &self.call_hierarchy
    }

    pub fn implementations(&self) -> &CapabilityTable<dyn ImplementationsProvider> {
        &self.implementations
    }

    pub fn symbol_search(&self) -> &CapabilityTable<dyn SymbolSearchProvider> {
        &self.symbol_search
    }

    pub fn super_methods(&self) -> &CapabilityTable<dyn SuperMethodsProvider> {
        &self.super_methods
    }

    pub fn resolve_type_hierarchy(
        &self,
        element: &Symbol,
    ) -> Option<Arc<dyn TypeHierarchyProvider>> {
        self.type_hierarchy.resolve(element, &self.families)
    }

    pub fn resolve_call_hierarchy(
        &self,
        element: &Symbol,
    ) -> Option<Arc<dyn CallHierarchyProvider>> {
        self.call_hierarchy.resolve(element, &self.families)
    }

    pub fn resolve_implementations(
        &self,
        element: &Symbol,
    ) -> Option<Arc<dyn ImplementationsProvider>> {
        self.implementations.resolve(element, &self.families)
    }

    pub fn resolve_super_methods(
        &self,
        element: &Symbol,
    ) -> Option<Arc<dyn SuperMethodsProvider>> {
        self.super_methods.resolve(element, &self.families)
    }

    /// Registers a backend that provides every capability under `language_id`.
    pub fn register_backend<B>(&self, language_id: &str, backend: Arc<B>)
    where
        B: TypeHierarchyProvider
            + CallHierarchyProvider
            + ImplementationsProvider
            + SymbolSearchProvider
            + SuperMethodsProvider
            + 'static,
    {
        self.type_hierarchy.register(language_id, backend.clone());
        self.call_hierarchy.register(language_id, backend.clone());
        self.implementations.register(language_id, backend.clone());
        self.symbol_search.register(language_id, backend.clone());
        self.super_methods.register(language_id, backend);
        info!(language = language_id, "backend registered for all capabilities");
    }

    /// Registers `backend` under `language_id` only if its availability
    /// gate passes. Returns whether it was registered.
    pub fn register_available<B>(&self, language_id: &str, backend: Arc<B>) -> bool
    where
        B: TypeHierarchyProvider
            + CallHierarchyProvider
            + ImplementationsProvider
            + SymbolSearchProvider
            + SuperMethodsProvider
            + 'static,
    {
        if !backend.is_available() {
            info!(
                language = language_id,
                backend = backend.name(),
                "backend unavailable, not registered"
            );
            return false;
        }
        self.register_backend(language_id, backend);
        true
    }

    /// Languages with at least one registered capability.
    pub fn registered_languages(&self) -> Vec<String> {
        let mut languages = self.type_hierarchy.languages();
        for lang in self
            .call_hierarchy
            .languages()
            .into_iter()
            .chain(self.implementations.languages())
            .chain(self.symbol_search.languages())
            .chain(self.super_methods.languages())
        {
            if !languages.contains(&lang) {
                languages.push(lang);
            }
        }
        languages
    }
}
