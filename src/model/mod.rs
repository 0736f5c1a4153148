//! Boundary to the host's source-analysis engine.
//!
//! Parsing, indexing, and identifier resolution all live on the other side of
//! [`CodeModel`]. Backends only ever talk to the host through this trait, so a
//! host integration is one `impl CodeModel` away.

/// In-memory code model backed by a JSON snapshot.
pub mod snapshot;

pub use snapshot::SnapshotModel;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{family_chain, TraversalLimits};
use crate::errors::ModelResult;
use crate::types::{CallSite, ElementId, Location, Reference, SupertypeEdge, Symbol, SymbolKind};

/// The project a request runs against: the host model plus traversal bounds.
#[derive(Clone)]
pub struct ProjectContext {
    pub model: Arc<dyn CodeModel>,
    pub limits: TraversalLimits,
    /// Dialect -> base language, as configured.
    pub families: BTreeMap<String, String>,
}

impl ProjectContext {
    pub fn new(model: Arc<dyn CodeModel>, limits: TraversalLimits) -> Self {
        Self {
            model,
            limits,
            families: BTreeMap::new(),
        }
    }

    pub fn with_families(mut self, families: BTreeMap<String, String>) -> Self {
        self.families = families;
        self
    }

    /// Base languages of `language`, nearest first.
    pub fn family_chain(&self, language: &str) -> Vec<&str> {
        family_chain(&self.families, language)
    }

    pub fn symbol(&self, id: &ElementId) -> Option<Symbol> {
        self.model.symbol(id)
    }
}

/// Semantic facts supplied by the host.
///
/// Lookups that can fail per element return [`ModelResult`]; callers inside
/// traversals drop the failed branch and keep going.
pub trait CodeModel: Send + Sync {
    /// Whether the host has finished indexing. Checked by the request layer
    /// before any backend runs; backends never call it.
    fn is_ready(&self) -> bool;

    /// Whether semantic support for `language` is installed and enabled.
    fn language_enabled(&self, language: &str) -> ModelResult<bool>;

    /// Looks up a symbol by handle.
    fn symbol(&self, id: &ElementId) -> Option<Symbol>;

    /// Resolves the declaration at a source position.
    fn element_at(&self, location: &Location) -> Option<ElementId>;

    /// Finds the innermost declaration of one of `kinds` enclosing `location`.
    fn containing_declaration(
        &self,
        location: &Location,
        kinds: &[SymbolKind],
    ) -> ModelResult<Option<ElementId>>;

    /// Direct supertypes of a type, including embedded types.
    fn supertypes(&self, type_id: &ElementId) -> ModelResult<Vec<SupertypeEdge>>;

    /// Types that directly declare `type_id` as a supertype.
    fn inheritors(&self, type_id: &ElementId) -> ModelResult<Vec<ElementId>>;

    /// All usages of an element.
    fn references(&self, element: &ElementId) -> ModelResult<Vec<Reference>>;

    /// Call expressions inside a callable's body, in source order.
    fn call_expressions(&self, callable: &ElementId) -> ModelResult<Vec<CallSite>>;

    /// Resolves a call expression to the callable it targets.
    fn resolve_call(&self, site: &CallSite) -> ModelResult<Option<ElementId>>;

    /// Direct members declared by a type.
    fn members(&self, type_id: &ElementId) -> ModelResult<Vec<ElementId>>;

    /// Every symbol the host can enumerate, optionally including libraries.
    fn symbols(&self, include_libraries: bool) -> Vec<ElementId>;
}
