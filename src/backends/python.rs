use std::collections::HashSet;

use tracing::trace;

use crate::errors::ModelResult;
use crate::graph::semantics::{declared_inheritors, members_of, LanguageSemantics};
use crate::model::ProjectContext;
use crate::registry::AvailabilityGate;
use crate::types::{EdgeKind, SupertypeEdge, Symbol, SymbolKind};

const LANGUAGES: &[&str] = &["python", "cython"];

/// Base classes that mark a class as an interface-like declaration.
const PROTOCOL_BASES: &[&str] = &["Protocol", "ABC"];

/// Backend for Python classes.
///
/// The implicit `object` base is dropped from every hierarchy. Protocol
/// classes with no declared subclasses fall back to a structural scan for
/// classes defining all of the protocol's methods.
#[derive(Debug)]
pub struct PythonBackend {
    gate: AvailabilityGate,
}

impl PythonBackend {
    pub fn new(gate: AvailabilityGate) -> Self {
        Self { gate }
    }

    fn is_protocol(&self, ctx: &ProjectContext, ty: &Symbol) -> bool {
        let Ok(edges) = ctx.model.supertypes(&ty.id) else {
            return false;
        };
        edges
            .iter()
            .filter_map(|e| ctx.symbol(&e.target))
            .any(|base| PROTOCOL_BASES.contains(&base.name.as_str()))
    }

    /// Public method names of `ty`; dunder methods are ignored.
    fn protocol_methods(&self, ctx: &ProjectContext, ty: &Symbol) -> HashSet<String> {
        members_of(ctx, ty)
            .into_iter()
            .filter(|m| m.kind == SymbolKind::Method && !is_dunder(&m.name))
            .map(|m| m.name)
            .collect()
    }

    fn structural_subtypes(
        &self,
        ctx: &ProjectContext,
        ty: &Symbol,
        limit: usize,
    ) -> Vec<Symbol> {
        let required = self.protocol_methods(ctx, ty);
        if required.is_empty() {
            return Vec::new();
        }

        ctx.model
            .symbols(false)
            .iter()
            .filter(|id| **id != ty.id)
            .filter_map(|id| ctx.symbol(id))
            .filter(|c| c.kind == SymbolKind::Class)
            .filter(|c| LANGUAGES.contains(&c.language.as_str()))
            .filter(|c| !self.is_protocol(ctx, c))
            .filter(|c| {
                let defined: HashSet<String> = members_of(ctx, c)
                    .into_iter()
                    .filter(|m| m.kind == SymbolKind::Method)
                    .map(|m| m.name)
                    .collect();
                required.is_subset(&defined)
            })
            .take(limit)
            .collect()
    }
}

impl LanguageSemantics for PythonBackend {
    fn is_type_declaration(&self, symbol: &Symbol) -> bool {
        matches!(symbol.kind, SymbolKind::Class | SymbolKind::Interface)
    }

    fn supertype_edges(
        &self,
        ctx: &ProjectContext,
        ty: &Symbol,
    ) -> ModelResult<Vec<SupertypeEdge>> {
        Ok(ctx
            .model
            .supertypes(&ty.id)?
            .into_iter()
            .filter(|e| e.kind == EdgeKind::Extends)
            .filter(|e| match ctx.symbol(&e.target) {
                Some(base) => !is_object(&base),
                None => true,
            })
            .collect())
    }

    fn direct_subtypes(
        &self,
        ctx: &ProjectContext,
        ty: &Symbol,
        limit: usize,
    ) -> ModelResult<Vec<Symbol>> {
        let declared = declared_inheritors(self, ctx, ty, limit)?;
        if declared.is_empty() && self.is_protocol(ctx, ty) {
            trace!(element = %ty.name, "protocol without subclasses, scanning structurally");
            return Ok(self.structural_subtypes(ctx, ty, limit));
        }
        Ok(declared)
    }

    fn is_interface(&self, ctx: &ProjectContext, ty: &Symbol) -> bool {
        ty.kind == SymbolKind::Interface || self.is_protocol(ctx, ty)
    }
}

language_backend!(PythonBackend, "python", LANGUAGES);

fn is_object(base: &Symbol) -> bool {
    match base.qualified_name.as_deref() {
        Some(qn) => qn == "builtins.object" || qn == "object",
        None => base.name == "object",
    }
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}
