use std::collections::HashSet;

use tracing::debug;

use crate::errors::ModelResult;
use crate::graph::semantics::{members_of, LanguageSemantics};
use crate::model::ProjectContext;
use crate::registry::AvailabilityGate;
use crate::types::{EdgeKind, SupertypeEdge, Symbol, SymbolKind};

const LANGUAGES: &[&str] = &["go", "gotemplate"];

/// Embedding chains followed when collecting a promoted method set.
const MAX_EMBED_DEPTH: usize = 8;

/// Backend for Go.
///
/// Go has no declared inheritance. The supertypes of a named type are the
/// types it embeds, and its subtypes are found by scanning the project for
/// types that embed it or, for an interface, whose method set covers it.
#[derive(Debug)]
pub struct GoBackend {
    gate: AvailabilityGate,
}

impl GoBackend {
    pub fn new(gate: AvailabilityGate) -> Self {
        Self { gate }
    }

    /// Method names of `ty`, including methods promoted through embedding.
    pub fn method_set(&self, ctx: &ProjectContext, ty: &Symbol) -> HashSet<String> {
        let mut names = HashSet::new();
        let mut visited = HashSet::new();
        self.collect_methods(ctx, ty, 0, &mut visited, &mut names);
        names
    }

    fn collect_methods(
        &self,
        ctx: &ProjectContext,
        ty: &Symbol,
        depth: usize,
        visited: &mut HashSet<String>,
        names: &mut HashSet<String>,
    ) {
        if depth > MAX_EMBED_DEPTH || !visited.insert(ty.id.as_str().to_string()) {
            return;
        }
        names.extend(
            members_of(ctx, ty)
                .into_iter()
                .filter(|m| m.kind.is_callable())
                .map(|m| m.name),
        );
        let Ok(edges) = self.supertype_edges(ctx, ty) else {
            return;
        };
        for edge in edges {
            if let Some(embedded) = ctx.symbol(&edge.target) {
                self.collect_methods(ctx, &embedded, depth + 1, visited, names);
            }
        }
    }

    fn embeds(&self, ctx: &ProjectContext, candidate: &Symbol, ty: &Symbol) -> bool {
        match ctx.model.supertypes(&candidate.id) {
            Ok(edges) => edges
                .iter()
                .any(|e| e.kind == EdgeKind::Embeds && e.target == ty.id),
            Err(err) => {
                debug!(element = %candidate.name, error = %err, "embedding lookup failed");
                false
            }
        }
    }

    fn satisfies(
        &self,
        ctx: &ProjectContext,
        candidate: &Symbol,
        required: &HashSet<String>,
    ) -> bool {
        !required.is_empty() && required.is_subset(&self.method_set(ctx, candidate))
    }

    fn is_go(&self, symbol: &Symbol) -> bool {
        LANGUAGES.contains(&symbol.language.as_str())
    }
}

impl LanguageSemantics for GoBackend {
    fn is_type_declaration(&self, symbol: &Symbol) -> bool {
        matches!(
            symbol.kind,
            SymbolKind::Struct | SymbolKind::Interface | SymbolKind::TypeAlias
        )
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
            .filter(|e| e.kind == EdgeKind::Embeds)
            .filter(|e| {
                ctx.symbol(&e.target)
                    .is_some_and(|t| self.is_type_declaration(&t))
            })
            .collect())
    }

    fn direct_subtypes(
        &self,
        ctx: &ProjectContext,
        ty: &Symbol,
        limit: usize,
    ) -> ModelResult<Vec<Symbol>> {
        let required: HashSet<String> = if ty.kind == SymbolKind::Interface {
            self.method_set(ctx, ty)
        } else {
            HashSet::new()
        };

        let mut found = Vec::new();
        for id in ctx.model.symbols(false) {
            if found.len() >= limit {
                break;
            }
            if id == ty.id {
                continue;
            }
            let Some(candidate) = ctx.symbol(&id) else {
                continue;
            };
            if !self.is_go(&candidate) || !self.is_type_declaration(&candidate) {
                continue;
            }
            let structural = candidate.kind != SymbolKind::Interface
                && self.satisfies(ctx, &candidate, &required);
            if self.embeds(ctx, &candidate, ty) || structural {
                found.push(candidate);
            }
        }
        Ok(found)
    }

    fn callable_key(&self, ctx: &ProjectContext, callable: &Symbol) -> String {
        let receiver = callable
            .container
            .as_ref()
            .and_then(|c| ctx.symbol(c))
            .map(|r| r.qualified_name.unwrap_or(r.name));
        match receiver {
            Some(receiver) => format!("{}.{}", receiver, callable.name),
            None => callable
                .qualified_name
                .clone()
                .unwrap_or_else(|| callable.name.clone()),
        }
    }
}

language_backend!(GoBackend, "go", LANGUAGES);
