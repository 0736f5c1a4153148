use std::collections::HashSet;

use tracing::{debug, trace};

use crate::graph::semantics::LanguageSemantics;
use crate::model::ProjectContext;
use crate::types::{ElementReference, Symbol, TypeNode};

/// Builds supertype trees and subtype lists for one language.
pub struct TypeHierarchyBuilder<'a, S: ?Sized> {
    sem: &'a S,
    ctx: &'a ProjectContext,
}

impl<'a, S: LanguageSemantics + ?Sized> TypeHierarchyBuilder<'a, S> {
    pub fn new(sem: &'a S, ctx: &'a ProjectContext) -> Self {
        Self { sem, ctx }
    }

    /// Returns the full supertype tree of `root` plus its direct subtypes, or
    /// `None` when `root` is not a type declaration.
    ///
    /// A type reachable along several paths appears once, under the first
    /// path that reached it.
    pub fn build(&self, root: &Symbol) -> Option<TypeNode> {
        if !self.sem.is_type_declaration(root) {
            trace!(element = %root.name, "not a type declaration");
            return None;
        }

        let element = ElementReference::from(root);
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(element.identity());

        let supertypes = self.ascend(root, 1, &mut visited);
        let subtypes = self.subtypes(root);

        Some(TypeNode {
            element,
            supertypes,
            subtypes: Some(subtypes),
        })
    }

    /// Direct subtypes of `root`, deduplicated and capped at `max_subtypes`.
    pub fn subtypes(&self, root: &Symbol) -> Vec<ElementReference> {
        let limit = self.ctx.limits.max_subtypes;
        let found = match self.sem.direct_subtypes(self.ctx, root, limit) {
            Ok(found) => found,
            Err(err) => {
                debug!(element = %root.name, error = %err, "subtype lookup failed");
                return Vec::new();
            }
        };

        let root_identity = ElementReference::from(root).identity();
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(root_identity);

        found
            .iter()
            .map(ElementReference::from)
            .filter(|r| seen.insert(r.identity()))
            .take(limit)
            .collect()
    }

    fn ascend(&self, ty: &Symbol, depth: usize, visited: &mut HashSet<String>) -> Vec<TypeNode> {
        if depth > self.ctx.limits.max_type_depth {
            debug!(element = %ty.name, depth, "type depth limit reached");
            return Vec::new();
        }

        let edges = match self.sem.supertype_edges(self.ctx, ty) {
            Ok(edges) => edges,
            Err(err) => {
                debug!(element = %ty.name, error = %err, "supertype lookup failed");
                return Vec::new();
            }
        };

        let mut nodes = Vec::with_capacity(edges.len());
        for edge in edges {
            let Some(parent) = self.ctx.symbol(&edge.target) else {
                debug!(element = %ty.name, target = %edge.target, "supertype did not resolve");
                continue;
            };
            let element = ElementReference::from(&parent);
            if !visited.insert(element.identity()) {
                trace!(element = %parent.name, "already in hierarchy");
                continue;
            }
            let supertypes = self.ascend(&parent, depth + 1, visited);
            nodes.push(TypeNode {
                element,
                supertypes,
                subtypes: None,
            });
        }
        nodes
    }
}
