use std::collections::HashSet;

use tracing::{debug, trace};

use crate::graph::semantics::{overridden_member, LanguageSemantics};
use crate::model::ProjectContext;
use crate::types::{SuperMethodEntry, Symbol, SymbolKind};

/// An ancestor method together with the type declaring it.
#[derive(Debug, Clone)]
pub struct AncestorMethod {
    pub method: Symbol,
    pub owner: Symbol,
    /// 1 for the nearest override, +1 per further override.
    pub depth: u32,
}

/// Walks supertypes upward collecting the methods a method overrides.
pub struct SuperMethodResolver<'a, S: ?Sized> {
    sem: &'a S,
    ctx: &'a ProjectContext,
}

impl<'a, S: LanguageSemantics + ?Sized> SuperMethodResolver<'a, S> {
    pub fn new(sem: &'a S, ctx: &'a ProjectContext) -> Self {
        Self { sem, ctx }
    }

    /// Every ancestor method `method` overrides or implements, nearest first.
    ///
    /// Returns `None` for anything that is not a method. A method with no
    /// owning type yields an empty list.
    pub fn resolve(&self, method: &Symbol) -> Option<Vec<SuperMethodEntry>> {
        if method.kind != SymbolKind::Method {
            trace!(element = %method.name, "not a method");
            return None;
        }

        let mut chain = self.ancestors(method, usize::MAX);
        chain.sort_by_key(|a| a.depth);
        Some(chain.into_iter().map(|a| self.entry(a)).collect())
    }

    /// Ancestor methods of `method`, at most `limit`, in discovery order.
    ///
    /// Ancestors that declare no matching member are passed through without
    /// consuming a depth level.
    pub fn ancestors(&self, method: &Symbol, limit: usize) -> Vec<AncestorMethod> {
        let Some(owner) = self.sem.owner_type(self.ctx, method) else {
            trace!(element = %method.name, "method has no owning type");
            return Vec::new();
        };

        let mut visited: HashSet<String> = HashSet::new();
        let mut out = Vec::new();
        self.climb(&owner, method, 1, 1, limit, &mut visited, &mut out);
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn climb(
        &self,
        ty: &Symbol,
        method: &Symbol,
        depth: u32,
        level: usize,
        limit: usize,
        visited: &mut HashSet<String>,
        out: &mut Vec<AncestorMethod>,
    ) {
        if out.len() >= limit {
            return;
        }
        if level > self.ctx.limits.max_type_depth {
            debug!(element = %method.name, "ancestor walk depth limit reached");
            return;
        }

        let edges = match self.sem.supertype_edges(self.ctx, ty) {
            Ok(edges) => edges,
            Err(err) => {
                debug!(element = %ty.name, error = %err, "supertype lookup failed");
                return;
            }
        };

        for edge in edges {
            if out.len() >= limit {
                return;
            }
            let Some(parent) = self.ctx.symbol(&edge.target) else {
                continue;
            };
            let key = format!("{}.{}", self.sem.type_key(&parent), method.name);
            if !visited.insert(key) {
                continue;
            }

            match overridden_member(self.sem, self.ctx, &parent, method) {
                Some(ancestor) => {
                    out.push(AncestorMethod {
                        method: ancestor.clone(),
                        owner: parent.clone(),
                        depth,
                    });
                    self.climb(&parent, &ancestor, depth + 1, level + 1, limit, visited, out);
                }
                None => self.climb(&parent, method, depth, level + 1, limit, visited, out),
            }
        }
    }

    fn entry(&self, ancestor: AncestorMethod) -> SuperMethodEntry {
        let AncestorMethod {
            method,
            owner,
            depth,
        } = ancestor;
        SuperMethodEntry {
            signature: method.signature.clone().unwrap_or_else(|| method.name.clone()),
            containing_class: owner.qualified_name.clone().unwrap_or_else(|| owner.name.clone()),
            containing_class_kind: owner.kind,
            is_interface: self.sem.is_interface(self.ctx, &owner),
            file: method.file,
            line: method.start_line,
            depth,
            language: method.language,
            name: method.name,
        }
    }
}
