use std::collections::HashSet;

use tracing::{debug, trace};

use crate::graph::semantics::{LanguageSemantics, CALLABLE_KINDS};
use crate::graph::super_methods::SuperMethodResolver;
use crate::model::ProjectContext;
use crate::types::{CallDirection, CallNode, ElementReference, Symbol, SymbolKind};

/// Builds caller and callee trees for one language.
///
/// A single visited set spans the whole traversal, so each callable is
/// expanded at most once per query. Every level is capped at
/// `max_callers_per_level` entries.
pub struct CallHierarchyBuilder<'a, S: ?Sized> {
    sem: &'a S,
    ctx: &'a ProjectContext,
}

impl<'a, S: LanguageSemantics + ?Sized> CallHierarchyBuilder<'a, S> {
    pub fn new(sem: &'a S, ctx: &'a ProjectContext) -> Self {
        Self { sem, ctx }
    }

    /// Returns the call tree rooted at `root`, or `None` when `root` is not
    /// callable. `depth` is clamped to `max_call_depth`.
    pub fn build(&self, root: &Symbol, direction: CallDirection, depth: usize) -> Option<CallNode> {
        if !self.sem.is_callable(root) {
            trace!(element = %root.name, "not callable");
            return None;
        }

        let depth = depth.min(self.ctx.limits.max_call_depth);
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(self.sem.callable_key(self.ctx, root));

        let children = match direction {
            CallDirection::Callers => self.callers(root, depth, &mut visited),
            CallDirection::Callees => self.callees(root, depth, &mut visited),
        };

        Some(CallNode {
            element: ElementReference::from(root),
            children,
        })
    }

    /// `method` plus the ancestor methods it overrides, so callers that go
    /// through a supertype are found too.
    pub fn caller_search_set(&self, method: &Symbol) -> Vec<Symbol> {
        let mut set = vec![method.clone()];
        if method.kind == SymbolKind::Method {
            let limit = self.ctx.limits.max_ancestor_methods;
            set.extend(
                SuperMethodResolver::new(self.sem, self.ctx)
                    .ancestors(method, limit)
                    .into_iter()
                    .map(|a| a.method),
            );
        }
        set
    }

    fn callers(
        &self,
        callable: &Symbol,
        remaining: usize,
        visited: &mut HashSet<String>,
    ) -> Vec<CallNode> {
        if remaining == 0 {
            return Vec::new();
        }

        let cap = self.ctx.limits.max_callers_per_level;
        let search_set = self.caller_search_set(callable);
        let search_keys: HashSet<String> = search_set
            .iter()
            .map(|s| self.sem.callable_key(self.ctx, s))
            .collect();

        let mut seen: HashSet<(String, Option<String>, Option<u32>)> = HashSet::new();
        let mut found: Vec<Symbol> = Vec::new();

        'targets: for target in &search_set {
            let references = match self.ctx.model.references(&target.id) {
                Ok(refs) => refs,
                Err(err) => {
                    debug!(element = %target.name, error = %err, "reference search failed");
                    continue;
                }
            };

            for reference in references {
                let enclosing = match self
                    .ctx
                    .model
                    .containing_declaration(&reference.location, CALLABLE_KINDS)
                {
                    Ok(Some(id)) => id,
                    Ok(None) => {
                        trace!(file = %reference.location.file, line = reference.location.line, "reference outside any callable");
                        continue;
                    }
                    Err(err) => {
                        debug!(error = %err, "enclosing callable lookup failed");
                        continue;
                    }
                };
                let Some(caller) = self.ctx.symbol(&enclosing) else {
                    continue;
                };
                if search_keys.contains(&self.sem.callable_key(self.ctx, &caller)) {
                    continue;
                }
                if !seen.insert((caller.name.clone(), caller.file.clone(), caller.start_line)) {
                    continue;
                }
                if !visited.insert(self.sem.callable_key(self.ctx, &caller)) {
                    continue;
                }
                found.push(caller);
                if found.len() >= cap {
                    break 'targets;
                }
            }
        }

        // The whole level is claimed before descending, so a sibling is
        // listed here rather than under another sibling's subtree.
        let mut nodes = Vec::with_capacity(found.len());
        for caller in found {
            let children = self.callers(&caller, remaining - 1, visited);
            nodes.push(CallNode {
                element: ElementReference::from(&caller),
                children,
            });
        }
        nodes
    }

    fn callees(
        &self,
        callable: &Symbol,
        remaining: usize,
        visited: &mut HashSet<String>,
    ) -> Vec<CallNode> {
        if remaining == 0 {
            return Vec::new();
        }

        let sites = match self.ctx.model.call_expressions(&callable.id) {
            Ok(sites) => sites,
            Err(err) => {
                debug!(element = %callable.name, error = %err, "call expression lookup failed");
                return Vec::new();
            }
        };

        let cap = self.ctx.limits.max_callers_per_level;
        let mut seen: HashSet<(String, Option<String>)> = HashSet::new();
        let mut found: Vec<Symbol> = Vec::new();

        for site in sites {
            let target_id = match self.ctx.model.resolve_call(&site) {
                Ok(Some(id)) => id,
                Ok(None) => {
                    trace!(callee = %site.callee_name, "call did not resolve");
                    continue;
                }
                Err(err) => {
                    debug!(callee = %site.callee_name, error = %err, "call resolution failed");
                    continue;
                }
            };
            let Some(target) = self.ctx.symbol(&target_id) else {
                continue;
            };
            if !self.sem.is_callable(&target) {
                continue;
            }
            if !seen.insert((target.name.clone(), target.file.clone())) {
                continue;
            }
            if !visited.insert(self.sem.callable_key(self.ctx, &target)) {
                continue;
            }
            found.push(target);
            if found.len() >= cap {
                break;
            }
        }

        // The whole level is claimed before descending, so a sibling is
        // listed here rather than under another sibling's subtree.
        let mut nodes = Vec::with_capacity(found.len());
        for target in found {
            let children = self.callees(&target, remaining - 1, visited);
            nodes.push(CallNode {
                element: ElementReference::from(&target),
                children,
            });
        }
        nodes
    }
}
