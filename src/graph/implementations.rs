use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::graph::semantics::{overriding_member, LanguageSemantics};
use crate::model::ProjectContext;
use crate::types::{ElementReference, Symbol, SymbolKind};

/// Finds transitive inheritors of a type, or the overriding members of a method.
pub struct ImplementationFinder<'a, S: ?Sized> {
    sem: &'a S,
    ctx: &'a ProjectContext,
}

impl<'a, S: LanguageSemantics + ?Sized> ImplementationFinder<'a, S> {
    pub fn new(sem: &'a S, ctx: &'a ProjectContext) -> Self {
        Self { sem, ctx }
    }

    pub fn find(&self, element: &Symbol) -> Option<Vec<ElementReference>> {
        if self.sem.is_type_declaration(element) {
            let found = self.inheritors(element, self.ctx.limits.max_implementations);
            return Some(found.iter().map(ElementReference::from).collect());
        }

        if element.kind != SymbolKind::Method {
            trace!(element = %element.name, "neither a type nor a method");
            return None;
        }

        let Some(owner) = self.sem.owner_type(self.ctx, element) else {
            return Some(Vec::new());
        };
        let limit = self.ctx.limits.max_implementations;
        let mut out = Vec::new();
        for sub in self.inheritors(&owner, limit) {
            if let Some(member) = overriding_member(self.sem, self.ctx, &sub, element) {
                out.push(ElementReference::from(&member));
                if out.len() >= limit {
                    break;
                }
            }
        }
        Some(out)
    }

    /// Breadth-first closure of subtypes below `root`, at most `limit`.
    pub fn inheritors(&self, root: &Symbol, limit: usize) -> Vec<Symbol> {
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(ElementReference::from(root).identity());

        let mut queue: VecDeque<Symbol> = VecDeque::new();
        queue.push_back(root.clone());
        let mut out = Vec::new();

        while let Some(ty) = queue.pop_front() {
            let subtypes = match self.sem.direct_subtypes(self.ctx, &ty, limit) {
                Ok(subtypes) => subtypes,
                Err(err) => {
                    debug!(element = %ty.name, error = %err, "subtype lookup failed");
                    continue;
                }
            };
            for sub in subtypes {
                if !visited.insert(ElementReference::from(&sub).identity()) {
                    continue;
                }
                out.push(sub.clone());
                if out.len() >= limit {
                    return out;
                }
                queue.push_back(sub);
            }
        }
        out
    }
}
