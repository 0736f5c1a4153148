use tracing::debug;

use crate::errors::ModelResult;
use crate::model::ProjectContext;
use crate::types::{SupertypeEdge, Symbol, SymbolKind};

/// Kinds searched for when mapping a reference back to its enclosing callable.
pub const CALLABLE_KINDS: &[SymbolKind] =
    &[SymbolKind::Function, SymbolKind::Method, SymbolKind::Constructor];

/// Per-language primitives the shared traversals are written against.
///
/// A backend answers "what counts as a type", "which edges lead up", "which
/// types lead down" and "does this member override that one"; the walkers in
/// this module tree do the rest.
pub trait LanguageSemantics: Send + Sync {
    /// Whether `symbol` can root a type hierarchy.
    fn is_type_declaration(&self, symbol: &Symbol) -> bool {
        symbol.kind.is_type()
    }

    /// Whether `symbol` can root a call hierarchy.
    fn is_callable(&self, symbol: &Symbol) -> bool {
        symbol.kind.is_callable()
    }

    /// Direct supertype edges this language recognises, in declaration order.
    fn supertype_edges(&self, ctx: &ProjectContext, ty: &Symbol)
        -> ModelResult<Vec<SupertypeEdge>>;

    /// Direct subtypes of `ty`, at most `limit` of them.
    fn direct_subtypes(
        &self,
        ctx: &ProjectContext,
        ty: &Symbol,
        limit: usize,
    ) -> ModelResult<Vec<Symbol>>;

    /// The type declaring `method`.
    fn owner_type(&self, ctx: &ProjectContext, method: &Symbol) -> Option<Symbol> {
        let owner = ctx.symbol(method.container.as_ref()?)?;
        self.is_type_declaration(&owner).then_some(owner)
    }

    /// Whether `method` overrides or implements `ancestor`, a member of one of
    /// its owner's supertypes.
    fn overrides(&self, ancestor: &Symbol, method: &Symbol) -> bool {
        ancestor.kind == SymbolKind::Method
            && method.kind == SymbolKind::Method
            && ancestor.name == method.name
    }

    /// Stable identity of a callable, used to stop call traversals revisiting it.
    fn callable_key(&self, ctx: &ProjectContext, callable: &Symbol) -> String {
        if let Some(qn) = &callable.qualified_name {
            return qn.clone();
        }
        match callable.container.as_ref().and_then(|c| ctx.symbol(c)) {
            Some(owner) => format!("{}.{}", owner.name, callable.name),
            None => callable.name.clone(),
        }
    }

    /// Stable identity of a type, used by ancestor walks.
    fn type_key(&self, ty: &Symbol) -> String {
        ty.qualified_name
            .clone()
            .unwrap_or_else(|| ty.id.as_str().to_string())
    }

    fn is_interface(&self, _ctx: &ProjectContext, ty: &Symbol) -> bool {
        ty.kind == SymbolKind::Interface
    }
}

/// Resolves the direct members of `ty` to symbols. Lookup failures yield an
/// empty list.
pub fn members_of(ctx: &ProjectContext, ty: &Symbol) -> Vec<Symbol> {
    match ctx.model.members(&ty.id) {
        Ok(ids) => ids.iter().filter_map(|id| ctx.symbol(id)).collect(),
        Err(err) => {
            debug!(ty = %ty.name, error = %err, "members lookup failed");
            Vec::new()
        }
    }
}

/// Resolves the inheritors reported by the model, keeping only those `sem`
/// treats as types.
pub fn declared_inheritors<S: LanguageSemantics + ?Sized>(
    sem: &S,
    ctx: &ProjectContext,
    ty: &Symbol,
    limit: usize,
) -> ModelResult<Vec<Symbol>> {
    Ok(ctx
        .model
        .inheritors(&ty.id)?
        .iter()
        .filter_map(|id| ctx.symbol(id))
        .filter(|s| sem.is_type_declaration(s))
        .take(limit)
        .collect())
}

/// The member of `ty` that `method` overrides, if any.
pub fn overridden_member<S: LanguageSemantics + ?Sized>(
    sem: &S,
    ctx: &ProjectContext,
    ty: &Symbol,
    method: &Symbol,
) -> Option<Symbol> {
    members_of(ctx, ty)
        .into_iter()
        .find(|m| sem.overrides(m, method))
}

/// The member of `ty` that overrides `method`, if any.
pub fn overriding_member<S: LanguageSemantics + ?Sized>(
    sem: &S,
    ctx: &ProjectContext,
    ty: &Symbol,
    method: &Symbol,
) -> Option<Symbol> {
    members_of(ctx, ty)
        .into_iter()
        .find(|m| sem.overrides(method, m))
}
