use crate::errors::ModelResult;
use crate::graph::semantics::{declared_inheritors, LanguageSemantics};
use crate::model::ProjectContext;
use crate::registry::AvailabilityGate;
use crate::types::{EdgeKind, SupertypeEdge, Symbol, SymbolKind};

const LANGUAGES: &[&str] = &["java", "kotlin", "groovy", "jsp"];

/// Backend for JVM languages: classes, interfaces and enums related by
/// `extends`/`implements`.
///
/// Overrides are matched by name and parameter count, so overloads of the
/// same name on an ancestor are told apart.
#[derive(Debug)]
pub struct JvmBackend {
    gate: AvailabilityGate,
}

impl JvmBackend {
    pub fn new(gate: AvailabilityGate) -> Self {
        Self { gate }
    }
}

impl LanguageSemantics for JvmBackend {
    fn is_type_declaration(&self, symbol: &Symbol) -> bool {
        matches!(
            symbol.kind,
            SymbolKind::Class | SymbolKind::Interface | SymbolKind::Enum
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
            .filter(|e| matches!(e.kind, EdgeKind::Extends | EdgeKind::Implements))
            .collect())
    }

    fn direct_subtypes(
        &self,
        ctx: &ProjectContext,
        ty: &Symbol,
        limit: usize,
    ) -> ModelResult<Vec<Symbol>> {
        declared_inheritors(self, ctx, ty, limit)
    }

    fn overrides(&self, ancestor: &Symbol, method: &Symbol) -> bool {
        if ancestor.kind != SymbolKind::Method
            || method.kind != SymbolKind::Method
            || ancestor.name != method.name
        {
            return false;
        }
        match (
            ancestor.signature.as_deref().and_then(parameter_count),
            method.signature.as_deref().and_then(parameter_count),
        ) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    fn callable_key(&self, ctx: &ProjectContext, callable: &Symbol) -> String {
        let owner = callable
            .container
            .as_ref()
            .and_then(|c| ctx.symbol(c))
            .map(|o| o.qualified_name.unwrap_or(o.name));
        let base = match (&callable.qualified_name, owner) {
            (Some(qn), _) => qn.clone(),
            (None, Some(owner)) => format!("{}.{}", owner, callable.name),
            (None, None) => callable.name.clone(),
        };
        // Overloads share a name; the parameter list tells them apart.
        match callable.signature.as_deref().and_then(|s| s.find('(').map(|i| &s[i..])) {
            Some(params) => format!("{base}{params}"),
            None => base,
        }
    }
}

language_backend!(JvmBackend, "jvm", LANGUAGES);

/// Counts the parameters in the first parenthesised list of a signature.
///
/// Commas nested in generics, arrays of generics or annotations arguments do
/// not count. Returns `None` when the signature has no parameter list.
pub fn parameter_count(signature: &str) -> Option<usize> {
    let open = signature.find('(')?;
    let mut depth = 0usize;
    let mut count = 0usize;
    let mut saw_token = false;

    for c in signature[open + 1..].chars() {
        match c {
            '(' | '<' | '[' | '{' => {
                depth += 1;
                saw_token = true;
            }
            ')' if depth == 0 => return Some(if saw_token { count + 1 } else { 0 }),
            ')' | '>' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => count += 1,
            c if !c.is_whitespace() => saw_token = true,
            _ => {}
        }
    }
    None
}
