use crate::errors::ModelResult;
use crate::graph::semantics::{declared_inheritors, LanguageSemantics};
use crate::model::ProjectContext;
use crate::registry::AvailabilityGate;
use crate::types::{EdgeKind, SupertypeEdge, Symbol, SymbolKind};

const LANGUAGES: &[&str] = &[
    "typescript",
    "javascript",
    "typescriptreact",
    "javascriptreact",
];

/// Backend for TypeScript and JavaScript classes and interfaces.
#[derive(Debug)]
pub struct TypeScriptBackend {
    gate: AvailabilityGate,
}

impl TypeScriptBackend {
    pub fn new(gate: AvailabilityGate) -> Self {
        Self { gate }
    }
}

impl LanguageSemantics for TypeScriptBackend {
    fn is_type_declaration(&self, symbol: &Symbol) -> bool {
        matches!(
            symbol.kind,
            SymbolKind::Class | SymbolKind::Interface | SymbolKind::TypeAlias | SymbolKind::Enum
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

    // Interface members may be declared as properties holding functions.
    fn overrides(&self, ancestor: &Symbol, method: &Symbol) -> bool {
        matches!(ancestor.kind, SymbolKind::Method | SymbolKind::Field)
            && method.kind == SymbolKind::Method
            && ancestor.name == method.name
    }
}

language_backend!(TypeScriptBackend, "typescript", LANGUAGES);
