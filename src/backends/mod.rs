//! Built-in language backends.
//!
//! Each backend supplies [`LanguageSemantics`] for its language family and
//! gets the five navigation capabilities from the shared walkers in
//! [`crate::graph`] via `language_backend!`.

use std::sync::Arc;

use tracing::info;

use crate::config::NavConfig;
use crate::graph::LanguageSemantics;
use crate::model::CodeModel;
use crate::registry::{AvailabilityGate, Capability, Registry};
use crate::types::{Symbol, SymbolKind};

/// Implements `Backend` and every capability trait for a type that has a
/// `gate: AvailabilityGate` field and implements `LanguageSemantics`.
macro_rules! language_backend {
    ($backend:ty, $name:literal, $languages:expr) => {
        impl $crate::registry::Backend for $backend {
            fn name(&self) -> &'static str {
                $name
            }

            fn languages(&self) -> &[&'static str] {
                $languages
            }

            fn is_available(&self) -> bool {
                self.gate.is_available()
            }

            fn accepts(
                &self,
                capability: $crate::registry::Capability,
                element: &$crate::types::Symbol,
            ) -> bool {
                $crate::backends::accepts(self, capability, element)
            }
        }

        impl $crate::registry::TypeHierarchyProvider for $backend {
            fn type_hierarchy(
                &self,
                ctx: &$crate::model::ProjectContext,
                element: &$crate::types::Symbol,
            ) -> Option<$crate::types::TypeNode> {
                $crate::graph::TypeHierarchyBuilder::new(self, ctx).build(element)
            }
        }

        impl $crate::registry::CallHierarchyProvider for $backend {
            fn call_hierarchy(
                &self,
                ctx: &$crate::model::ProjectContext,
                element: &$crate::types::Symbol,
                direction: $crate::types::CallDirection,
                depth: usize,
            ) -> Option<$crate::types::CallNode> {
                $crate::graph::CallHierarchyBuilder::new(self, ctx).build(element, direction, depth)
            }
        }

        impl $crate::registry::ImplementationsProvider for $backend {
            fn implementations(
                &self,
                ctx: &$crate::model::ProjectContext,
                element: &$crate::types::Symbol,
            ) -> Option<Vec<$crate::types::ElementReference>> {
                $crate::graph::ImplementationFinder::new(self, ctx).find(element)
            }
        }

        impl $crate::registry::SymbolSearchProvider for $backend {
            fn search_symbols(
                &self,
                ctx: &$crate::model::ProjectContext,
                pattern: &str,
                include_libraries: bool,
                limit: usize,
            ) -> Vec<$crate::types::SymbolMatch> {
                let understands = |language: &str| {
                    <Self as $crate::registry::Backend>::understands(self, language)
                };
                $crate::search::search_symbols(ctx, pattern, include_libraries, limit, |s| {
                    understands(&s.language)
                        || ctx.family_chain(&s.language).into_iter().any(&understands)
                })
            }
        }

        impl $crate::registry::SuperMethodsProvider for $backend {
            fn super_methods(
                &self,
                ctx: &$crate::model::ProjectContext,
                element: &$crate::types::Symbol,
            ) -> Option<Vec<$crate::types::SuperMethodEntry>> {
                $crate::graph::SuperMethodResolver::new(self, ctx).resolve(element)
            }
        }
    };
}

/// Go structs, interfaces and embedding.
pub mod go;

/// Java, Kotlin, Groovy and JSP.
pub mod jvm;

/// Python classes and protocols.
pub mod python;

/// TypeScript and JavaScript.
pub mod typescript;

pub use go::GoBackend;
pub use jvm::JvmBackend;
pub use python::PythonBackend;
pub use typescript::TypeScriptBackend;

/// Capability-level acceptance shared by every backend.
pub(crate) fn accepts<S: LanguageSemantics + ?Sized>(
    sem: &S,
    capability: Capability,
    element: &Symbol,
) -> bool {
    match capability {
        Capability::TypeHierarchy => sem.is_type_declaration(element),
        Capability::CallHierarchy => sem.is_callable(element),
        Capability::Implementations => {
            sem.is_type_declaration(element) || element.kind == SymbolKind::Method
        }
        Capability::SuperMethods => element.kind == SymbolKind::Method,
        Capability::SymbolSearch => true,
    }
}

/// Registers the built-in backends whose language the model supports.
///
/// Gates are consulted again on every dispatch, so a backend registered here
/// still drops out if its gate later reports unavailable.
pub fn register_builtin_backends(
    registry: &Registry,
    model: Arc<dyn CodeModel>,
    config: &NavConfig,
) {
    let gate = |language: &str| AvailabilityGate::for_model(language, model.clone(), config);

    registry.register_available("java", Arc::new(JvmBackend::new(gate("java"))));
    registry.register_available("go", Arc::new(GoBackend::new(gate("go"))));
    registry.register_available("python", Arc::new(PythonBackend::new(gate("python"))));

    let typescript = Arc::new(TypeScriptBackend::new(gate("typescript")));
    registry.register_available("typescript", typescript.clone());
    registry.register_available("javascript", typescript);

    info!(
        languages = ?registry.registered_languages(),
        "built-in backends registered"
    );
}

/// A registry populated with the built-in backends.
pub fn builtin_registry(model: Arc<dyn CodeModel>, config: &NavConfig) -> Registry {
    let registry = Registry::from_config(config);
    register_builtin_backends(&registry, model, config);
    registry
}
