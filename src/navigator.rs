use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info};

use crate::backends::builtin_registry;
use crate::config::{load_config, NavConfig};
use crate::errors::{NavError, Result};
use crate::model::{CodeModel, ProjectContext, SnapshotModel};
use crate::registry::Registry;
use crate::search::merge_ranked;
use crate::types::*;

/// How a request names the element it is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementArg {
    /// A symbol handle.
    Id(ElementId),
    /// A source position, resolved through the code model.
    Position(Location),
}

impl FromStr for ElementArg {
    type Err = NavError;

    /// Parses `file:line[:column]` as a position and anything else as an id.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NavError::InvalidRequest {
                message: "empty element argument".to_string(),
            });
        }

        let parts: Vec<&str> = s.rsplitn(3, ':').collect();
        let position = match parts.as_slice() {
            [col, line, file] if !file.is_empty() => {
                match (line.parse::<u32>(), col.parse::<u32>()) {
                    (Ok(l), Ok(c)) => Some(Location::new(*file, l, c)),
                    // `C:/src/A.java:12` style paths carry a colon of their own.
                    (Err(_), Ok(l)) => Some(Location::new(format!("{file}:{line}"), l, 1)),
                    _ => None,
                }
            }
            [line, file] if !file.is_empty() => line
                .parse::<u32>()
                .ok()
                .map(|l| Location::new(*file, l, 1)),
            _ => None,
        };

        Ok(match position {
            Some(location) => ElementArg::Position(location),
            None => ElementArg::Id(ElementId::from(s)),
        })
    }
}

impl fmt::Display for ElementArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementArg::Id(id) => write!(f, "{id}"),
            ElementArg::Position(loc) => write!(f, "{}:{}:{}", loc.file, loc.line, loc.column),
        }
    }
}

/// Request layer over the registry: resolves the element, checks the model
/// is ready, and dispatches to the backend for the element's language.
///
/// Every query answers `Ok(None)` when no backend applies to the element;
/// that is a normal outcome, not an error.
pub struct Navigator {
    registry: Registry,
    context: ProjectContext,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl Navigator {
    pub fn new(registry: Registry, context: ProjectContext) -> Self {
        Self { registry, context }
    }

    /// A navigator with the built-in backends registered.
    pub fn with_builtin_backends(model: Arc<dyn CodeModel>, config: &NavConfig) -> Self {
        let registry = builtin_registry(model.clone(), config);
        let context = ProjectContext::new(model, config.limits.clone())
            .with_families(config.language_families.clone());
        Self::new(registry, context)
    }

    /// Loads `.navgraph/config.json` under `project_root` (defaults if absent)
    /// and a model snapshot from `snapshot_path`.
    pub fn open(project_root: &Path, snapshot_path: &Path) -> Result<Self> {
        let config = load_config(project_root)?;
        let model = SnapshotModel::load(snapshot_path)?;
        info!(snapshot = %snapshot_path.display(), "opened snapshot");
        Ok(Self::with_builtin_backends(Arc::new(model), &config))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn context(&self) -> &ProjectContext {
        &self.context
    }
}

// ---------------------------------------------------------------------------
// Element resolution
// ---------------------------------------------------------------------------

impl Navigator {
    fn ensure_ready(&self) -> Result<()> {
        if self.context.model.is_ready() {
            Ok(())
        } else {
            Err(NavError::IndexNotReady)
        }
    }

    /// Resolves an element argument to a symbol.
    pub fn resolve_element(&self, arg: &ElementArg) -> Result<Symbol> {
        let id = match arg {
            ElementArg::Id(id) => id.clone(),
            ElementArg::Position(location) => {
                self.context
                    .model
                    .element_at(location)
                    .ok_or_else(|| NavError::ElementNotFound {
                        element: arg.to_string(),
                    })?
            }
        };
        self.context
            .symbol(&id)
            .ok_or_else(|| NavError::ElementNotFound {
                element: arg.to_string(),
            })
    }

    fn prepare(&self, arg: &ElementArg) -> Result<Symbol> {
        self.ensure_ready()?;
        self.resolve_element(arg)
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl Navigator {
    pub fn type_hierarchy(&self, arg: &ElementArg) -> Result<Option<TypeNode>> {
        let element = self.prepare(arg)?;
        let Some(backend) = self.registry.resolve_type_hierarchy(&element) else {
            debug!(element = %element.name, language = %element.language, "no type hierarchy backend");
            return Ok(None);
        };
        Ok(backend.type_hierarchy(&self.context, &element))
    }

    /// Callers or callees of `arg`. `depth` defaults to
    /// `limits.default_call_depth` and must be at least 1.
    pub fn call_hierarchy(
        &self,
        arg: &ElementArg,
        direction: CallDirection,
        depth: Option<usize>,
    ) -> Result<Option<CallNode>> {
        let depth = depth.unwrap_or(self.context.limits.default_call_depth);
        if depth == 0 {
            return Err(NavError::InvalidRequest {
                message: "call hierarchy depth must be at least 1".to_string(),
            });
        }
        let element = self.prepare(arg)?;
        let Some(backend) = self.registry.resolve_call_hierarchy(&element) else {
            debug!(element = %element.name, language = %element.language, "no call hierarchy backend");
            return Ok(None);
        };
        Ok(backend.call_hierarchy(&self.context, &element, direction, depth))
    }

    pub fn implementations(&self, arg: &ElementArg) -> Result<Option<Vec<ElementReference>>> {
        let element = self.prepare(arg)?;
        let Some(backend) = self.registry.resolve_implementations(&element) else {
            debug!(element = %element.name, language = %element.language, "no implementations backend");
            return Ok(None);
        };
        Ok(backend.implementations(&self.context, &element))
    }

    pub fn super_methods(&self, arg: &ElementArg) -> Result<Option<Vec<SuperMethodEntry>>> {
        let element = self.prepare(arg)?;
        let Some(backend) = self.registry.resolve_super_methods(&element) else {
            debug!(element = %element.name, language = %element.language, "no super methods backend");
            return Ok(None);
        };
        Ok(backend.super_methods(&self.context, &element))
    }

    /// Searches every available backend and merges the results.
    ///
    /// `limit` defaults to `limits.default_search_limit`.
    pub fn search_symbols(
        &self,
        pattern: &str,
        include_libraries: bool,
        limit: Option<usize>,
    ) -> Result<Vec<SymbolMatch>> {
        self.ensure_ready()?;
        let limit = limit.unwrap_or(self.context.limits.default_search_limit);
        let backends = self.registry.symbol_search().all_available();
        debug!(pattern, backends = backends.len(), "searching symbols");

        let lists = backends
            .iter()
            .map(|b| b.search_symbols(&self.context, pattern, include_libraries, limit));
        Ok(merge_ranked(pattern, lists, limit))
    }
}
