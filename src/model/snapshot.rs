use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ModelError, ModelResult, NavError, Result};
use crate::model::CodeModel;
use crate::types::*;

/// Serialized supertype relation: `source` is a subtype of `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupertypeRecord {
    pub source: ElementId,
    pub target: ElementId,
    pub kind: EdgeKind,
}

/// Serialized call expression. `callee` is `None` when the host could not
/// resolve the call target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub caller: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callee: Option<ElementId>,
    pub callee_name: String,
    pub location: Location,
}

/// On-disk layout of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default = "default_ready")]
    pub ready: bool,
    /// Languages with semantic support. Empty means every language.
    #[serde(default)]
    pub enabled_languages: Vec<String>,
    /// Languages whose support probe fails outright.
    #[serde(default)]
    pub probe_failures: Vec<String>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub supertypes: Vec<SupertypeRecord>,
    #[serde(default)]
    pub calls: Vec<CallRecord>,
    #[serde(default)]
    pub references: Vec<Reference>,
    /// Elements whose lookups fail with an introspection error.
    #[serde(default)]
    pub broken: Vec<ElementId>,
}

fn default_ready() -> bool {
    true
}

/// A [`CodeModel`] held entirely in memory.
///
/// Built either programmatically (tests, embedding hosts) or from a JSON
/// snapshot exported by a host.
#[derive(Debug, Clone)]
pub struct SnapshotModel {
    data: SnapshotData,
    by_id: HashMap<ElementId, usize>,
    broken: HashSet<ElementId>,
}

impl Default for SnapshotModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotModel {
    /// Creates an empty, ready model with every language enabled.
    pub fn new() -> Self {
        Self::from_data(SnapshotData {
            ready: true,
            ..SnapshotData::default()
        })
    }

    /// Wraps deserialized snapshot data, building the lookup index.
    pub fn from_data(data: SnapshotData) -> Self {
        let by_id = data
            .symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let broken = data.broken.iter().cloned().collect();
        Self {
            data,
            by_id,
            broken,
        }
    }

    /// Loads a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| NavError::Config {
            message: format!("failed to read snapshot '{}': {}", path.display(), e),
        })?;
        let data: SnapshotData =
            serde_json::from_str(&contents).map_err(|e| NavError::Config {
                message: format!("failed to parse snapshot '{}': {}", path.display(), e),
            })?;
        debug!(
            symbols = data.symbols.len(),
            edges = data.supertypes.len(),
            calls = data.calls.len(),
            "loaded snapshot"
        );
        Ok(Self::from_data(data))
    }

    /// Writes the snapshot as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn data(&self) -> &SnapshotData {
        &self.data
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Adds a symbol, replacing any earlier symbol with the same id.
    pub fn insert_symbol(&mut self, symbol: Symbol) -> &mut Self {
        match self.by_id.get(&symbol.id) {
            Some(&i) => self.data.symbols[i] = symbol,
            None => {
                self.by_id.insert(symbol.id.clone(), self.data.symbols.len());
                self.data.symbols.push(symbol);
            }
        }
        self
    }

    pub fn insert_symbols(&mut self, symbols: impl IntoIterator<Item = Symbol>) -> &mut Self {
        for symbol in symbols {
            self.insert_symbol(symbol);
        }
        self
    }

    /// Records that `sub` has `sup` as a direct supertype.
    pub fn add_supertype(&mut self, sub: &str, sup: &str, kind: EdgeKind) -> &mut Self {
        self.data.supertypes.push(SupertypeRecord {
            source: ElementId::from(sub),
            target: ElementId::from(sup),
            kind,
        });
        self
    }

    /// Records a resolved call from `caller` to `callee` at `location`.
    pub fn add_call(&mut self, caller: &str, callee: &str, location: Location) -> &mut Self {
        let callee_name = self
            .symbol(&ElementId::from(callee))
            .map(|s| s.name)
            .unwrap_or_else(|| callee.to_string());
        self.data.calls.push(CallRecord {
            caller: ElementId::from(caller),
            callee: Some(ElementId::from(callee)),
            callee_name,
            location,
        });
        self
    }

    /// Records a call the host could not resolve.
    pub fn add_unresolved_call(
        &mut self,
        caller: &str,
        callee_name: &str,
        location: Location,
    ) -> &mut Self {
        self.data.calls.push(CallRecord {
            caller: ElementId::from(caller),
            callee: None,
            callee_name: callee_name.to_string(),
            location,
        });
        self
    }

    /// Records a non-call usage of `target`.
    pub fn add_reference(&mut self, target: &str, location: Location) -> &mut Self {
        self.data.references.push(Reference {
            target: ElementId::from(target),
            location,
        });
        self
    }

    pub fn set_ready(&mut self, ready: bool) -> &mut Self {
        self.data.ready = ready;
        self
    }

    /// Restricts semantic support to the given languages.
    pub fn enable_languages(&mut self, languages: &[&str]) -> &mut Self {
        self.data.enabled_languages = languages.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Makes the support probe for `language` fail.
    pub fn fail_support_check(&mut self, language: &str) -> &mut Self {
        self.data.probe_failures.push(language.to_string());
        self
    }

    /// Makes every lookup keyed on `id` fail with an introspection error.
    pub fn mark_broken(&mut self, id: &str) -> &mut Self {
        let id = ElementId::from(id);
        self.broken.insert(id.clone());
        self.data.broken.push(id);
        self
    }

    fn check(&self, id: &ElementId) -> ModelResult<()> {
        if self.broken.contains(id) {
            return Err(ModelError::Introspection(format!(
                "lookup failed for {id}"
            )));
        }
        Ok(())
    }
}

impl CodeModel for SnapshotModel {
    fn is_ready(&self) -> bool {
        self.data.ready
    }

    fn language_enabled(&self, language: &str) -> ModelResult<bool> {
        if self.data.probe_failures.iter().any(|l| l == language) {
            return Err(ModelError::Introspection(format!(
                "support probe failed for {language}"
            )));
        }
        Ok(self.data.enabled_languages.is_empty()
            || self.data.enabled_languages.iter().any(|l| l == language))
    }

    fn symbol(&self, id: &ElementId) -> Option<Symbol> {
        self.by_id.get(id).map(|&i| self.data.symbols[i].clone())
    }

    fn element_at(&self, location: &Location) -> Option<ElementId> {
        // A declaration starting on the line wins over one merely spanning it.
        let declared_here = self.data.symbols.iter().find(|s| {
            s.file.as_deref() == Some(location.file.as_str())
                && s.start_line == Some(location.line)
        });
        if let Some(sym) = declared_here {
            return Some(sym.id.clone());
        }
        innermost(self.data.symbols.iter().filter(|s| s.spans(location))).map(|s| s.id.clone())
    }

    fn containing_declaration(
        &self,
        location: &Location,
        kinds: &[SymbolKind],
    ) -> ModelResult<Option<ElementId>> {
        Ok(innermost(
            self.data
                .symbols
                .iter()
                .filter(|s| kinds.contains(&s.kind) && s.spans(location)),
        )
        .map(|s| s.id.clone()))
    }

    fn supertypes(&self, type_id: &ElementId) -> ModelResult<Vec<SupertypeEdge>> {
        self.check(type_id)?;
        Ok(self
            .data
            .supertypes
            .iter()
            .filter(|r| r.source == *type_id)
            .map(|r| SupertypeEdge {
                target: r.target.clone(),
                kind: r.kind,
            })
            .collect())
    }

    fn inheritors(&self, type_id: &ElementId) -> ModelResult<Vec<ElementId>> {
        self.check(type_id)?;
        Ok(self
            .data
            .supertypes
            .iter()
            .filter(|r| r.target == *type_id)
            .map(|r| r.source.clone())
            .collect())
    }

    fn references(&self, element: &ElementId) -> ModelResult<Vec<Reference>> {
        self.check(element)?;
        let mut seen: HashSet<Location> = HashSet::new();
        let mut refs = Vec::new();

        let from_calls = self
            .data
            .calls
            .iter()
            .filter(|c| c.callee.as_ref() == Some(element))
            .map(|c| Reference {
                target: element.clone(),
                location: c.location.clone(),
            });
        let explicit = self
            .data
            .references
            .iter()
            .filter(|r| r.target == *element)
            .cloned();

        for r in from_calls.chain(explicit) {
            if seen.insert(r.location.clone()) {
                refs.push(r);
            }
        }
        Ok(refs)
    }

    fn call_expressions(&self, callable: &ElementId) -> ModelResult<Vec<CallSite>> {
        self.check(callable)?;
        Ok(self
            .data
            .calls
            .iter()
            .filter(|c| c.caller == *callable)
            .map(|c| CallSite {
                caller: c.caller.clone(),
                callee_name: c.callee_name.clone(),
                location: c.location.clone(),
            })
            .collect())
    }

    fn resolve_call(&self, site: &CallSite) -> ModelResult<Option<ElementId>> {
        let record = self.data.calls.iter().find(|c| {
            c.caller == site.caller
                && c.location == site.location
                && c.callee_name == site.callee_name
        });
        match record {
            Some(r) => {
                if let Some(callee) = &r.callee {
                    self.check(callee)?;
                }
                Ok(r.callee.clone())
            }
            None => Err(ModelError::Unresolved(format!(
                "no call to {} at {}:{}",
                site.callee_name, site.location.file, site.location.line
            ))),
        }
    }

    fn members(&self, type_id: &ElementId) -> ModelResult<Vec<ElementId>> {
        self.check(type_id)?;
        Ok(self
            .data
            .symbols
            .iter()
            .filter(|s| s.container.as_ref() == Some(type_id))
            .map(|s| s.id.clone())
            .collect())
    }

    fn symbols(&self, include_libraries: bool) -> Vec<ElementId> {
        self.data
            .symbols
            .iter()
            .filter(|s| include_libraries || !s.library)
            .map(|s| s.id.clone())
            .collect()
    }
}

/// Picks the symbol with the narrowest line range.
fn innermost<'a>(candidates: impl Iterator<Item = &'a Symbol>) -> Option<&'a Symbol> {
    candidates.min_by_key(|s| {
        s.end_line
            .unwrap_or(u32::MAX)
            .saturating_sub(s.start_line.unwrap_or(0))
    })
}
