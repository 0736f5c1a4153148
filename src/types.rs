use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to one resolved symbol inside a code model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kinds of symbols a code model can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Module,
    Class,
    Interface,
    Struct,
    Enum,
    TypeAlias,
    Function,
    Method,
    Constructor,
    Field,
    Variable,
}

#[allow(clippy::should_implement_trait)]
impl SymbolKind {
    /// Returns the string representation of this symbol kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Struct => "struct",
            SymbolKind::Enum => "enum",
            SymbolKind::TypeAlias => "type_alias",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Field => "field",
            SymbolKind::Variable => "variable",
        }
    }

    /// Parses a string into a `SymbolKind`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<SymbolKind> {
        match s {
            "module" => Some(SymbolKind::Module),
            "class" => Some(SymbolKind::Class),
            "interface" => Some(SymbolKind::Interface),
            "struct" => Some(SymbolKind::Struct),
            "enum" => Some(SymbolKind::Enum),
            "type_alias" => Some(SymbolKind::TypeAlias),
            "function" => Some(SymbolKind::Function),
            "method" => Some(SymbolKind::Method),
            "constructor" => Some(SymbolKind::Constructor),
            "field" => Some(SymbolKind::Field),
            "variable" => Some(SymbolKind::Variable),
            _ => None,
        }
    }

    /// True for declarations that can take part in a type hierarchy.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class
                | SymbolKind::Interface
                | SymbolKind::Struct
                | SymbolKind::Enum
                | SymbolKind::TypeAlias
        )
    }

    /// True for declarations that have a body and can call or be called.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            SymbolKind::Function | SymbolKind::Method | SymbolKind::Constructor
        )
    }
}

/// How a supertype edge was declared.
///
/// Traversal treats every kind the same; the tag only records which
/// mechanism of the source language produced the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Extends,
    Implements,
    Embeds,
}

#[allow(clippy::should_implement_trait)]
impl EdgeKind {
    /// Returns the string representation of this edge kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Extends => "extends",
            EdgeKind::Implements => "implements",
            EdgeKind::Embeds => "embeds",
        }
    }

    /// Parses a string into an `EdgeKind`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<EdgeKind> {
        match s {
            "extends" => Some(EdgeKind::Extends),
            "implements" => Some(EdgeKind::Implements),
            "embeds" => Some(EdgeKind::Embeds),
            _ => None,
        }
    }
}

/// A directed "is a subtype of" edge reported by a code model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupertypeEdge {
    pub target: ElementId,
    pub kind: EdgeKind,
}

/// A position inside a source file. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// A resolved symbol as the code model sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: ElementId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    pub kind: SymbolKind,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Enclosing declaration (owner type of a method, module of a class).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ElementId>,
    /// Symbol comes from a library or dependency rather than project sources.
    #[serde(default)]
    pub library: bool,
}

impl Symbol {
    /// Creates a symbol with no location, signature, or container.
    pub fn new(
        id: impl Into<ElementId>,
        name: impl Into<String>,
        kind: SymbolKind,
        language: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            qualified_name: None,
            kind,
            language: language.into(),
            file: None,
            start_line: None,
            end_line: None,
            signature: None,
            container: None,
            library: false,
        }
    }

    pub fn with_qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.qualified_name = Some(qualified_name.into());
        self
    }

    pub fn in_file(mut self, file: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        self.file = Some(file.into());
        self.start_line = Some(start_line);
        self.end_line = Some(end_line);
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn in_container(mut self, container: impl Into<ElementId>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn as_library(mut self) -> Self {
        self.library = true;
        self
    }

    /// Returns `true` if `location` falls inside this symbol's line range.
    pub fn spans(&self, location: &Location) -> bool {
        match (&self.file, self.start_line, self.end_line) {
            (Some(file), Some(start), Some(end)) => {
                *file == location.file && start <= location.line && location.line <= end
            }
            _ => false,
        }
    }
}

/// A call expression found inside a callable's body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub caller: ElementId,
    pub callee_name: String,
    pub location: Location,
}

/// A usage of an element somewhere in the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub target: ElementId,
    pub location: Location,
}

// ---------------------------------------------------------------------------
// Result entities
// ---------------------------------------------------------------------------

/// The minimal, render-ready facts about one resolved symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub kind: SymbolKind,
    pub language: String,
}

impl ElementReference {
    /// Deduplication key: `(qualified_name ?? name) + file + line`.
    pub fn identity(&self) -> String {
        format!(
            "{}|{}|{}",
            self.qualified_name.as_deref().unwrap_or(&self.name),
            self.file.as_deref().unwrap_or(""),
            self.line.map(|l| l.to_string()).unwrap_or_default()
        )
    }
}

impl From<&Symbol> for ElementReference {
    fn from(symbol: &Symbol) -> Self {
        Self {
            name: symbol.name.clone(),
            qualified_name: symbol.qualified_name.clone(),
            file: symbol.file.clone(),
            line: symbol.start_line,
            kind: symbol.kind,
            language: symbol.language.clone(),
        }
    }
}

/// One type in a hierarchy answer.
///
/// `subtypes` is only filled on the root node of a query and is never
/// expanded recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeNode {
    #[serde(flatten)]
    pub element: ElementReference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supertypes: Vec<TypeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtypes: Option<Vec<ElementReference>>,
}

impl TypeNode {
    pub fn leaf(element: ElementReference) -> Self {
        Self {
            element,
            supertypes: Vec::new(),
            subtypes: None,
        }
    }

    /// Visits this node and every supertype below it, depth first.
    pub fn walk<'a>(&'a self, out: &mut Vec<&'a TypeNode>) {
        out.push(self);
        for parent in &self.supertypes {
            parent.walk(out);
        }
    }
}

/// Which way a call hierarchy query walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Callers,
    Callees,
}

#[allow(clippy::should_implement_trait)]
impl CallDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallDirection::Callers => "callers",
            CallDirection::Callees => "callees",
        }
    }

    pub fn from_str(s: &str) -> Option<CallDirection> {
        match s {
            "callers" => Some(CallDirection::Callers),
            "callees" => Some(CallDirection::Callees),
            _ => None,
        }
    }
}

/// One callable in a call hierarchy answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallNode {
    #[serde(flatten)]
    pub element: ElementReference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CallNode>,
}

impl CallNode {
    pub fn leaf(element: ElementReference) -> Self {
        Self {
            element,
            children: Vec::new(),
        }
    }

    /// Number of nested levels below this node (0 for a leaf).
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Finds a descendant (or self) by simple name.
    pub fn find(&self, name: &str) -> Option<&CallNode> {
        if self.element.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

/// A symbol search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    pub kind: SymbolKind,
    pub file: String,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
    pub language: String,
}

impl SymbolMatch {
    /// Same key shape as [`ElementReference::identity`].
    pub fn identity(&self) -> String {
        format!(
            "{}|{}|{}",
            self.qualified_name.as_deref().unwrap_or(&self.name),
            self.file,
            self.line
        )
    }
}

/// One ancestor method found by super-method resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperMethodEntry {
    pub name: String,
    pub signature: String,
    pub containing_class: String,
    pub containing_class_kind: SymbolKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub is_interface: bool,
    /// 1 for the immediate ancestor, growing toward the root.
    pub depth: u32,
    pub language: String,
}
