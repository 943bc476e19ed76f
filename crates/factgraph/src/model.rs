//! Fact model for the architectural graph.
//!
//! A [`Fact`] is a named node (module, symbol, route, storage declaration,
//! dependency record) contributed by an extractor. Edges are [`Relation`]s
//! owned by the fact that declares them and point at another fact by name.
//!
//! Only a handful of kinds carry structural meaning here: `module` and
//! `dependency` facts drive the synthetic module edges and cycle detection,
//! and `imports` relations are what those features follow. Every other kind
//! is accepted as-is through the `Other` variants and treated generically.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Kind of a fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FactKind {
    /// A module, package, or directory-level unit.
    Module,
    /// A declared symbol (function, type, constant, ...).
    Symbol,
    /// An HTTP or RPC route.
    Route,
    /// A storage declaration (table, collection, bucket, ...).
    Storage,
    /// An import/dependency record attached to a source file.
    Dependency,
    /// Any extractor-defined kind.
    Other(String),
}

impl FactKind {
    /// The wire form of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Module => "module",
            Self::Symbol => "symbol",
            Self::Route => "route",
            Self::Storage => "storage",
            Self::Dependency => "dependency",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for FactKind {
    fn from(s: &str) -> Self {
        match s {
            "module" => Self::Module,
            "symbol" => Self::Symbol,
            "route" => Self::Route,
            "storage" => Self::Storage,
            "dependency" => Self::Dependency,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FactKind {
    fn from(s: String) -> Self {
        match Self::from(s.as_str()) {
            Self::Other(_) => Self::Other(s),
            known => known,
        }
    }
}

impl From<FactKind> for String {
    fn from(kind: FactKind) -> Self {
        match kind {
            FactKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a relation between two facts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationKind {
    /// Container declares the target (module declares symbol).
    Declares,
    /// Source imports the target.
    Imports,
    /// Source calls the target.
    Calls,
    /// Source implements the target interface/trait.
    Implements,
    /// Generic dependency.
    DependsOn,
    /// Any extractor-defined relation.
    Other(String),
}

impl RelationKind {
    /// The wire form of this relation kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Declares => "declares",
            Self::Imports => "imports",
            Self::Calls => "calls",
            Self::Implements => "implements",
            Self::DependsOn => "depends_on",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for RelationKind {
    fn from(s: &str) -> Self {
        match s {
            "declares" => Self::Declares,
            "imports" => Self::Imports,
            "calls" => Self::Calls,
            "implements" => Self::Implements,
            "depends_on" => Self::DependsOn,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for RelationKind {
    fn from(s: String) -> Self {
        match Self::from(s.as_str()) {
            Self::Other(_) => Self::Other(s),
            known => known,
        }
    }
}

impl From<RelationKind> for String {
    fn from(kind: RelationKind) -> Self {
        match kind {
            RelationKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, typed edge declared by a fact.
///
/// `target` is resolved by name equality when the graph is built; it does
/// not have to name an existing fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    /// Relation kind
    pub kind: RelationKind,
    /// Name of the target fact
    pub target: String,
}

impl Relation {
    /// Create a new relation.
    pub fn new(kind: impl Into<RelationKind>, target: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: target.into(),
        }
    }
}

/// A typed, named node in the architectural model.
///
/// Names are not unique. When several facts share a name, the first one
/// added supplies the metadata of the corresponding graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Fact kind
    pub kind: FactKind,

    /// Identity key used to resolve relation targets
    #[serde(default)]
    pub name: String,

    /// Source file, relative and `/`-separated
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,

    /// 1-based source line, 0 when unknown
    #[serde(default, skip_serializing_if = "is_zero")]
    pub line: u32,

    /// Repository label for multi-repository stores
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo: String,

    /// Extractor-defined attributes, opaque to the store
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, Value>,

    /// Outgoing relations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl Fact {
    /// Create a fact with only a kind and a name.
    pub fn new(kind: impl Into<FactKind>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            file: String::new(),
            line: 0,
            repo: String::new(),
            props: BTreeMap::new(),
            relations: Vec::new(),
        }
    }

    /// Set the source location.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    /// Set the repository label.
    #[must_use]
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = repo.into();
        self
    }

    /// Add a property.
    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Add a relation.
    #[must_use]
    pub fn with_relation(
        mut self,
        kind: impl Into<RelationKind>,
        target: impl Into<String>,
    ) -> Self {
        self.relations.push(Relation::new(kind, target));
        self
    }

    /// Whether the fact declares at least one relation of `kind`.
    #[must_use]
    pub fn has_relation(&self, kind: &RelationKind) -> bool {
        self.relations.iter().any(|r| &r.kind == kind)
    }

    /// Property value in its string-compared form.
    ///
    /// Strings are returned verbatim; any other JSON value is rendered as
    /// compact JSON text (`true`, `42`, `["a"]`).
    #[must_use]
    pub fn prop_str(&self, key: &str) -> Option<String> {
        self.props.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Directory containing `file`: everything before the last `/`, or `.`.
#[must_use]
pub fn containing_dir(file: &str) -> &str {
    match file.rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => dir,
        _ => ".",
    }
}

/// Parent of a `/`-separated path, or `None` at the top.
#[must_use]
pub fn parent_segment(path: &str) -> Option<&str> {
    path.rsplit_once('/')
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
}
