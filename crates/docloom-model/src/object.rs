//! The language-agnostic object model handed over by the extraction stage.
//!
//! A [`DocObject`] is one documented code entity (module, class, function,
//! method, attribute). Objects are created once per build and are read-only
//! during rendering; everything the pipeline derives from them
//! (classification, coverage, diagram decisions, sections) is recomputed on
//! every render and never written back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The structural kind of a documented object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Module,
    Package,
    Class,
    Function,
    Method,
    Attribute,
}

impl ObjectKind {
    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Module => "module",
            ObjectKind::Package => "package",
            ObjectKind::Class => "class",
            ObjectKind::Function => "function",
            ObjectKind::Method => "method",
            ObjectKind::Attribute => "attribute",
        }
    }

    /// Returns `true` for kinds that carry a call signature.
    pub fn is_callable(self) -> bool {
        matches!(self, ObjectKind::Function | ObjectKind::Method)
    }

    /// Returns `true` for module-level containers.
    pub fn is_container(self) -> bool {
        matches!(self, ObjectKind::Module | ObjectKind::Package)
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One documented parameter from a parsed docstring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocParam {
    /// Parameter name as written in the docstring.
    pub name: String,
    /// Free-form description text.
    pub description: String,
}

/// Parsed docstring content.
///
/// The docstring parser is an external collaborator; this type only carries
/// its output. All fields may be empty for undocumented objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docstring {
    /// The raw, unparsed docstring text.
    #[serde(default)]
    pub raw: String,
    /// One-line summary, if the docstring has one.
    #[serde(default)]
    pub summary: Option<String>,
    /// Documented parameters.
    #[serde(default)]
    pub params: Vec<DocParam>,
    /// Documented return or yield value.
    #[serde(default)]
    pub returns: Option<String>,
    /// Example blocks, verbatim.
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Docstring {
    /// Returns `true` if no part of the docstring is present.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
            && self.summary.is_none()
            && self.params.is_empty()
            && self.returns.is_none()
            && self.examples.is_empty()
    }

    /// Returns `true` if the named parameter is documented.
    pub fn documents_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }
}

/// One declared parameter from the object's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Type annotation, if declared.
    #[serde(default)]
    pub annotation: Option<String>,
}

impl Parameter {
    /// Creates a parameter without an annotation.
    pub fn new(name: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            annotation: None,
        }
    }

    /// Creates a parameter with a type annotation.
    pub fn annotated(name: impl Into<String>, annotation: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            annotation: Some(annotation.into()),
        }
    }

    /// Returns `true` for implicit receiver parameters (`self`, `cls`).
    ///
    /// Receivers are excluded from coverage accounting; they are never
    /// documented or annotated in practice.
    pub fn is_receiver(&self) -> bool {
        self.name == "self" || self.name == "cls"
    }
}

/// Source position of an object, for source-link rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File path relative to the documented project root.
    pub file: String,
    /// First line of the definition (1-based).
    pub line_start: u32,
    /// Last line of the definition (1-based, inclusive).
    pub line_end: u32,
}

/// A single documented code entity.
///
/// # Invariants
///
/// - `id` is a globally unique symbolic path, stable for the whole build.
/// - `bases` and `subclasses` reference other objects by id and are expected
///   to form a DAG; cycles are detected by
///   [`DocGraph::base_cycles`](crate::graph::DocGraph::base_cycles) and
///   degrade the affected objects rather than failing the build.
/// - `members` lists child ids in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocObject {
    /// Unique symbolic path, e.g. `"agents.react.ReactAgent"`.
    pub id: String,
    /// Structural kind.
    pub kind: ObjectKind,
    /// Unqualified name, e.g. `"ReactAgent"`.
    pub name: String,
    /// Parsed docstring.
    #[serde(default)]
    pub docstring: Docstring,
    /// Base class ids, in declaration order.
    #[serde(default)]
    pub bases: Vec<String>,
    /// Known subclass ids.
    #[serde(default)]
    pub subclasses: Vec<String>,
    /// Child object ids, in declaration order.
    #[serde(default)]
    pub members: Vec<String>,
    /// Declared signature parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Return annotation. `None` or `"None"` means a void signature.
    #[serde(default)]
    pub returns: Option<String>,
    /// Name → type-string annotation map (attributes, class fields).
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Ids of directly-called collaborators, for flow diagrams.
    #[serde(default)]
    pub calls: Vec<String>,
    /// Decorator / marker names, e.g. `"dataclass"`.
    #[serde(default)]
    pub decorators: Vec<String>,
    /// Source position, when the extractor recorded one.
    #[serde(default)]
    pub source_location: Option<SourceLocation>,
    /// Whether this is an async callable.
    #[serde(default)]
    pub is_async: bool,
    /// Whether the extractor flagged this object as abstract.
    #[serde(default)]
    pub is_abstract: bool,
}

impl DocObject {
    /// Creates a bare object with the given identity.
    ///
    /// All other fields start empty; chain the `with_*` methods to fill
    /// them in.
    pub fn new(id: impl Into<String>, kind: ObjectKind, name: impl Into<String>) -> Self {
        DocObject {
            id: id.into(),
            kind,
            name: name.into(),
            docstring: Docstring::default(),
            bases: Vec::new(),
            subclasses: Vec::new(),
            members: Vec::new(),
            parameters: Vec::new(),
            returns: None,
            annotations: BTreeMap::new(),
            calls: Vec::new(),
            decorators: Vec::new(),
            source_location: None,
            is_async: false,
            is_abstract: false,
        }
    }

    /// Sets the parsed docstring.
    pub fn with_docstring(mut self, docstring: Docstring) -> Self {
        self.docstring = docstring;
        self
    }

    /// Sets the base class ids.
    pub fn with_bases<I, S>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bases = bases.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the subclass ids.
    pub fn with_subclasses<I, S>(mut self, subclasses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subclasses = subclasses.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the member ids, in declaration order.
    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the declared parameters.
    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets the return annotation.
    pub fn with_returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = Some(returns.into());
        self
    }

    /// Sets the directly-called collaborator ids.
    pub fn with_calls<I, S>(mut self, calls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.calls = calls.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the decorator names.
    pub fn with_decorators<I, S>(mut self, decorators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.decorators = decorators.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the source location.
    pub fn with_source_location(mut self, location: SourceLocation) -> Self {
        self.source_location = Some(location);
        self
    }

    /// Marks the object as async.
    pub fn with_async(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// Marks the object as abstract.
    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Declared parameters excluding implicit receivers.
    pub fn signature_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| !p.is_receiver())
    }

    /// Returns `true` if the object has a non-void declared return.
    pub fn has_return_value(&self) -> bool {
        matches!(self.returns.as_deref(), Some(r) if r != "None" && !r.is_empty())
    }
}

/// The final path segment of a symbolic id.
///
/// `"unknown.module.Thing"` → `"Thing"`. Ids without separators are
/// returned unchanged.
pub fn last_segment(id: &str) -> &str {
    id.rsplit('.').next().unwrap_or(id)
}
