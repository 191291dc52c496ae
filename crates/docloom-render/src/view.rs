//! The serializable view fragments render from.
//!
//! [`ObjectView`] is the flattened, template-facing projection of one
//! object plus everything the pipeline derived for it: category, coverage,
//! diagram outcome, resolved links. Templates see only this type; they
//! never reach back into the raw model or any ambient state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use docloom_model::{Category, CoverageScore, DocObject, ObjectKind};

/// A possibly-linked piece of text.
///
/// `uri: None` is the plain-text degradation of an unresolved reference;
/// templates render it as literal code with no link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkView {
    pub text: String,
    #[serde(default)]
    pub uri: Option<String>,
}

impl LinkView {
    /// Unlinked text.
    pub fn plain(text: impl Into<String>) -> Self {
        LinkView {
            text: text.into(),
            uri: None,
        }
    }

    /// Linked text.
    pub fn linked(text: impl Into<String>, uri: impl Into<String>) -> Self {
        LinkView {
            text: text.into(),
            uri: Some(uri.into()),
        }
    }
}

/// One declared parameter, merged with its documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamView {
    pub name: String,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
}

/// Coverage data as templates see it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageView {
    pub percentage: u8,
    pub missing: Vec<String>,
}

impl CoverageView {
    pub fn from_score(score: &CoverageScore) -> Self {
        CoverageView {
            percentage: score.percentage,
            missing: score.missing.iter().map(|m| m.as_str().to_string()).collect(),
        }
    }
}

/// Diagram outcome as templates see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramView {
    /// `"inheritance"`, `"flow"`, `"sequence"` or `"none"`.
    pub kind: String,
    pub accepted: bool,
    pub reason: String,
    pub node_count: usize,
    /// Image reference when generation succeeded.
    #[serde(default)]
    pub image: Option<String>,
}

impl Default for DiagramView {
    fn default() -> Self {
        DiagramView {
            kind: "none".to_string(),
            accepted: false,
            reason: "nothing to diagram".to_string(),
            node_count: 0,
            image: None,
        }
    }
}

/// Source location plus the optional rendered link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceView {
    pub file: String,
    pub line_start: u32,
    pub line_end: u32,
}

/// A child object entry for member listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    pub id: String,
    pub name: String,
    pub kind: String,
}

/// Everything a fragment template can see about one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectView {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub category: String,
    /// Rendered one-line signature, e.g. `async fetch(url: str) -> Page`.
    pub signature: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamView>,
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub returns_doc: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub bases: Vec<LinkView>,
    #[serde(default)]
    pub subclasses: Vec<LinkView>,
    #[serde(default)]
    pub members: Vec<MemberView>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    pub coverage: CoverageView,
    pub diagram: DiagramView,
    #[serde(default)]
    pub source: Option<SourceView>,
    pub is_async: bool,
    pub is_abstract: bool,
    /// Inline warning annotations, e.g. the base-cycle notice. Rendered
    /// visibly so defects surface in the output itself.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ObjectView {
    /// Builds the view parts derivable from the object alone.
    ///
    /// Bases and subclasses start as plain (unlinked) text; the pipeline
    /// replaces them with resolved links, and fills in the diagram
    /// outcome, before rendering.
    pub fn from_object(obj: &DocObject, category: Category, score: &CoverageScore) -> Self {
        ObjectView {
            id: obj.id.clone(),
            name: obj.name.clone(),
            kind: obj.kind.as_str().to_string(),
            category: category.as_str().to_string(),
            signature: signature(obj),
            summary: obj.docstring.summary.clone(),
            params: obj
                .signature_parameters()
                .map(|p| ParamView {
                    name: p.name.clone(),
                    annotation: p.annotation.clone(),
                    doc: obj
                        .docstring
                        .params
                        .iter()
                        .find(|d| d.name == p.name)
                        .map(|d| d.description.clone()),
                })
                .collect(),
            returns: obj.returns.clone(),
            returns_doc: obj.docstring.returns.clone(),
            examples: obj.docstring.examples.clone(),
            bases: obj
                .bases
                .iter()
                .map(|b| LinkView::plain(docloom_model::last_segment(b)))
                .collect(),
            subclasses: obj
                .subclasses
                .iter()
                .map(|s| LinkView::plain(docloom_model::last_segment(s)))
                .collect(),
            members: Vec::new(),
            annotations: obj.annotations.clone(),
            coverage: CoverageView::from_score(score),
            diagram: DiagramView::default(),
            source: obj.source_location.as_ref().map(|loc| SourceView {
                file: loc.file.clone(),
                line_start: loc.line_start,
                line_end: loc.line_end,
            }),
            is_async: obj.is_async,
            is_abstract: obj.is_abstract,
            warnings: Vec::new(),
        }
    }
}

/// Renders the one-line signature for an object.
fn signature(obj: &DocObject) -> String {
    match obj.kind {
        ObjectKind::Module => format!("module {}", obj.id),
        ObjectKind::Package => format!("package {}", obj.id),
        ObjectKind::Class => {
            if obj.bases.is_empty() {
                format!("class {}", obj.name)
            } else {
                let bases: Vec<&str> = obj
                    .bases
                    .iter()
                    .map(|b| docloom_model::last_segment(b))
                    .collect();
                format!("class {}({})", obj.name, bases.join(", "))
            }
        }
        ObjectKind::Function | ObjectKind::Method => {
            let params: Vec<String> = obj
                .parameters
                .iter()
                .map(|p| match &p.annotation {
                    Some(ann) => format!("{}: {}", p.name, ann),
                    None => p.name.clone(),
                })
                .collect();
            let mut sig = format!("{}({})", obj.name, params.join(", "));
            if obj.has_return_value() {
                sig.push_str(" -> ");
                sig.push_str(obj.returns.as_deref().unwrap_or(""));
            }
            if obj.is_async {
                sig.insert_str(0, "async ");
            }
            sig
        }
        ObjectKind::Attribute => obj.name.clone(),
    }
}
