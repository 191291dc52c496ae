//! Sections and disclosure tiers.
//!
//! A [`Section`] is one node of the rendered document tree: a title, an
//! opaque markup body, and ordered children. The downstream writer owns
//! final markup emission; this core only guarantees structure and
//! deterministic ordering.

use serde::{Deserialize, Serialize};

/// One of the four progressive disclosure tiers, in fixed order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DisclosureTier {
    /// Signature and one-line summary. Always rendered.
    Essential,
    /// Example blocks. Rendered only when examples exist.
    Examples,
    /// Complete parameter/attribute/member reference. Always rendered,
    /// possibly empty.
    Full,
    /// Source link. Rendered only with the `source-links` capability.
    Source,
}

impl DisclosureTier {
    /// All tiers, in disclosure order.
    pub const ALL: [DisclosureTier; 4] = [
        DisclosureTier::Essential,
        DisclosureTier::Examples,
        DisclosureTier::Full,
        DisclosureTier::Source,
    ];

    /// Returns the display name of this tier.
    pub fn as_str(self) -> &'static str {
        match self {
            DisclosureTier::Essential => "essential",
            DisclosureTier::Examples => "examples",
            DisclosureTier::Full => "full",
            DisclosureTier::Source => "source",
        }
    }
}

impl std::fmt::Display for DisclosureTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One node of the rendered document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Stable section id, used by the manifest and for anchors.
    pub id: String,
    /// Section heading text.
    pub title: String,
    /// Opaque rendered markup. May be empty for structural nodes.
    pub body: String,
    /// The tier this section belongs to.
    pub tier: DisclosureTier,
    /// Child sections, in render order.
    #[serde(default)]
    pub children: Vec<Section>,
}

impl Section {
    /// Creates a leaf section.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        tier: DisclosureTier,
    ) -> Self {
        Section {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            tier,
            children: Vec::new(),
        }
    }

    /// Appends a child section.
    pub fn push_child(&mut self, child: Section) {
        self.children.push(child);
    }

    /// Total number of sections in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Section::subtree_len)
            .sum::<usize>()
    }
}
