//! Semantic classification of documented objects.
//!
//! [`classify`] maps a [`DocObject`] to a closed [`Category`] using a fixed
//! sequence of pattern rules. Rule order is significant: the first matching
//! rule wins, and an object matching several rules is an ambiguity that is
//! resolved to the earliest rule and logged at debug level, never an error.
//!
//! The function is pure. Identical input yields the identical category
//! across calls and across processes, which is what lets downstream stages
//! cache on it and what keeps test fixtures reproducible.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::object::{last_segment, DocObject, ObjectKind};

/// The semantic category of a documented object.
///
/// All downstream logic (fragment chains, diagram candidates) switches on
/// this enum; nothing outside this module matches on raw base-class names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Abstract,
    Mixin,
    DataRecord,
    Enumeration,
    Exception,
    Concrete,
    Module,
    Package,
}

impl Category {
    /// Returns the display name of this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Abstract => "abstract",
            Category::Mixin => "mixin",
            Category::DataRecord => "data-record",
            Category::Enumeration => "enumeration",
            Category::Exception => "exception",
            Category::Concrete => "concrete",
            Category::Module => "module",
            Category::Package => "package",
        }
    }

    /// Returns `true` for class-shaped categories that can carry an
    /// inheritance diagram.
    pub fn is_class_like(self) -> bool {
        !matches!(self, Category::Module | Category::Package)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static EXCEPTION_BASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Error|Exception|Warning)$").unwrap());
static ABSTRACT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(Abstract|Base)[A-Z0-9_]").unwrap());
static MIXIN_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"Mixin$").unwrap());

const ABSTRACT_BASES: &[&str] = &["ABC", "ABCMeta", "Protocol"];
const RECORD_DECORATORS: &[&str] = &["dataclass", "attr.s", "attrs", "define"];
const RECORD_BASES: &[&str] = &["NamedTuple", "TypedDict"];
const ENUM_BASES: &[&str] = &["Enum", "IntEnum", "StrEnum", "Flag", "IntFlag"];

/// Classifies an object into its semantic [`Category`].
///
/// Modules and packages classify by kind alone. For everything else the
/// pattern rules run in fixed priority order:
///
/// 1. exception-family base name → [`Category::Exception`]
/// 2. abstract marker (flag, `Abstract*`/`Base*` naming, abstract base,
///    "abstract base" docstring keyword) → [`Category::Abstract`]
/// 3. `*Mixin` naming or "mixin" docstring keyword → [`Category::Mixin`]
/// 4. record decorator or record-family base → [`Category::DataRecord`]
/// 5. enum-family base → [`Category::Enumeration`]
/// 6. otherwise → [`Category::Concrete`]
pub fn classify(obj: &DocObject) -> Category {
    match obj.kind {
        ObjectKind::Module => return Category::Module,
        ObjectKind::Package => return Category::Package,
        _ => {}
    }

    let mut matched: Vec<Category> = Vec::new();
    if is_exception_like(obj) {
        matched.push(Category::Exception);
    }
    if is_abstract_like(obj) {
        matched.push(Category::Abstract);
    }
    if is_mixin_like(obj) {
        matched.push(Category::Mixin);
    }
    if is_record_like(obj) {
        matched.push(Category::DataRecord);
    }
    if is_enum_like(obj) {
        matched.push(Category::Enumeration);
    }

    if matched.len() > 1 {
        debug!(
            object = %obj.id,
            rules = ?matched,
            "ambiguous classification, taking earliest rule"
        );
    }
    matched.first().copied().unwrap_or(Category::Concrete)
}

fn base_names(obj: &DocObject) -> impl Iterator<Item = &str> {
    obj.bases.iter().map(|b| last_segment(b))
}

fn summary_lower(obj: &DocObject) -> Option<String> {
    obj.docstring.summary.as_deref().map(|s| s.to_lowercase())
}

fn is_exception_like(obj: &DocObject) -> bool {
    base_names(obj).any(|b| EXCEPTION_BASE.is_match(b) || b == "BaseException")
}

fn is_abstract_like(obj: &DocObject) -> bool {
    obj.is_abstract
        || ABSTRACT_NAME.is_match(&obj.name)
        || base_names(obj).any(|b| ABSTRACT_BASES.contains(&b))
        || summary_lower(obj).is_some_and(|s| s.contains("abstract base"))
}

fn is_mixin_like(obj: &DocObject) -> bool {
    MIXIN_NAME.is_match(&obj.name) || summary_lower(obj).is_some_and(|s| s.contains("mixin"))
}

fn is_record_like(obj: &DocObject) -> bool {
    obj.decorators
        .iter()
        .any(|d| RECORD_DECORATORS.contains(&d.as_str()))
        || base_names(obj).any(|b| RECORD_BASES.contains(&b))
}

fn is_enum_like(obj: &DocObject) -> bool {
    base_names(obj).any(|b| ENUM_BASES.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Docstring;

    fn class(name: &str) -> DocObject {
        DocObject::new(format!("m.{name}"), ObjectKind::Class, name)
    }

    #[test]
    fn modules_and_packages_classify_by_kind() {
        let module = DocObject::new("pkg.mod", ObjectKind::Module, "mod");
        let package = DocObject::new("pkg", ObjectKind::Package, "pkg");
        assert_eq!(classify(&module), Category::Module);
        assert_eq!(classify(&package), Category::Package);
    }

    #[test]
    fn exception_family_bases_win() {
        let obj = class("InvalidPayload").with_bases(["builtins.ValueError"]);
        assert_eq!(classify(&obj), Category::Exception);

        let warning = class("Deprecated").with_bases(["builtins.DeprecationWarning"]);
        assert_eq!(classify(&warning), Category::Exception);

        let root = class("Oops").with_bases(["builtins.BaseException"]);
        assert_eq!(classify(&root), Category::Exception);
    }

    #[test]
    fn abstract_markers() {
        assert_eq!(classify(&class("AbstractStore")), Category::Abstract);
        assert_eq!(classify(&class("BaseHandler")), Category::Abstract);
        assert_eq!(classify(&class("Store").with_abstract()), Category::Abstract);
        assert_eq!(
            classify(&class("Store").with_bases(["abc.ABC"])),
            Category::Abstract
        );
    }

    #[test]
    fn abstract_naming_requires_word_boundary() {
        // "Baseline" is not "Base" + capitalized word.
        assert_eq!(classify(&class("Baseline")), Category::Concrete);
        assert_eq!(classify(&class("Abstraction")), Category::Concrete);
    }

    #[test]
    fn mixin_by_name_and_keyword() {
        assert_eq!(classify(&class("LoggingMixin")), Category::Mixin);

        let by_doc = class("Loggable").with_docstring(Docstring {
            summary: Some("Mixin adding structured logging.".into()),
            ..Docstring::default()
        });
        assert_eq!(classify(&by_doc), Category::Mixin);
    }

    #[test]
    fn record_by_decorator_and_base() {
        let dc = class("Point").with_decorators(["dataclass"]);
        assert_eq!(classify(&dc), Category::DataRecord);

        let nt = class("Pair").with_bases(["typing.NamedTuple"]);
        assert_eq!(classify(&nt), Category::DataRecord);
    }

    #[test]
    fn enumeration_by_base() {
        let e = class("Color").with_bases(["enum.Enum"]);
        assert_eq!(classify(&e), Category::Enumeration);
    }

    #[test]
    fn plain_class_is_concrete() {
        assert_eq!(classify(&class("Agent")), Category::Concrete);
    }

    #[test]
    fn functions_default_to_concrete() {
        let f = DocObject::new("m.run", ObjectKind::Function, "run");
        assert_eq!(classify(&f), Category::Concrete);
    }

    #[test]
    fn earliest_rule_wins_on_ambiguity() {
        // Exception rule (1) beats abstract naming (2).
        let obj = class("BaseError").with_bases(["builtins.Exception"]);
        assert_eq!(classify(&obj), Category::Exception);

        // Mixin (3) beats data-record (4), per the documented rule order.
        let obj = class("FieldsMixin").with_decorators(["dataclass"]);
        assert_eq!(classify(&obj), Category::Mixin);
    }

    #[test]
    fn classification_is_deterministic() {
        let obj = class("AbstractThingMixin").with_bases(["abc.ABC"]);
        let first = classify(&obj);
        for _ in 0..10 {
            assert_eq!(classify(&obj), first);
        }
    }
}
