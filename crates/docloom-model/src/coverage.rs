//! Documentation-completeness scoring.
//!
//! [`score`] runs a weighted binary checklist over one object: each item is
//! either satisfied or missing, with no partial credit. Items that do not
//! apply to an object (parameter items when nothing is declared, the return
//! item for a void signature) leave both sides of the ratio, so a fully
//! documented zero-parameter function still reaches 100 and a bare class
//! scores 0 rather than inheriting free weight.
//!
//! The score feeds two downstream decisions: very low coverage suppresses
//! enhancement diagrams, and low coverage routes the object through a
//! "needs attention" fragment.

use serde::{Deserialize, Serialize};

use crate::object::DocObject;

/// One item of the coverage checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageItem {
    /// A one-line summary is present. Weight 30.
    Summary,
    /// Every declared parameter is documented. Weight 20.
    ParamDocs,
    /// The return value is documented. Weight 15. Applies only to
    /// callables with a non-void signature.
    Returns,
    /// At least one example block exists. Weight 20.
    Examples,
    /// Every declared parameter carries a type annotation. Weight 15.
    Annotations,
}

impl CoverageItem {
    /// All checklist items, in reporting order.
    pub const ALL: [CoverageItem; 5] = [
        CoverageItem::Summary,
        CoverageItem::ParamDocs,
        CoverageItem::Returns,
        CoverageItem::Examples,
        CoverageItem::Annotations,
    ];

    /// The item's weight. Weights sum to 100.
    pub fn weight(self) -> u32 {
        match self {
            CoverageItem::Summary => 30,
            CoverageItem::ParamDocs => 20,
            CoverageItem::Returns => 15,
            CoverageItem::Examples => 20,
            CoverageItem::Annotations => 15,
        }
    }

    /// Returns the gap name used in reports, e.g. `"param-docs"`.
    pub fn as_str(self) -> &'static str {
        match self {
            CoverageItem::Summary => "summary",
            CoverageItem::ParamDocs => "param-docs",
            CoverageItem::Returns => "returns",
            CoverageItem::Examples => "examples",
            CoverageItem::Annotations => "annotations",
        }
    }
}

impl std::fmt::Display for CoverageItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The coverage result for one object.
///
/// Computed fresh on every render pass; never persisted by this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageScore {
    pub object_id: String,
    /// 0–100, rounded to the nearest integer over the applicable weight.
    pub percentage: u8,
    /// Applicable-but-unsatisfied items, in checklist order.
    pub missing: Vec<CoverageItem>,
}

impl CoverageScore {
    /// Returns `true` if the named gap is present.
    pub fn is_missing(&self, item: CoverageItem) -> bool {
        self.missing.contains(&item)
    }
}

fn applies(item: CoverageItem, obj: &DocObject) -> bool {
    match item {
        CoverageItem::Summary | CoverageItem::Examples => true,
        CoverageItem::ParamDocs | CoverageItem::Annotations => {
            obj.signature_parameters().next().is_some()
        }
        CoverageItem::Returns => obj.kind.is_callable() && obj.has_return_value(),
    }
}

fn satisfied(item: CoverageItem, obj: &DocObject) -> bool {
    match item {
        CoverageItem::Summary => obj
            .docstring
            .summary
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty()),
        CoverageItem::ParamDocs => obj
            .signature_parameters()
            .all(|p| obj.docstring.documents_param(&p.name)),
        CoverageItem::Returns => obj.docstring.returns.is_some(),
        CoverageItem::Examples => !obj.docstring.examples.is_empty(),
        CoverageItem::Annotations => obj.signature_parameters().all(|p| p.annotation.is_some()),
    }
}

/// Scores one object against the checklist.
pub fn score(obj: &DocObject) -> CoverageScore {
    let mut applicable_weight: u32 = 0;
    let mut satisfied_weight: u32 = 0;
    let mut missing = Vec::new();

    for item in CoverageItem::ALL {
        if !applies(item, obj) {
            continue;
        }
        applicable_weight += item.weight();
        if satisfied(item, obj) {
            satisfied_weight += item.weight();
        } else {
            missing.push(item);
        }
    }

    // Summary and examples always apply, so the denominator is never zero.
    let percentage = ((satisfied_weight * 100 + applicable_weight / 2) / applicable_weight) as u8;

    CoverageScore {
        object_id: obj.id.clone(),
        percentage,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{DocParam, Docstring, ObjectKind, Parameter};

    fn documented(summary: bool, params: &[&str], returns: bool, examples: bool) -> Docstring {
        Docstring {
            raw: String::new(),
            summary: summary.then(|| "Does the thing.".to_string()),
            params: params
                .iter()
                .map(|p| DocParam {
                    name: (*p).to_string(),
                    description: "a value".to_string(),
                })
                .collect(),
            returns: returns.then(|| "The result.".to_string()),
            examples: if examples {
                vec![">>> run()".to_string()]
            } else {
                Vec::new()
            },
        }
    }

    #[test]
    fn bare_class_scores_zero() {
        let obj = DocObject::new("m.Agent", ObjectKind::Class, "Agent");
        let cov = score(&obj);
        assert_eq!(cov.percentage, 0);
        assert_eq!(
            cov.missing,
            vec![CoverageItem::Summary, CoverageItem::Examples]
        );
    }

    #[test]
    fn fully_documented_function_scores_100() {
        let obj = DocObject::new("m.run", ObjectKind::Function, "run")
            .with_parameters(vec![Parameter::annotated("task", "str")])
            .with_returns("str")
            .with_docstring(documented(true, &["task"], true, true));
        let cov = score(&obj);
        assert_eq!(cov.percentage, 100);
        assert!(cov.missing.is_empty());
    }

    #[test]
    fn missing_annotations_alone_scores_85() {
        let obj = DocObject::new("m.run", ObjectKind::Function, "run")
            .with_parameters(vec![Parameter::new("task")])
            .with_returns("str")
            .with_docstring(documented(true, &["task"], true, true));
        let cov = score(&obj);
        assert_eq!(cov.percentage, 85);
        assert_eq!(cov.missing, vec![CoverageItem::Annotations]);
    }

    #[test]
    fn zero_parameter_function_renormalizes() {
        // Only summary + examples + returns apply: 65 total weight.
        let obj = DocObject::new("m.now", ObjectKind::Function, "now")
            .with_returns("Timestamp")
            .with_docstring(documented(true, &[], true, false));
        let cov = score(&obj);
        // 45 of 65 satisfied → 69.2 → 69.
        assert_eq!(cov.percentage, 69);
        assert_eq!(cov.missing, vec![CoverageItem::Examples]);
    }

    #[test]
    fn void_signature_skips_the_returns_item() {
        let obj = DocObject::new("m.reset", ObjectKind::Function, "reset")
            .with_docstring(documented(true, &[], false, true));
        let cov = score(&obj);
        assert_eq!(cov.percentage, 100);
        assert!(!cov.is_missing(CoverageItem::Returns));
    }

    #[test]
    fn receiver_only_method_counts_as_parameterless() {
        let obj = DocObject::new("m.C.close", ObjectKind::Method, "close")
            .with_parameters(vec![Parameter::new("self")])
            .with_docstring(documented(true, &[], false, true));
        assert_eq!(score(&obj).percentage, 100);
    }

    #[test]
    fn partially_documented_params_give_no_credit() {
        let obj = DocObject::new("m.run", ObjectKind::Function, "run")
            .with_parameters(vec![
                Parameter::annotated("task", "str"),
                Parameter::annotated("retries", "int"),
            ])
            .with_docstring(documented(true, &["task"], false, false));
        let cov = score(&obj);
        // param-docs is all-or-nothing.
        assert!(cov.is_missing(CoverageItem::ParamDocs));
        assert!(!cov.is_missing(CoverageItem::Annotations));
    }

    #[test]
    fn whitespace_summary_does_not_count() {
        let obj = DocObject::new("m.x", ObjectKind::Function, "x").with_docstring(Docstring {
            summary: Some("   ".into()),
            ..Docstring::default()
        });
        assert!(score(&obj).is_missing(CoverageItem::Summary));
    }

    #[test]
    fn weights_sum_to_100() {
        let total: u32 = CoverageItem::ALL.iter().map(|i| i.weight()).sum();
        assert_eq!(total, 100);
    }
}
