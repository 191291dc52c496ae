//! Property-based tests for the model crate using proptest.

use proptest::prelude::*;

use docloom_model::{classify, coverage, DocObject, Docstring, ObjectKind, Parameter};

// ============================================================================
// Strategies
// ============================================================================

fn kind_strategy() -> impl Strategy<Value = ObjectKind> {
    prop_oneof![
        Just(ObjectKind::Module),
        Just(ObjectKind::Package),
        Just(ObjectKind::Class),
        Just(ObjectKind::Function),
        Just(ObjectKind::Method),
        Just(ObjectKind::Attribute),
    ]
}

fn docstring_strategy() -> impl Strategy<Value = Docstring> {
    (
        prop::option::of("[A-Za-z ]{1,40}"),
        prop::collection::vec("[a-z]{1,8}", 0..4),
        prop::option::of("[A-Za-z ]{1,20}"),
        prop::collection::vec(">>> [a-z]{1,10}", 0..3),
    )
        .prop_map(|(summary, params, returns, examples)| Docstring {
            raw: String::new(),
            summary,
            params: params
                .into_iter()
                .map(|name| docloom_model::DocParam {
                    name,
                    description: "doc".into(),
                })
                .collect(),
            returns,
            examples,
        })
}

fn object_strategy() -> impl Strategy<Value = DocObject> {
    (
        "[a-z]{1,8}(\\.[a-zA-Z]{1,12}){0,3}",
        kind_strategy(),
        "[A-Za-z][A-Za-z0-9]{0,15}",
        prop::collection::vec("[a-z]{1,6}\\.[A-Z][A-Za-z]{1,12}", 0..4),
        prop::collection::vec("[a-z]{1,8}", 0..4),
        docstring_strategy(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(id, kind, name, bases, params, docstring, is_async, is_abstract)| {
                let mut obj = DocObject::new(id, kind, name)
                    .with_bases(bases)
                    .with_parameters(params.into_iter().map(Parameter::new).collect())
                    .with_docstring(docstring);
                obj.is_async = is_async;
                obj.is_abstract = is_abstract;
                obj
            },
        )
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// classify is a pure function: repeated calls agree.
    #[test]
    fn classify_is_deterministic(obj in object_strategy()) {
        let first = classify(&obj);
        for _ in 0..5 {
            prop_assert_eq!(classify(&obj), first);
        }
    }

    /// classify of a clone agrees with classify of the original.
    #[test]
    fn classify_ignores_identity(obj in object_strategy()) {
        prop_assert_eq!(classify(&obj), classify(&obj.clone()));
    }

    /// Coverage percentage always lands in [0, 100].
    #[test]
    fn coverage_is_bounded(obj in object_strategy()) {
        let cov = coverage::score(&obj);
        prop_assert!(cov.percentage <= 100);
    }

    /// No missing items means a perfect score, and vice versa.
    #[test]
    fn coverage_missing_matches_percentage(obj in object_strategy()) {
        let cov = coverage::score(&obj);
        prop_assert_eq!(cov.missing.is_empty(), cov.percentage == 100);
    }

    /// Scoring never mutates its input (the object stays comparable).
    #[test]
    fn coverage_is_read_only(obj in object_strategy()) {
        let before = obj.clone();
        let _ = coverage::score(&obj);
        prop_assert_eq!(obj, before);
    }
}
