//! Property-based tests for the rule engine
//!
//! These check laws that must hold for any input document rather than
//! individual cases.

use proptest::prelude::*;
use serde_json::{json, Value};
use specspec_core::Engine;

/// Strategy for generating random JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        16, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                proptest::collection::hash_map("[a-z]{1,6}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// Specs exercising every value-level rule kind
fn spec_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("Str({minLength: 2, maxLength: 8})"),
        Just("Num({min: 0, integer: true})"),
        Just("ListOf(OneOf(Num(), Str({match: /^[a-z]+$/})), {max: 3})"),
        Just("Object({required: [Field('a')], optional: [Field({key: 'b', value: Bool()})]})"),
        Just("Is.Not(Literal(null))"),
        Just("OneOf({required: [Field('name')]}, ListOf(Str()), 'x')"),
    ]
}

proptest! {
    /// Property: The same spec over the same input yields the same report
    #[test]
    fn prop_validation_deterministic(
        spec in spec_strategy(),
        input in json_value_strategy(),
    ) {
        let engine = Engine::new();
        let root = engine.load(spec).expect("spec should load");

        let first = engine.validate(&root, input.clone());
        let second = engine.validate(&root, input);
        prop_assert_eq!(first, second);
    }

    /// Property: Runs never crash and `ok` agrees with the issue levels
    #[test]
    fn prop_report_is_well_formed(
        spec in spec_strategy(),
        input in json_value_strategy(),
    ) {
        let report = Engine::new().run(spec, input);
        prop_assert_eq!(report.ok, report.errors().count() == 0);
        for issue in &report.issues {
            prop_assert!(issue.code != "executor.crash" && issue.code != "engine.error");
        }
    }

    /// Property: Every issue from a list rule sits under the index of a failing item
    #[test]
    fn prop_list_issues_are_indexed(
        items in proptest::collection::vec(json_value_strategy(), 0..8),
    ) {
        let engine = Engine::new();
        let report = engine.run("ListOf(Num())", Value::Array(items.clone()));

        let bad: Vec<String> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_number())
            .map(|(i, _)| format!("[{}]", i))
            .collect();
        let reported: Vec<String> = report
            .issues
            .iter()
            .map(|issue| issue.path[0].clone())
            .collect();
        prop_assert_eq!(reported, bad);
    }

    /// Property: A negation fails exactly when its inner rule passes
    #[test]
    fn prop_negation_is_complement(
        input in json_value_strategy(),
    ) {
        let engine = Engine::new();
        let plain = engine.run("Str({minLength: 3})", input.clone());
        let negated = engine.run("Is.Not(Str({minLength: 3}))", input);

        prop_assert_eq!(negated.ok, !plain.ok);
        if !negated.ok {
            prop_assert_eq!(negated.codes(), vec!["is.not.fail"]);
        }
    }

    /// Property: An optional member never reports when its key is absent
    #[test]
    fn prop_optional_absent_is_silent(
        name in "[a-z]{1,10}",
    ) {
        let engine = Engine::new();
        let report = engine.run(
            "Object({optional: [Field({key: 'zzz_absent', value: Num()})]})",
            json!({"name": name}),
        );
        prop_assert!(report.ok);
        prop_assert!(report.issues.is_empty());
    }
}
