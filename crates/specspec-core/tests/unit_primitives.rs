//! Value-level rules run through the public engine API

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use specspec_core::{Engine, NumRule, Report, Rule};

fn run(source: &str, value: Value) -> Report {
    Engine::new().run(source, value)
}

fn codes(report: &Report) -> Vec<&str> {
    report.codes()
}

#[test]
fn test_str_too_short() {
    let report = run("Str({minLength: 3})", json!("ab"));
    assert!(!report.ok);
    assert_eq!(codes(&report), vec!["str.too_short"]);
}

#[test]
fn test_str_pattern_from_string() {
    let report = run("Str({match: '^v[0-9]+$'})", json!("v12"));
    assert!(report.ok);
    let report = run("Str({match: '^v[0-9]+$'})", json!("12"));
    assert_eq!(codes(&report), vec!["str.pattern_mismatch"]);
}

#[test]
fn test_nan_is_never_a_number() {
    // JSON cannot carry NaN; serde_json turns it into null
    let nan = Value::from(f64::NAN);
    assert!(nan.is_null());

    let engine = Engine::new();
    let report = engine.validate(&Rule::Num(NumRule::new()), nan);
    assert_eq!(codes(&report), vec!["type.mismatch"]);
    assert!(report.issues[0].message.contains("null"));
}

#[test]
fn test_num_constraints() {
    let report = run("Num({min: 1, max: 65535, integer: true})", json!(0.5));
    assert_eq!(codes(&report), vec!["num.not_integer", "num.too_small"]);
    assert!(run("Num({min: -1})", json!(-1)).ok);
}

#[test]
fn test_listof_reports_each_bad_item_by_index() {
    let report = run("ListOf(Num())", json!([1, "two", 3]));
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].path, vec!["[1]"]);
    assert_eq!(report.issues[0].code, "type.mismatch");
}

#[test]
fn test_listof_nested_paths() {
    let spec = "ListOf(Object({required: [Field({key: 'id', value: Num()})]}), {min: 1})";
    let report = run(spec, json!([{"id": 1}, {"id": "x"}, {}]));
    let paths: Vec<String> = report.issues.iter().map(|i| i.display_path()).collect();
    assert_eq!(paths, vec!["[1]/id", "[2]"]);
    assert_eq!(codes(&report), vec!["type.mismatch", "field.missing"]);
}

#[test]
fn test_oneof_literals() {
    let report = run("OneOf('a', 'b', 'c')", json!("d"));
    assert_eq!(codes(&report), vec!["oneof.no_match"]);
    assert!(run("OneOf('a', 'b', 'c')", json!("b")).ok);
}

#[test]
fn test_oneof_uses_silent_matching() {
    assert_eq!(
        codes(&run("OneOf(Num({min: 0}), Str())", json!(-5))),
        vec!["oneof.no_match"]
    );
    assert!(run("OneOf('auto', Num({min: 0}))", json!(5)).ok);
    assert!(run("OneOf(/^v\\d+$/, Bool())", json!("v2")).ok);
}

#[test]
fn test_oneof_reports_inside_matched_branch() {
    // Field options match on presence, so the branch is chosen and then validated
    let spec = "OneOf(Object({required: [Field({key: 'port', value: Num({min: 1})})]}), Str())";
    let report = run(spec, json!({"port": 0}));
    assert_eq!(codes(&report), vec!["oneof.no_match"]);

    let spec = "OneOf(Field({key: 'port', value: Num({min: 1})}), Str())";
    let report = run(spec, json!({"port": 0}));
    assert_eq!(codes(&report), vec!["num.too_small"]);
    assert_eq!(report.issues[0].path, vec!["port"]);
}

#[test]
fn test_oneof_inline_shape_option() {
    let spec = "OneOf('auto', {required: [Field('mode')]})";
    assert!(run(spec, json!("auto")).ok);
    assert!(run(spec, json!({"mode": "fast"})).ok);
    assert_eq!(codes(&run(spec, json!({"speed": 1}))), vec!["oneof.no_match"]);
}

#[test]
fn test_optional_vs_required_field() {
    let optional = run("Field({key: 'name', optional: true})", json!({}));
    assert!(optional.ok);
    assert!(optional.issues.is_empty());

    let required = run("Field({key: 'name', optional: false})", json!({}));
    assert_eq!(codes(&required), vec!["field.missing"]);

    assert!(run("Field({key: 'name', required: false})", json!({})).ok);
}

#[test]
fn test_field_missing_parent() {
    let report = run("Field({key: 'name', required: true})", Value::Null);
    assert_eq!(codes(&report), vec!["field.missing.parent"]);
}

#[test]
fn test_field_value_shorthands() {
    assert!(run("Field({key: 'kind', value: 'service'})", json!({"kind": "service"})).ok);
    assert_eq!(
        codes(&run("Field({key: 'kind', value: /^svc/})", json!({"kind": "job"}))),
        vec!["literal.pattern_mismatch"]
    );
}

#[test]
fn test_is_not() {
    assert!(run("Is.Not(Str())", json!(5)).ok);
    let report = run("Is.Not(Str())", json!("text"));
    assert_eq!(codes(&report), vec!["is.not.fail"]);
    assert!(run("Is.Not(Literal('forbidden'))", json!("fine")).ok);
}

#[test]
fn test_object_optional_members() {
    let spec = "Object({
        required: [Field({key: 'name', value: Str()})],
        optional: [Field({key: 'tags', value: ListOf(Str(), {max: 2})})],
    })";
    assert!(run(spec, json!({"name": "a"})).ok);
    assert_eq!(
        codes(&run(spec, json!({"name": "a", "tags": ["x", "y", "z"]}))),
        vec!["list.too_long"]
    );
    assert_eq!(codes(&run(spec, json!("a"))), vec!["type.mismatch"]);
}

#[test]
fn test_extension_kinds() {
    let spec = "Object({required: [
        Field({key: 'homepage', value: Url({schemes: ['https']})}),
        Field({key: 'version', value: Semver({prerelease: false})}),
    ]})";
    assert!(run(spec, json!({"homepage": "https://specspec.dev", "version": "1.4.0"})).ok);
    let report = run(spec, json!({"homepage": "http://specspec.dev", "version": "1.4.0-rc.1"}));
    assert_eq!(codes(&report), vec!["url.scheme_mismatch", "semver.prerelease"]);
}

#[test]
fn test_extension_kind_as_oneof_option() {
    let spec = "OneOf(Semver(), 'latest')";
    assert!(run(spec, json!("2.0.0")).ok);
    assert!(run(spec, json!("latest")).ok);
    assert_eq!(codes(&run(spec, json!("newest"))), vec!["oneof.no_match"]);
}
