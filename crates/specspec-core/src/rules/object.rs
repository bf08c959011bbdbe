//! Inline object shapes
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::{validate_all, validate_present, Rule};
use crate::context::{type_name, Context};
use crate::error::Result;
use crate::issue::codes;
use serde_json::Value;

/// A `{required, optional}` member list checked against an in-memory object
#[derive(Debug, Clone, Default)]
pub struct ObjectRule {
    pub required: Vec<Rule>,
    pub optional: Vec<Rule>,
}

impl ObjectRule {
    pub fn new(required: Vec<Rule>, optional: Vec<Rule>) -> Self {
        Self { required, optional }
    }

    pub fn validate(&self, ctx: &Context<'_>) -> Result<()> {
        validate_shape(&self.required, &self.optional, ctx)
    }
}

/// Object type check followed by member validation
pub(crate) fn validate_shape(
    required: &[Rule],
    optional: &[Rule],
    ctx: &Context<'_>,
) -> Result<()> {
    match ctx.json() {
        Some(Value::Object(_)) => {}
        Some(other) => {
            ctx.add_issue(
                codes::TYPE_MISMATCH,
                format!("Expected object, got {}", type_name(other)),
            );
            return Ok(());
        }
        None => {
            ctx.add_issue(
                codes::TYPE_MISMATCH,
                "Expected object, got content that is not valid JSON",
            );
            return Ok(());
        }
    }
    validate_members(required, optional, ctx)
}

/// Required members always validate; optional ones only when present
pub(crate) fn validate_members(
    required: &[Rule],
    optional: &[Rule],
    ctx: &Context<'_>,
) -> Result<()> {
    validate_all(required, ctx)?;
    validate_present(optional, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Subject;
    use crate::descriptor::{Descriptor, FieldSpec};
    use crate::engine::Engine;
    use serde_json::json;

    fn run(rule: &ObjectRule, value: Value) -> Vec<String> {
        let engine = Engine::new();
        let ctx = Context::root(&engine, Subject::Value(value));
        rule.validate(&ctx).unwrap();
        ctx.sink().snapshot().into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_non_object_is_type_mismatch() {
        let rule = ObjectRule::default();
        assert_eq!(run(&rule, json!([1, 2])), vec!["type.mismatch"]);
    }

    #[test]
    fn test_absent_optional_member_is_silent() {
        let rule = ObjectRule::new(
            vec![Descriptor::Field(FieldSpec::new("name").value(Rule::Str(Default::default())))
                .into()],
            vec![Descriptor::Field(FieldSpec::new("port").value(Rule::Num(Default::default())))
                .into()],
        );
        assert!(run(&rule, json!({"name": "svc"})).is_empty());
        assert_eq!(run(&rule, json!({"name": "svc", "port": "80"})), vec!["type.mismatch"]);
        assert_eq!(run(&rule, json!({})), vec!["field.missing"]);
    }
}
