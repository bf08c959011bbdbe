//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::context::{Context, Subject};
use crate::descriptor::Descriptor;
use crate::engine::Engine;
use crate::error::Result;
use crate::issue::codes;
use crate::registry::Validator;
use serde_json::Value;

/// Checks a key on the subject's JSON object
pub struct FieldValidator;

impl Validator for FieldValidator {
    fn validate(&self, descriptor: &Descriptor, _engine: &Engine, ctx: &Context<'_>) -> Result<()> {
        let Descriptor::Field(spec) = descriptor else {
            return Err(descriptor.mismatch("Field"));
        };

        let Some(Value::Object(map)) = ctx.json() else {
            if !spec.optional {
                ctx.add_issue(
                    codes::FIELD_MISSING_PARENT,
                    format!(
                        "Cannot check required field '{}': parent is not a JSON object",
                        spec.key
                    ),
                );
            }
            return Ok(());
        };

        match map.get(&spec.key) {
            Some(value) => {
                if let Some(rule) = &spec.value {
                    let child = ctx.child(spec.key.clone(), Subject::Value(value.clone()));
                    rule.validate(&child)?;
                }
            }
            None if !spec.optional => {
                ctx.add_issue(
                    codes::FIELD_MISSING,
                    format!("Missing required field: {}", spec.key),
                );
            }
            None => {}
        }
        Ok(())
    }

    fn matches(
        &self,
        descriptor: &Descriptor,
        _engine: &Engine,
        ctx: &Context<'_>,
    ) -> Result<bool> {
        let Descriptor::Field(spec) = descriptor else {
            return Err(descriptor.mismatch("Field"));
        };
        Ok(matches!(ctx.json(), Some(Value::Object(map)) if map.contains_key(&spec.key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldSpec;
    use crate::rules::{Rule, StrRule};
    use serde_json::json;

    fn codes_for(spec: FieldSpec, value: Value) -> Vec<String> {
        let engine = Engine::new();
        let ctx = Context::root(&engine, Subject::Value(value));
        FieldValidator
            .validate(&Descriptor::Field(spec), &engine, &ctx)
            .unwrap();
        ctx.sink().snapshot().into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_optional_vs_required() {
        assert!(codes_for(FieldSpec::new("name").optional(), json!({})).is_empty());
        assert_eq!(codes_for(FieldSpec::new("name"), json!({})), vec!["field.missing"]);
    }

    #[test]
    fn test_unparsed_parent_is_distinct() {
        assert_eq!(
            codes_for(FieldSpec::new("name"), Value::Null),
            vec!["field.missing.parent"]
        );
        assert!(codes_for(FieldSpec::new("name").optional(), Value::Null).is_empty());
    }

    #[test]
    fn test_value_rule_runs_at_child_path() {
        let engine = Engine::new();
        let ctx = Context::root(&engine, Subject::Value(json!({"name": 7})));
        let spec = FieldSpec::new("name").value(Rule::Str(StrRule::new()));
        FieldValidator
            .validate(&Descriptor::Field(spec), &engine, &ctx)
            .unwrap();
        let issues = ctx.sink().snapshot();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, vec!["name"]);
    }

    #[test]
    fn test_rejects_foreign_descriptor() {
        let engine = Engine::new();
        let ctx = Context::root(&engine, Subject::Value(json!({})));
        let other = Descriptor::Directory(Default::default());
        assert!(FieldValidator.validate(&other, &engine, &ctx).is_err());
    }
}
