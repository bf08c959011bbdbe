//! Leaf value checks: strings, numbers, booleans, literals and patterns
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::context::{type_name, Context};
use crate::issue::codes;
use regex::Regex;
use serde_json::Value;

/// String type check with optional length and pattern constraints
#[derive(Debug, Clone, Default)]
pub struct StrRule {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
}

impl StrRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn check(&self, ctx: &Context<'_>) {
        let value = ctx.value();
        let Some(s) = value.as_str() else {
            ctx.add_issue(
                codes::TYPE_MISMATCH,
                format!("Expected string, got {}", type_name(value)),
            );
            return;
        };

        let len = s.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                ctx.add_issue(
                    codes::STR_TOO_SHORT,
                    format!("String length {} is less than minimum {}", len, min),
                );
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                ctx.add_issue(
                    codes::STR_TOO_LONG,
                    format!("String length {} exceeds maximum {}", len, max),
                );
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(s) {
                ctx.add_issue(
                    codes::STR_PATTERN_MISMATCH,
                    format!("String does not match pattern {}", pattern.as_str()),
                );
            }
        }
    }
}

/// Number type check with optional bounds and integrality
#[derive(Debug, Clone, Default)]
pub struct NumRule {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub integer: bool,
}

impl NumRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    pub fn check(&self, ctx: &Context<'_>) {
        let value = ctx.value();
        match value.as_f64() {
            Some(num) => self.check_number(num, ctx),
            None => ctx.add_issue(
                codes::TYPE_MISMATCH,
                format!("Expected number, got {}", type_name(value)),
            ),
        }
    }

    /// Bounds and integrality for an already extracted number; NaN is not one
    pub fn check_number(&self, num: f64, ctx: &Context<'_>) {
        if num.is_nan() {
            ctx.add_issue(codes::TYPE_MISMATCH, "Expected number, got NaN");
            return;
        }

        if self.integer && num.fract() != 0.0 {
            ctx.add_issue(
                codes::NUM_NOT_INTEGER,
                format!("Expected integer, got {}", num),
            );
        }
        if let Some(min) = self.min {
            if num < min {
                ctx.add_issue(
                    codes::NUM_TOO_SMALL,
                    format!("Number {} is less than minimum {}", num, min),
                );
            }
        }
        if let Some(max) = self.max {
            if num > max {
                ctx.add_issue(
                    codes::NUM_TOO_LARGE,
                    format!("Number {} exceeds maximum {}", num, max),
                );
            }
        }
    }
}

pub fn check_bool(ctx: &Context<'_>) {
    let value = ctx.value();
    if !value.is_boolean() {
        ctx.add_issue(
            codes::TYPE_MISMATCH,
            format!("Expected boolean, got {}", type_name(value)),
        );
    }
}

/// Exact equality against a data value
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub expected: Value,
}

impl Literal {
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn check(&self, ctx: &Context<'_>) {
        let value = ctx.value();
        if !literal_eq(value, &self.expected) {
            ctx.add_issue(
                codes::LITERAL_MISMATCH,
                format!("Expected {}, got {}", self.expected, value),
            );
        }
    }
}

/// Numbers compare by value so that `1` equals `1.0`
fn literal_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => actual == expected,
    }
}

/// Regex test against a string value
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub pattern: Regex,
}

impl PatternRule {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    pub fn check(&self, ctx: &Context<'_>) {
        let value = ctx.value();
        let Some(s) = value.as_str() else {
            ctx.add_issue(
                codes::TYPE_MISMATCH,
                format!("Expected string for pattern match, got {}", type_name(value)),
            );
            return;
        };
        if !self.pattern.is_match(s) {
            ctx.add_issue(
                codes::LITERAL_PATTERN_MISMATCH,
                format!("Value does not match pattern {}", self.pattern.as_str()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Subject;
    use crate::engine::Engine;
    use serde_json::json;

    fn codes_for(check: impl Fn(&Context<'_>), value: Value) -> Vec<String> {
        let engine = Engine::new();
        let ctx = Context::root(&engine, Subject::Value(value));
        check(&ctx);
        ctx.sink().snapshot().into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_str_too_short() {
        let rule = StrRule::new().min_length(3);
        assert_eq!(codes_for(|c| rule.check(c), json!("ab")), vec!["str.too_short"]);
    }

    #[test]
    fn test_str_reports_every_violated_constraint() {
        let rule = StrRule::new()
            .max_length(2)
            .pattern(Regex::new("^[0-9]+$").unwrap());
        assert_eq!(
            codes_for(|c| rule.check(c), json!("abc")),
            vec!["str.too_long", "str.pattern_mismatch"]
        );
    }

    #[test]
    fn test_str_counts_characters_not_bytes() {
        let rule = StrRule::new().max_length(3);
        assert!(codes_for(|c| rule.check(c), json!("héé")).is_empty());
    }

    #[test]
    fn test_num_rejects_nan_and_non_numbers() {
        let rule = NumRule::new().min(0.0);
        assert_eq!(
            codes_for(|c| rule.check_number(f64::NAN, c), json!(null)),
            vec!["type.mismatch"]
        );
        assert!(codes_for(|c| rule.check_number(f64::INFINITY, c), json!(null)).is_empty());
        assert_eq!(
            codes_for(|c| rule.check_number(f64::NEG_INFINITY, c), json!(null)),
            vec!["num.too_small"]
        );
        assert_eq!(codes_for(|c| rule.check(c), json!("5")), vec!["type.mismatch"]);
        assert_eq!(codes_for(|c| rule.check(c), json!(true)), vec!["type.mismatch"]);
    }

    #[test]
    fn test_num_bounds_and_integer() {
        let rule = NumRule::new().min(0.0).max(10.0).integer();
        assert_eq!(
            codes_for(|c| rule.check(c), json!(-1.5)),
            vec!["num.not_integer", "num.too_small"]
        );
        assert_eq!(codes_for(|c| rule.check(c), json!(11)), vec!["num.too_large"]);
        assert!(codes_for(|c| rule.check(c), json!(4.0)).is_empty());
    }

    #[test]
    fn test_bool() {
        assert!(codes_for(check_bool, json!(false)).is_empty());
        assert_eq!(codes_for(check_bool, json!(0)), vec!["type.mismatch"]);
    }

    #[test]
    fn test_literal_numeric_equality() {
        let rule = Literal::new(1);
        assert!(codes_for(|c| rule.check(c), json!(1.0)).is_empty());
        assert_eq!(codes_for(|c| rule.check(c), json!("1")), vec!["literal.mismatch"]);
    }

    #[test]
    fn test_pattern_is_unanchored() {
        let rule = PatternRule::new(Regex::new("b+").unwrap());
        assert!(codes_for(|c| rule.check(c), json!("abbc")).is_empty());
        assert_eq!(
            codes_for(|c| rule.check(c), json!("xyz")),
            vec!["literal.pattern_mismatch"]
        );
        assert_eq!(codes_for(|c| rule.check(c), json!(3)), vec!["type.mismatch"]);
    }
}
