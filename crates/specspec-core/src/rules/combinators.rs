//! Union and list combinators
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::Rule;
use crate::context::{type_name, Context, Subject};
use crate::error::Result;
use crate::issue::codes;

/// First option that matches silently is validated in reporting mode
#[derive(Debug, Clone, Default)]
pub struct OneOf {
    pub options: Vec<Rule>,
}

impl OneOf {
    pub fn new(options: Vec<Rule>) -> Self {
        Self { options }
    }

    pub fn validate(&self, ctx: &Context<'_>) -> Result<()> {
        for option in &self.options {
            if option.matches(ctx)? {
                return option.validate(ctx);
            }
        }

        let expected: Vec<String> = self.options.iter().map(Rule::describe).collect();
        ctx.add_issue(
            codes::ONEOF_NO_MATCH,
            format!("Value does not match any of: {}", expected.join(", ")),
        );
        Ok(())
    }
}

/// Array check with length bounds and a per-item rule
#[derive(Debug, Clone)]
pub struct ListOf {
    pub item: Box<Rule>,
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl ListOf {
    pub fn new(item: Rule) -> Self {
        Self {
            item: Box::new(item),
            min: None,
            max: None,
        }
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn validate(&self, ctx: &Context<'_>) -> Result<()> {
        let value = ctx.value();
        let Some(items) = value.as_array() else {
            ctx.add_issue(
                codes::TYPE_MISMATCH,
                format!("Expected array, got {}", type_name(value)),
            );
            return Ok(());
        };

        if let Some(min) = self.min {
            if items.len() < min {
                ctx.add_issue(
                    codes::LIST_TOO_SHORT,
                    format!("List length {} is less than minimum {}", items.len(), min),
                );
            }
        }
        if let Some(max) = self.max {
            if items.len() > max {
                ctx.add_issue(
                    codes::LIST_TOO_LONG,
                    format!("List length {} exceeds maximum {}", items.len(), max),
                );
            }
        }

        for (index, item) in items.iter().enumerate() {
            let child = ctx.child(format!("[{}]", index), Subject::Value(item.clone()));
            self.item.validate(&child)?;
        }
        Ok(())
    }
}
