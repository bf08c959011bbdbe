//! Negated rules
//!
//! The inner rule always runs against a disposable probe. A negation that
//! holds records nothing; one that is violated records exactly one issue.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::Rule;
use crate::context::Context;
use crate::error::Result;
use crate::issue::codes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegationFlavor {
    /// `Is.Not(rule)`
    Is,
    /// `Does.Not.Contain(descriptor)`
    DoesNotContain,
}

impl NegationFlavor {
    pub fn kind(&self) -> &'static str {
        match self {
            NegationFlavor::Is => "Is.Not",
            NegationFlavor::DoesNotContain => "Does.Not.Contain",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            NegationFlavor::Is => codes::IS_NOT_FAIL,
            NegationFlavor::DoesNotContain => codes::DOES_NOT_CONTAIN_FAIL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Negation {
    pub flavor: NegationFlavor,
    pub inner: Box<Rule>,
}

impl Negation {
    pub fn is_not(inner: Rule) -> Self {
        Self {
            flavor: NegationFlavor::Is,
            inner: Box::new(inner),
        }
    }

    pub fn does_not_contain(inner: Rule) -> Self {
        Self {
            flavor: NegationFlavor::DoesNotContain,
            inner: Box::new(inner),
        }
    }

    pub fn validate(&self, ctx: &Context<'_>) -> Result<()> {
        let probe = ctx.probe();
        self.inner.validate(&probe)?;
        if probe.is_clean() {
            let message = match self.flavor {
                NegationFlavor::Is => {
                    format!("Expected value not to satisfy {}", self.inner.describe())
                }
                NegationFlavor::DoesNotContain => {
                    format!("Expected {} not to be present", self.inner.describe())
                }
            };
            ctx.add_issue(self.flavor.code(), message);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Subject;
    use crate::engine::Engine;
    use crate::rules::StrRule;
    use serde_json::json;

    #[test]
    fn test_negation_swallows_inner_issues() {
        let engine = Engine::new();
        let rule = Rule::Not(Negation::is_not(Rule::Str(StrRule::new().min_length(10))));

        let ctx = Context::root(&engine, Subject::Value(json!("short")));
        rule.validate(&ctx).unwrap();
        assert!(ctx.sink().is_empty());

        let ctx = Context::root(&engine, Subject::Value(json!("long enough value")));
        rule.validate(&ctx).unwrap();
        let codes: Vec<String> = ctx.sink().snapshot().into_iter().map(|i| i.code).collect();
        assert_eq!(codes, vec!["is.not.fail"]);
    }
}
