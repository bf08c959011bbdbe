//! Rule kinds and the evaluable contract
//!
//! Built-in kinds form a closed enum. Structural kinds (fields, files,
//! directories, packages and any host-registered kind) are plain-data
//! [`Descriptor`]s reached through [`Rule::Contains`] and checked by whatever
//! validator the engine has registered for their kind. Hosts that want a
//! value check without going through the registry implement [`Evaluable`].
//!
//! Every rule supports two modes that must agree: `validate` records issues
//! on the context, `matches` answers silently whether the subject passes.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod combinators;
pub mod negation;
pub mod object;
pub mod primitives;

pub use combinators::{ListOf, OneOf};
pub use negation::{Negation, NegationFlavor};
pub use object::ObjectRule;
pub use primitives::{Literal, NumRule, PatternRule, StrRule};

use crate::context::Context;
use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// A rule kind supplied by the host as Rust code
pub trait Evaluable: fmt::Debug + Send + Sync {
    /// Kind name used in diagnostics
    fn name(&self) -> &str;

    /// Record issues for the context's subject
    fn validate(&self, _ctx: &Context<'_>) -> Result<()> {
        Err(Error::NotImplemented {
            kind: self.name().to_string(),
            operation: "validate",
        })
    }

    /// Silent check; defaults to validating against a disposable probe
    fn matches(&self, ctx: &Context<'_>) -> Result<bool> {
        let probe = ctx.probe();
        self.validate(&probe)?;
        Ok(probe.is_clean())
    }
}

/// One checkable constraint
#[derive(Debug, Clone)]
pub enum Rule {
    Str(StrRule),
    Num(NumRule),
    Bool,
    Literal(Literal),
    Pattern(PatternRule),
    Object(ObjectRule),
    OneOf(OneOf),
    ListOf(ListOf),
    Not(Negation),
    /// Structural containment, dispatched through the validator registry
    Contains(Descriptor),
    Custom(Arc<dyn Evaluable>),
}

impl Rule {
    /// Kind name of this rule, as spec authors write it
    pub fn kind(&self) -> &str {
        match self {
            Rule::Str(_) => "Str",
            Rule::Num(_) => "Num",
            Rule::Bool => "Bool",
            Rule::Literal(_) => "Literal",
            Rule::Pattern(_) => "Pattern",
            Rule::Object(_) => "Object",
            Rule::OneOf(_) => "OneOf",
            Rule::ListOf(_) => "ListOf",
            Rule::Not(n) => n.flavor.kind(),
            Rule::Contains(d) => d.kind(),
            Rule::Custom(e) => e.name(),
        }
    }

    /// Short human description, used when listing OneOf options
    pub fn describe(&self) -> String {
        match self {
            Rule::Literal(l) => l.expected.to_string(),
            Rule::Pattern(p) => format!("/{}/", p.pattern.as_str()),
            other => other.kind().to_string(),
        }
    }

    /// Check the context's subject, recording issues on it
    ///
    /// Errors are reserved for a broken engine or rule tree; failed
    /// constraints are always issues.
    pub fn validate(&self, ctx: &Context<'_>) -> Result<()> {
        match self {
            Rule::Str(rule) => rule.check(ctx),
            Rule::Num(rule) => rule.check(ctx),
            Rule::Bool => primitives::check_bool(ctx),
            Rule::Literal(rule) => rule.check(ctx),
            Rule::Pattern(rule) => rule.check(ctx),
            Rule::Object(rule) => rule.validate(ctx)?,
            Rule::OneOf(rule) => rule.validate(ctx)?,
            Rule::ListOf(rule) => rule.validate(ctx)?,
            Rule::Not(rule) => rule.validate(ctx)?,
            Rule::Contains(descriptor) => ctx.engine().validate_descriptor(descriptor, ctx)?,
            Rule::Custom(rule) => rule.validate(ctx)?,
        }
        Ok(())
    }

    /// Silent check, never touching the context's issue list
    ///
    /// Descriptors answer through their validator, which for the built-in
    /// structural kinds is a presence test; everything else is a full
    /// validation against a disposable probe.
    pub fn matches(&self, ctx: &Context<'_>) -> Result<bool> {
        match self {
            Rule::Contains(descriptor) => ctx.engine().descriptor_matches(descriptor, ctx),
            Rule::Custom(rule) => rule.matches(ctx),
            other => {
                let probe = ctx.probe();
                other.validate(&probe)?;
                Ok(probe.is_clean())
            }
        }
    }

    /// Whether an optional member is present; descriptors ask their validator
    pub fn is_present(&self, ctx: &Context<'_>) -> Result<bool> {
        match self {
            Rule::Contains(descriptor) => ctx.engine().descriptor_present(descriptor, ctx),
            other => other.matches(ctx),
        }
    }

    pub fn descriptor(&self) -> Option<&Descriptor> {
        match self {
            Rule::Contains(descriptor) => Some(descriptor),
            _ => None,
        }
    }
}

impl From<Descriptor> for Rule {
    fn from(descriptor: Descriptor) -> Self {
        Rule::Contains(descriptor)
    }
}

/// Validate rules in order against one context
pub fn validate_all(rules: &[Rule], ctx: &Context<'_>) -> Result<()> {
    for rule in rules {
        rule.validate(ctx)?;
    }
    Ok(())
}

/// Validate each rule only when it matches silently first
///
/// An absent optional member produces no issues; a present one gets full
/// reporting validation.
pub fn validate_present(rules: &[Rule], ctx: &Context<'_>) -> Result<()> {
    for rule in rules {
        if rule.is_present(ctx)? {
            rule.validate(ctx)?;
        }
    }
    Ok(())
}
