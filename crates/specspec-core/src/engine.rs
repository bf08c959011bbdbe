//! The validation engine and run protocol
//!
//! An [`Engine`] owns the validator registry. [`Engine::load`] turns spec
//! source into a root rule; [`Engine::validate`] walks that rule against a
//! target and always returns a well-formed [`Report`], converting engine
//! errors and panics into a single synthetic issue.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::context::{Context, Subject};
use crate::descriptor::Descriptor;
use crate::dsl::{self, SpecError};
use crate::error::Result;
use crate::ext;
use crate::issue::{codes, Issue, IssueSink, Report};
use crate::registry::{Registry, Validator};
use crate::rules::Rule;
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// What a run validates
#[derive(Debug, Clone)]
pub enum Target {
    /// A file or directory on disk
    Path(PathBuf),
    /// An in-memory document
    Value(Value),
}

impl Target {
    fn into_subject(self) -> Subject {
        match self {
            Target::Path(path) => Subject::path(path),
            Target::Value(value) => Subject::Value(value),
        }
    }
}

impl From<PathBuf> for Target {
    fn from(path: PathBuf) -> Self {
        Target::Path(path)
    }
}

impl From<&Path> for Target {
    fn from(path: &Path) -> Self {
        Target::Path(path.to_path_buf())
    }
}

impl From<Value> for Target {
    fn from(value: Value) -> Self {
        Target::Value(value)
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    registry: Registry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with the built-in structural kinds and the `Url`/`Semver` extensions
    pub fn new() -> Self {
        let mut engine = Self::with_registry(Registry::new());
        crate::validators::register_builtins(&mut engine.registry);
        ext::register(&mut engine);
        engine
    }

    /// Engine over an explicit registry
    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    /// Register a validator for a descriptor kind
    ///
    /// Kinds that are not built in also become factories in spec source.
    pub fn register(&mut self, kind: impl Into<String>, validator: Arc<dyn Validator>) {
        let kind = kind.into();
        debug!(kind = %kind, "registering validator");
        self.registry.register(kind, validator);
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.registry.contains(kind)
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.registry.kinds()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Dispatch a descriptor to its registered validator
    pub fn validate_descriptor(&self, descriptor: &Descriptor, ctx: &Context<'_>) -> Result<()> {
        let kind = descriptor.kind();
        trace!(kind, path = ?ctx.path(), "dispatching descriptor");
        self.registry.lookup(kind)?.validate(descriptor, self, ctx)
    }

    /// Silent presence test through the registered validator
    pub fn descriptor_matches(&self, descriptor: &Descriptor, ctx: &Context<'_>) -> Result<bool> {
        let kind = descriptor.kind();
        trace!(kind, path = ?ctx.path(), "matching descriptor");
        self.registry.lookup(kind)?.matches(descriptor, self, ctx)
    }

    /// Presence test for optional members through the registered validator
    pub fn descriptor_present(&self, descriptor: &Descriptor, ctx: &Context<'_>) -> Result<bool> {
        let kind = descriptor.kind();
        trace!(kind, path = ?ctx.path(), "probing descriptor presence");
        self.registry.lookup(kind)?.present(descriptor, self, ctx)
    }

    /// Parse and evaluate spec source, selecting its root rule
    pub fn load(&self, source: &str) -> std::result::Result<Rule, SpecError> {
        let root = panic::catch_unwind(AssertUnwindSafe(|| dsl::load(self, source)))
            .unwrap_or_else(|payload| {
                Err(SpecError::Crash {
                    message: panic_message(payload.as_ref()),
                })
            })?;
        debug!(root = root.kind(), "spec loaded");
        Ok(root)
    }

    /// Validate a root rule against a target
    pub fn validate(&self, rule: &Rule, target: impl Into<Target>) -> Report {
        let sink = IssueSink::new();
        let subject = target.into().into_subject();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let ctx = Context::with_sink(self, subject, sink.clone());
            rule.validate(&ctx)
        }));

        let report = match outcome {
            Ok(Ok(())) => Report::from_issues(sink.take()),
            Ok(Err(err)) => {
                warn!(error = %err, "validation aborted by engine error");
                Report::single(Issue::error(codes::ENGINE_ERROR, err.to_string(), Vec::new()))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(panic = %message, "rule panicked during validation");
                Report::single(Issue::error(
                    codes::EXECUTOR_CRASH,
                    format!("Rule crashed during validation: {}", message),
                    Vec::new(),
                ))
            }
        };

        debug!(
            ok = report.ok,
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "validation finished"
        );
        report
    }

    /// Load spec source and validate it against a target in one call
    pub fn run(&self, source: &str, target: impl Into<Target>) -> Report {
        match self.load(source) {
            Ok(root) => self.validate(&root, target),
            Err(err) => {
                debug!(code = err.code(), "spec could not be used");
                Report::single(err.to_issue())
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CustomDescriptor;
    use crate::rules::{Evaluable, StrRule};
    use serde_json::json;

    #[derive(Debug)]
    struct Exploding;

    impl Evaluable for Exploding {
        fn name(&self) -> &str {
            "Exploding"
        }

        fn validate(&self, ctx: &Context<'_>) -> Result<()> {
            ctx.add_issue("partial", "recorded before the crash");
            panic!("boom");
        }
    }

    #[test]
    fn test_unregistered_kind_becomes_engine_error() {
        let engine = Engine::new();
        let rule =
            Rule::Contains(Descriptor::Custom(CustomDescriptor::new("Archive", Value::Null)));
        let report = engine.validate(&rule, json!({}));
        assert!(!report.ok);
        assert_eq!(report.codes(), vec!["engine.error"]);
        assert!(report.issues[0].message.contains("Archive"));
    }

    #[test]
    fn test_panic_becomes_single_crash_issue() {
        let engine = Engine::new();
        let rule = Rule::Custom(Arc::new(Exploding));
        let report = engine.validate(&rule, json!(null));
        assert_eq!(report.codes(), vec!["executor.crash"]);
        assert!(report.issues[0].message.contains("boom"));
    }

    #[test]
    fn test_report_present_on_success() {
        let engine = Engine::new();
        let report = engine.validate(&Rule::Str(StrRule::new()), json!("ok"));
        assert!(report.ok);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_builtin_kinds_registered() {
        let engine = Engine::new();
        for kind in ["Field", "File", "Directory", "JsonFile", "Package", "Url", "Semver"] {
            assert!(engine.is_registered(kind), "{kind} missing");
        }
    }
}
