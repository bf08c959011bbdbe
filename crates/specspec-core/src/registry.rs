//! Validator trait and the kind-keyed registration table
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::context::Context;
use crate::descriptor::Descriptor;
use crate::engine::Engine;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Checking routine for one descriptor kind
pub trait Validator: Send + Sync {
    /// Record issues for `descriptor` against the context's subject
    fn validate(&self, descriptor: &Descriptor, engine: &Engine, ctx: &Context<'_>) -> Result<()>;

    /// Silent match test, used to pick union options
    fn matches(
        &self,
        _descriptor: &Descriptor,
        _engine: &Engine,
        _ctx: &Context<'_>,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Whether an optional member is there at all and so must be validated
    ///
    /// Defaults to `matches`. Filesystem kinds only test existence, so a
    /// child of the wrong type still gets reported.
    fn present(&self, descriptor: &Descriptor, engine: &Engine, ctx: &Context<'_>) -> Result<bool> {
        self.matches(descriptor, engine, ctx)
    }
}

/// Mapping from descriptor kind to its validator
///
/// Filled once while the engine is configured, read-only during runs.
#[derive(Clone, Default)]
pub struct Registry {
    validators: HashMap<String, Arc<dyn Validator>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator, replacing any previous one for the same kind
    pub fn register(&mut self, kind: impl Into<String>, validator: Arc<dyn Validator>) {
        self.validators.insert(kind.into(), validator);
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.validators.contains_key(kind)
    }

    pub fn lookup(&self, kind: &str) -> Result<&Arc<dyn Validator>> {
        self.validators
            .get(kind)
            .ok_or_else(|| Error::unregistered(kind))
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
