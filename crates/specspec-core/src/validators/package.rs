//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::context::{Context, FsEntry};
use crate::descriptor::{Descriptor, PackageSpec, SpecGroup};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::issue::codes;
use crate::registry::Validator;
use crate::rules::validate_all;
use std::fs;
use tracing::trace;

/// Lazily built rule groups nested deeper than this fail the run
pub const MAX_GROUP_DEPTH: usize = 32;

/// Runs a package's rule group against the current context
///
/// Filesystem subjects must be readable directories and, when a name pattern
/// is given, have a matching base name (without extension). In-memory
/// subjects skip those checks.
pub struct PackageValidator;

impl Validator for PackageValidator {
    fn validate(&self, descriptor: &Descriptor, _engine: &Engine, ctx: &Context<'_>) -> Result<()> {
        let Descriptor::Package(spec) = descriptor else {
            return Err(descriptor.mismatch("Package"));
        };

        if let Some(entry) = ctx.subject().fs_entry() {
            if !open_bundle(entry, spec, ctx) {
                return Ok(());
            }
        }

        match &spec.group {
            SpecGroup::Rules(rules) => validate_all(rules, ctx),
            SpecGroup::Factory(factory) => {
                if ctx.group_depth() >= MAX_GROUP_DEPTH {
                    return Err(Error::SpecGroup {
                        kind: "Package".to_string(),
                        message: format!("rule groups nested more than {} deep", MAX_GROUP_DEPTH),
                    });
                }
                trace!(
                    path = ?ctx.path(),
                    depth = ctx.group_depth(),
                    "building package rule group"
                );
                let group_ctx = ctx.enter_group();
                let rules = factory(&group_ctx)?;
                validate_all(&rules, &group_ctx)
            }
        }
    }

    fn matches(&self, descriptor: &Descriptor, engine: &Engine, ctx: &Context<'_>) -> Result<bool> {
        let probe = ctx.probe();
        self.validate(descriptor, engine, &probe)?;
        Ok(probe.is_clean())
    }
}

/// Check that a filesystem bundle can be validated; false stops the package
fn open_bundle(entry: &FsEntry, spec: &PackageSpec, ctx: &Context<'_>) -> bool {
    let display = entry.path().display();
    if !entry.exists() {
        ctx.add_issue(codes::BUNDLE_NOT_FOUND, format!("Bundle not found: {}", display));
        return false;
    }
    if entry.is_file() {
        ctx.add_issue(
            codes::BUNDLE_TYPE_MISMATCH,
            format!("Expected a directory bundle, got a file: {}", display),
        );
        return false;
    }
    if !entry.is_dir() {
        ctx.add_issue(codes::BUNDLE_INVALID, format!("Not a valid bundle: {}", display));
        return false;
    }
    if let Err(e) = fs::read_dir(entry.path()) {
        ctx.add_issue(
            codes::BUNDLE_OPEN_ERROR,
            format!("Cannot open bundle {}: {}", display, e),
        );
        return false;
    }

    if let Some(pattern) = &spec.name {
        let name = entry.stem();
        if !pattern.is_match(&name) {
            ctx.add_issue(
                codes::BUNDLE_NAME_MISMATCH,
                format!(
                    "Bundle name '{}' does not match pattern {}",
                    name,
                    pattern.as_str()
                ),
            );
        }
    }
    true
}
