//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::context::{Context, FsEntry, Subject};
use crate::descriptor::Descriptor;
use crate::engine::Engine;
use crate::error::Result;
use crate::issue::codes;
use crate::registry::Validator;
use crate::rules::object::validate_members;

/// Checks a directory and its required and optional children
pub struct DirectoryValidator;

impl Validator for DirectoryValidator {
    fn validate(&self, descriptor: &Descriptor, _engine: &Engine, ctx: &Context<'_>) -> Result<()> {
        let Descriptor::Directory(spec) = descriptor else {
            return Err(descriptor.mismatch("Directory"));
        };
        let Some(base) = ctx.subject().fs_entry() else {
            ctx.add_issue(
                codes::DIR_NO_BASE,
                format!(
                    "Cannot resolve directory '{}': subject is not a filesystem path",
                    spec.path.as_deref().unwrap_or(".")
                ),
            );
            return Ok(());
        };

        let nested;
        let dir_ctx = match &spec.path {
            Some(rel) => {
                nested = ctx.child(rel.clone(), Subject::path(base.path().join(rel)));
                &nested
            }
            None => ctx,
        };
        let label = spec.path.as_deref().unwrap_or(".");

        let Some(entry) = dir_ctx.subject().fs_entry() else {
            return Ok(());
        };
        if !entry.exists() {
            dir_ctx.add_issue(codes::DIR_NOT_FOUND, format!("Directory not found: {}", label));
            return Ok(());
        }
        if !entry.is_dir() {
            dir_ctx.add_issue(codes::DIR_NOT_DIR, format!("Path is not a directory: {}", label));
            return Ok(());
        }

        validate_members(&spec.required, &spec.optional, dir_ctx)
    }

    fn matches(
        &self,
        descriptor: &Descriptor,
        _engine: &Engine,
        ctx: &Context<'_>,
    ) -> Result<bool> {
        let Descriptor::Directory(spec) = descriptor else {
            return Err(descriptor.mismatch("Directory"));
        };
        let Some(base) = ctx.subject().fs_entry() else {
            return Ok(false);
        };
        Ok(match &spec.path {
            Some(rel) => base.path().join(rel).is_dir(),
            None => base.is_dir(),
        })
    }

    fn present(
        &self,
        descriptor: &Descriptor,
        _engine: &Engine,
        ctx: &Context<'_>,
    ) -> Result<bool> {
        let Descriptor::Directory(spec) = descriptor else {
            return Err(descriptor.mismatch("Directory"));
        };
        let Some(base) = ctx.subject().fs_entry() else {
            return Ok(true);
        };
        Ok(match &spec.path {
            Some(rel) => FsEntry::new(base.path().join(rel)).exists(),
            None => base.exists(),
        })
    }
}
