//! File and JSON file validators
//!
//! Both resolve their path against the current directory subject and report
//! at the child path, so issues name the file they are about.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::context::{Context, FsEntry, Subject};
use crate::descriptor::Descriptor;
use crate::engine::Engine;
use crate::error::Result;
use crate::issue::codes;
use crate::registry::Validator;
use crate::rules::{object, validate_all};
use serde_json::Value;
use std::path::Path;

/// Resolve `rel` against the directory subject and check it is a file
///
/// Returns the child context when the file exists with the expected
/// extension, for further checks. The first failure stops the file.
fn open_file<'e>(rel: &str, ext: Option<&str>, ctx: &Context<'e>) -> Option<Context<'e>> {
    let Some(base) = ctx.subject().fs_entry() else {
        ctx.add_issue(
            codes::FILE_NO_BASE,
            format!("Cannot resolve file '{}': subject is not a filesystem path", rel),
        );
        return None;
    };

    let child = ctx.child(rel, Subject::path(base.path().join(rel)));
    let entry = child.subject().fs_entry()?;
    if !entry.exists() {
        child.add_issue(codes::FILE_NOT_FOUND, format!("File not found: {}", rel));
        return None;
    }
    if !entry.is_file() {
        child.add_issue(codes::FILE_NOT_FILE, format!("Path is not a file: {}", rel));
        return None;
    }

    if let Some(expected) = ext {
        let actual = Path::new(rel)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if !actual.eq_ignore_ascii_case(expected) {
            child.add_issue(
                codes::FILE_WRONG_EXT,
                format!("Expected extension .{}, got .{}", expected, actual),
            );
            return None;
        }
    }
    Some(child)
}

fn is_file_at(rel: &str, ctx: &Context<'_>) -> bool {
    ctx.subject()
        .fs_entry()
        .map(|base| base.path().join(rel).is_file())
        .unwrap_or(false)
}

/// Anything at `rel`; without a filesystem base the full check must report
fn exists_at(rel: &str, ctx: &Context<'_>) -> bool {
    ctx.subject()
        .fs_entry()
        .map(|base| FsEntry::new(base.path().join(rel)).exists())
        .unwrap_or(true)
}

pub struct FileValidator;

impl Validator for FileValidator {
    fn validate(&self, descriptor: &Descriptor, _engine: &Engine, ctx: &Context<'_>) -> Result<()> {
        let Descriptor::File(spec) = descriptor else {
            return Err(descriptor.mismatch("File"));
        };
        if let Some(child) = open_file(&spec.path, spec.ext.as_deref(), ctx) {
            validate_all(&spec.content, &child)?;
        }
        Ok(())
    }

    fn matches(
        &self,
        descriptor: &Descriptor,
        _engine: &Engine,
        ctx: &Context<'_>,
    ) -> Result<bool> {
        let Descriptor::File(spec) = descriptor else {
            return Err(descriptor.mismatch("File"));
        };
        Ok(is_file_at(&spec.path, ctx))
    }

    fn present(
        &self,
        descriptor: &Descriptor,
        _engine: &Engine,
        ctx: &Context<'_>,
    ) -> Result<bool> {
        let Descriptor::File(spec) = descriptor else {
            return Err(descriptor.mismatch("File"));
        };
        Ok(exists_at(&spec.path, ctx))
    }
}

pub struct JsonFileValidator;

impl Validator for JsonFileValidator {
    fn validate(&self, descriptor: &Descriptor, _engine: &Engine, ctx: &Context<'_>) -> Result<()> {
        let Descriptor::JsonFile(spec) = descriptor else {
            return Err(descriptor.mismatch("JsonFile"));
        };
        let Some(child) = open_file(&spec.path, None, ctx) else {
            return Ok(());
        };

        let parsed = match child.value() {
            Value::String(text) => serde_json::from_str::<Value>(text)
                .map_err(|e| format!("Invalid JSON in {}: {}", spec.path, e)),
            _ => Err(format!("Could not read {}", spec.path)),
        };
        match parsed {
            Ok(document) => {
                let doc_ctx = child.with_subject(Subject::Value(document));
                object::validate_shape(&spec.required, &spec.optional, &doc_ctx)
            }
            Err(message) => {
                child.add_issue(codes::JSON_PARSE_ERROR, message);
                Ok(())
            }
        }
    }

    fn matches(
        &self,
        descriptor: &Descriptor,
        _engine: &Engine,
        ctx: &Context<'_>,
    ) -> Result<bool> {
        let Descriptor::JsonFile(spec) = descriptor else {
            return Err(descriptor.mismatch("JsonFile"));
        };
        Ok(is_file_at(&spec.path, ctx))
    }

    fn present(
        &self,
        descriptor: &Descriptor,
        _engine: &Engine,
        ctx: &Context<'_>,
    ) -> Result<bool> {
        let Descriptor::JsonFile(spec) = descriptor else {
            return Err(descriptor.mismatch("JsonFile"));
        };
        Ok(exists_at(&spec.path, ctx))
    }
}
