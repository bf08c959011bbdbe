//! Structural descriptors
//!
//! A descriptor is plain data naming a structural constraint ("a file at this
//! path", "a field with this key"). It carries no checking logic of its own;
//! the engine looks up the validator registered for [`Descriptor::kind`] and
//! hands the descriptor over.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::context::Context;
use crate::error::{Error, Result};
use crate::rules::Rule;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Data-only specification of a structural constraint
#[derive(Debug, Clone)]
pub enum Descriptor {
    Field(FieldSpec),
    File(FileSpec),
    Directory(DirectorySpec),
    JsonFile(JsonFileSpec),
    Package(PackageSpec),
    Custom(CustomDescriptor),
}

impl Descriptor {
    /// Registry key used for validator lookup
    pub fn kind(&self) -> &str {
        match self {
            Descriptor::Field(_) => "Field",
            Descriptor::File(_) => "File",
            Descriptor::Directory(_) => "Directory",
            Descriptor::JsonFile(_) => "JsonFile",
            Descriptor::Package(_) => "Package",
            Descriptor::Custom(custom) => &custom.kind,
        }
    }

    /// Error for a validator that was handed the wrong descriptor
    pub fn mismatch(&self, expected: &str) -> Error {
        Error::DescriptorMismatch {
            expected: expected.to_string(),
            found: self.kind().to_string(),
        }
    }
}

/// A key on the current JSON object
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: String,
    pub optional: bool,
    pub value: Option<Box<Rule>>,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            optional: false,
            value: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn value(mut self, rule: Rule) -> Self {
        self.value = Some(Box::new(rule));
        self
    }
}

/// A file relative to the current directory subject
#[derive(Debug, Clone)]
pub struct FileSpec {
    pub path: String,
    /// Expected extension, without the leading dot
    pub ext: Option<String>,
    /// Rules run against the file itself
    pub content: Vec<Rule>,
}

impl FileSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ext: None,
            content: Vec::new(),
        }
    }

    pub fn ext(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        self.ext = Some(ext.trim_start_matches('.').to_string());
        self
    }

    pub fn content(mut self, rules: Vec<Rule>) -> Self {
        self.content = rules;
        self
    }
}

/// A directory, either at a relative path or the current subject itself
#[derive(Debug, Clone, Default)]
pub struct DirectorySpec {
    pub path: Option<String>,
    pub required: Vec<Rule>,
    pub optional: Vec<Rule>,
}

impl DirectorySpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// The current subject as a directory
    pub fn current() -> Self {
        Self::default()
    }

    pub fn required(mut self, rules: Vec<Rule>) -> Self {
        self.required = rules;
        self
    }

    pub fn optional(mut self, rules: Vec<Rule>) -> Self {
        self.optional = rules;
        self
    }
}

/// A JSON document on disk checked as an object
#[derive(Debug, Clone)]
pub struct JsonFileSpec {
    pub path: String,
    pub required: Vec<Rule>,
    pub optional: Vec<Rule>,
}

impl JsonFileSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            required: Vec::new(),
            optional: Vec::new(),
        }
    }

    pub fn required(mut self, rules: Vec<Rule>) -> Self {
        self.required = rules;
        self
    }

    pub fn optional(mut self, rules: Vec<Rule>) -> Self {
        self.optional = rules;
        self
    }
}

/// Builds a rule group from the context it is about to run against
pub type GroupFactory = Arc<dyn Fn(&Context<'_>) -> Result<Vec<Rule>> + Send + Sync>;

/// The rules a package delegates to
#[derive(Clone)]
pub enum SpecGroup {
    /// A fixed list
    Rules(Vec<Rule>),
    /// Produced lazily, once per validation of the owning package
    Factory(GroupFactory),
}

impl SpecGroup {
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&Context<'_>) -> Result<Vec<Rule>> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(f))
    }
}

impl fmt::Debug for SpecGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecGroup::Rules(rules) => f.debug_tuple("Rules").field(rules).finish(),
            SpecGroup::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// A named, reusable rule group with an optional base-name pattern
#[derive(Debug, Clone)]
pub struct PackageSpec {
    pub name: Option<Regex>,
    pub group: SpecGroup,
}

impl PackageSpec {
    pub fn new(group: SpecGroup) -> Self {
        Self { name: None, group }
    }

    pub fn name(mut self, pattern: Regex) -> Self {
        self.name = Some(pattern);
        self
    }
}

/// A host-defined kind; `params` is whatever the spec author passed
#[derive(Debug, Clone)]
pub struct CustomDescriptor {
    pub kind: String,
    pub params: Value,
}

impl CustomDescriptor {
    pub fn new(kind: impl Into<String>, params: Value) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names() {
        assert_eq!(Descriptor::Field(FieldSpec::new("a")).kind(), "Field");
        assert_eq!(
            Descriptor::Custom(CustomDescriptor::new("Archive", json!({}))).kind(),
            "Archive"
        );
    }

    #[test]
    fn test_ext_is_normalized() {
        assert_eq!(FileSpec::new("a.json").ext(".json").ext.as_deref(), Some("json"));
    }

    #[test]
    fn test_mismatch_error() {
        let err = Descriptor::File(FileSpec::new("x")).mismatch("Field");
        assert_eq!(err.to_string(), "Validator for 'Field' received a 'File' descriptor");
    }
}
