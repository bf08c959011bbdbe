//! Validation context: the current subject, its path, and the shared issue list
//!
//! A root context is created once per run. Every descent (field, array index,
//! file, directory) creates a child that extends the path and shares the
//! root's issue list by handle. Silent probes get a fresh, disposable list so
//! that `matches` checks never leak issues into the real result.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::engine::Engine;
use crate::issue::{Issue, IssueSink};
use serde_json::Value;
use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A filesystem entry whose content is read lazily, at most once
#[derive(Debug)]
pub struct FsEntry {
    path: PathBuf,
    text: OnceCell<Value>,
    json: OnceCell<Option<Value>>,
}

impl FsEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            text: OnceCell::new(),
            json: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        fs::symlink_metadata(&self.path).is_ok()
    }

    pub fn is_file(&self) -> bool {
        fs::metadata(&self.path).map(|m| m.is_file()).unwrap_or(false)
    }

    pub fn is_dir(&self) -> bool {
        fs::metadata(&self.path).map(|m| m.is_dir()).unwrap_or(false)
    }

    /// Last path component
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string()
    }

    /// Last path component without its extension, `.` and `..` resolved
    pub fn stem(&self) -> String {
        let resolved = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        resolved
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string()
    }

    /// The file's text as a JSON string, or null when it cannot be read
    pub fn text(&self) -> &Value {
        self.text.get_or_init(|| {
            fs::read_to_string(&self.path)
                .map(Value::String)
                .unwrap_or(Value::Null)
        })
    }

    /// The file parsed as JSON, or None when it is unreadable or malformed
    pub fn json(&self) -> Option<&Value> {
        self.json
            .get_or_init(|| match self.text() {
                Value::String(content) => serde_json::from_str(content).ok(),
                _ => None,
            })
            .as_ref()
    }
}

impl Clone for FsEntry {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

/// What a context is currently looking at
#[derive(Debug, Clone)]
pub enum Subject {
    /// An in-memory JSON value (a field, an array item, a parsed file)
    Value(Value),
    /// A filesystem entry (the target, a nested file or directory)
    Path(FsEntry),
}

impl Subject {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(FsEntry::new(path))
    }

    /// The value that value rules check; a file's text for filesystem subjects
    pub fn value(&self) -> &Value {
        match self {
            Subject::Value(value) => value,
            Subject::Path(entry) => entry.text(),
        }
    }

    /// The subject as JSON: the value itself, or the file parsed as JSON
    pub fn json(&self) -> Option<&Value> {
        match self {
            Subject::Value(value) => Some(value),
            Subject::Path(entry) => entry.json(),
        }
    }

    pub fn fs_entry(&self) -> Option<&FsEntry> {
        match self {
            Subject::Path(entry) => Some(entry),
            Subject::Value(_) => None,
        }
    }
}

/// The (path, subject, shared issue list) triple threaded through a walk
#[derive(Debug)]
pub struct Context<'e> {
    engine: &'e Engine,
    path: Vec<String>,
    subject: Rc<Subject>,
    sink: IssueSink,
    /// How many lazily built rule groups enclose this context
    group_depth: usize,
}

impl<'e> Context<'e> {
    /// Create a root context with a fresh issue list
    pub fn root(engine: &'e Engine, subject: Subject) -> Self {
        Self::with_sink(engine, subject, IssueSink::new())
    }

    /// Create a root context that records into an existing list
    pub fn with_sink(engine: &'e Engine, subject: Subject, sink: IssueSink) -> Self {
        Self {
            engine,
            path: Vec::new(),
            subject: Rc::new(subject),
            sink,
            group_depth: 0,
        }
    }

    /// Descend into a new subject, extending the path by one segment
    pub fn child(&self, segment: impl Into<String>, subject: Subject) -> Context<'e> {
        let mut path = self.path.clone();
        path.push(segment.into());
        Context {
            engine: self.engine,
            path,
            subject: Rc::new(subject),
            sink: self.sink.clone(),
            group_depth: self.group_depth,
        }
    }

    /// Same path and issue list, looking at a different subject
    pub fn with_subject(&self, subject: Subject) -> Context<'e> {
        Context {
            engine: self.engine,
            path: self.path.clone(),
            subject: Rc::new(subject),
            sink: self.sink.clone(),
            group_depth: self.group_depth,
        }
    }

    /// Same path and subject, recording into a disposable list
    pub fn probe(&self) -> Context<'e> {
        Context {
            engine: self.engine,
            path: self.path.clone(),
            subject: Rc::clone(&self.subject),
            sink: IssueSink::new(),
            group_depth: self.group_depth,
        }
    }

    /// Same path, subject and issue list, one rule group deeper
    pub fn enter_group(&self) -> Context<'e> {
        Context {
            engine: self.engine,
            path: self.path.clone(),
            subject: Rc::clone(&self.subject),
            sink: self.sink.clone(),
            group_depth: self.group_depth + 1,
        }
    }

    pub fn group_depth(&self) -> usize {
        self.group_depth
    }

    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn value(&self) -> &Value {
        self.subject.value()
    }

    pub fn json(&self) -> Option<&Value> {
        self.subject.json()
    }

    pub fn sink(&self) -> &IssueSink {
        &self.sink
    }

    /// Record an error at this context's path
    pub fn add_issue(&self, code: &str, message: impl Into<String>) {
        self.sink.push(Issue::error(code, message, self.path.clone()));
    }

    /// Record a warning at this context's path
    pub fn add_warning(&self, code: &str, message: impl Into<String>) {
        self.sink.push(Issue::warning(code, message, self.path.clone()));
    }

    /// Whether this context's list holds zero error-level issues
    pub fn is_clean(&self) -> bool {
        self.sink.error_count() == 0
    }
}

/// JSON type name used in mismatch messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
