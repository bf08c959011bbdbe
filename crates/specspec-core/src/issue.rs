//! Issues, the shared issue list, and the run report
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Stable issue codes, namespaced by rule kind and failure reason
pub mod codes {
    pub const TYPE_MISMATCH: &str = "type.mismatch";

    pub const STR_TOO_SHORT: &str = "str.too_short";
    pub const STR_TOO_LONG: &str = "str.too_long";
    pub const STR_PATTERN_MISMATCH: &str = "str.pattern_mismatch";

    pub const NUM_NOT_INTEGER: &str = "num.not_integer";
    pub const NUM_TOO_SMALL: &str = "num.too_small";
    pub const NUM_TOO_LARGE: &str = "num.too_large";

    pub const LITERAL_MISMATCH: &str = "literal.mismatch";
    pub const LITERAL_PATTERN_MISMATCH: &str = "literal.pattern_mismatch";

    pub const FIELD_MISSING: &str = "field.missing";
    pub const FIELD_MISSING_PARENT: &str = "field.missing.parent";

    pub const FILE_NO_BASE: &str = "file.no_base";
    pub const FILE_NOT_FOUND: &str = "file.not_found";
    pub const FILE_NOT_FILE: &str = "file.not_file";
    pub const FILE_WRONG_EXT: &str = "file.wrong_ext";
    pub const JSON_PARSE_ERROR: &str = "json.parse_error";

    pub const DIR_NO_BASE: &str = "dir.no_base";
    pub const DIR_NOT_FOUND: &str = "dir.not_found";
    pub const DIR_NOT_DIR: &str = "dir.not_dir";

    pub const BUNDLE_NOT_FOUND: &str = "bundle.not_found";
    pub const BUNDLE_NAME_MISMATCH: &str = "bundle.name_mismatch";
    pub const BUNDLE_TYPE_MISMATCH: &str = "bundle.type_mismatch";
    pub const BUNDLE_INVALID: &str = "bundle.invalid";
    pub const BUNDLE_OPEN_ERROR: &str = "bundle.open_error";

    pub const ONEOF_NO_MATCH: &str = "oneof.no_match";
    pub const LIST_TOO_SHORT: &str = "list.too_short";
    pub const LIST_TOO_LONG: &str = "list.too_long";

    pub const IS_NOT_FAIL: &str = "is.not.fail";
    pub const DOES_NOT_CONTAIN_FAIL: &str = "does.not.contain.fail";

    pub const URL_INVALID: &str = "url.invalid";
    pub const URL_SCHEME_MISMATCH: &str = "url.scheme_mismatch";
    pub const SEMVER_INVALID: &str = "semver.invalid";
    pub const SEMVER_PRERELEASE: &str = "semver.prerelease";

    pub const SPEC_SYNTAX_ERROR: &str = "spec.syntax_error";
    pub const SPEC_CRASH: &str = "spec.crash";
    pub const SPEC_EMPTY: &str = "spec.empty";
    pub const SPEC_NO_ROOT: &str = "spec.no_root";
    pub const ENGINE_ERROR: &str = "engine.error";
    pub const EXECUTOR_CRASH: &str = "executor.crash";
}

/// Severity of an issue; only errors affect pass/fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Warning => write!(f, "warning"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// One reported constraint violation or warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub level: Level,
    pub code: String,
    pub message: String,
    pub path: Vec<String>,
}

impl Issue {
    /// Create an error-level issue
    pub fn error(code: impl Into<String>, message: impl Into<String>, path: Vec<String>) -> Self {
        Self {
            level: Level::Error,
            code: code.into(),
            message: message.into(),
            path,
        }
    }

    /// Create a warning-level issue
    pub fn warning(code: impl Into<String>, message: impl Into<String>, path: Vec<String>) -> Self {
        Self {
            level: Level::Warning,
            code: code.into(),
            message: message.into(),
            path,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }

    /// Path joined with `/`, or `(root)` when empty
    pub fn display_path(&self) -> String {
        if self.path.is_empty() {
            "(root)".to_string()
        } else {
            self.path.join("/")
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] at {}: {}",
            self.level,
            self.code,
            self.display_path(),
            self.message
        )
    }
}

/// Insertion-ordered issue list shared by a root context and all its children
///
/// Cloning the sink clones the handle, not the list.
#[derive(Debug, Clone, Default)]
pub struct IssueSink {
    issues: Rc<RefCell<Vec<Issue>>>,
}

impl IssueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, issue: Issue) {
        self.issues.borrow_mut().push(issue);
    }

    pub fn len(&self) -> usize {
        self.issues.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.borrow().is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.issues.borrow().iter().filter(|i| i.is_error()).count()
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Vec<Issue> {
        self.issues.borrow().clone()
    }

    /// Drain the list, leaving it empty
    pub fn take(&self) -> Vec<Issue> {
        std::mem::take(&mut *self.issues.borrow_mut())
    }

    /// Whether two handles point at the same list
    pub fn shares(&self, other: &IssueSink) -> bool {
        Rc::ptr_eq(&self.issues, &other.issues)
    }
}

/// Result of one validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub ok: bool,
    pub issues: Vec<Issue>,
}

impl Report {
    /// Build a report; `ok` iff there are no error-level issues
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        let ok = !issues.iter().any(Issue::is_error);
        Self { ok, issues }
    }

    /// A failed report carrying exactly one issue
    pub fn single(issue: Issue) -> Self {
        Self::from_issues(vec![issue])
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.level == Level::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.level == Level::Warning)
    }

    /// Codes in order, handy for assertions and summaries
    pub fn codes(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.code.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_serializes_to_wire_shape() {
        let issue = Issue::error(
            codes::FIELD_MISSING,
            "Missing required field: name",
            vec!["pkg.json".into()],
        );
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "level": "error",
                "code": "field.missing",
                "message": "Missing required field: name",
                "path": ["pkg.json"]
            })
        );
    }

    #[test]
    fn test_sink_clones_share_storage() {
        let sink = IssueSink::new();
        let alias = sink.clone();
        alias.push(Issue::warning("w", "warn", vec![]));
        assert_eq!(sink.len(), 1);
        assert!(sink.shares(&alias));
        assert_eq!(sink.error_count(), 0);
    }

    #[test]
    fn test_warnings_never_fail_a_report() {
        let report = Report::from_issues(vec![Issue::warning("style.note", "note", vec![])]);
        assert!(report.ok);
        assert_eq!(report.warnings().count(), 1);

        let report = Report::from_issues(vec![Issue::error("type.mismatch", "bad", vec![])]);
        assert!(!report.ok);
    }

    #[test]
    fn test_display_path_root() {
        let issue = Issue::error("x", "y", vec![]);
        assert_eq!(issue.display_path(), "(root)");
        let issue = Issue::error("x", "y", vec!["a".into(), "[0]".into()]);
        assert_eq!(issue.display_path(), "a/[0]");
    }
}
