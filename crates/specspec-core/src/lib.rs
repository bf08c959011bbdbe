//! SpecSpec Core - rule-based validation of data and filesystem layouts
//!
//! This crate evaluates a small spec language describing structural
//! constraints and checks a target (a directory, a file, or an in-memory JSON
//! value) against it, producing an ordered list of issues.
//!
//! # Main Components
//!
//! - **Issues & Context**: the shared issue list and the path/subject threaded through a walk
//! - **Rules**: value checks, combinators and negation as a closed enum
//! - **Descriptors & Validators**: structural kinds dispatched through a registry
//! - **Engine**: spec loading, root selection and the crash-safe run entry point
//! - **DSL**: lexer, parser and sandboxed interpreter for spec source
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use specspec_core::Engine;
//!
//! let engine = Engine::new();
//! let report = engine.run(
//!     "Object({required: [Field({key: 'name', value: Str({minLength: 1})})]})",
//!     json!({"name": "specspec"}),
//! );
//! assert!(report.ok);
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod context;
pub mod descriptor;
pub mod dsl;
pub mod engine;
pub mod error;
pub mod ext;
pub mod issue;
pub mod registry;
pub mod rules;
pub mod validators;

// Re-export main types for convenience
pub use context::{Context, FsEntry, Subject};
pub use descriptor::{
    CustomDescriptor, Descriptor, DirectorySpec, FieldSpec, FileSpec, JsonFileSpec, PackageSpec,
    SpecGroup,
};
pub use dsl::SpecError;
pub use engine::{Engine, Target};
pub use error::{Error, Result};
pub use issue::{codes, Issue, IssueSink, Level, Report};
pub use registry::{Registry, Validator};
pub use rules::{
    Evaluable, ListOf, Literal, Negation, NegationFlavor, NumRule, ObjectRule, OneOf, PatternRule,
    Rule, StrRule,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
