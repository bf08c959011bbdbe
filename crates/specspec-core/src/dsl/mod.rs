//! The spec-definition language
//!
//! A small expression language in which rule trees are written:
//!
//! ```text
//! // a package whose manifest names itself
//! let manifest = JsonFile({
//!     path: 'package.json',
//!     required: [Field({key: 'name', value: Str({match: /^[a-z-]+$/})})],
//!     optional: [Field({key: 'version', value: Semver()})],
//! });
//!
//! Package({name: /^[a-z-]+$/, spec: (it) => [manifest, Directory('src')]})
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod ast;
mod error;
mod interpreter;
pub mod lexer;
pub mod parser;
mod value;

pub use error::{Position, SpecError};
pub use interpreter::Interpreter;
pub use parser::parse;
pub use value::FACTORY_NAMES;

use crate::engine::Engine;
use crate::rules::Rule;
use value::BUILTIN_DESCRIPTOR_KINDS;

/// Parse and evaluate `source`, returning its root rule
pub fn load(engine: &Engine, source: &str) -> Result<Rule, SpecError> {
    let program = parse(source)?;
    Interpreter::new(engine).run(&program)
}

/// Every name a spec author can call on this engine, namespaced forms included
pub fn factory_names(engine: &Engine) -> Vec<String> {
    let mut names: Vec<String> = FACTORY_NAMES.iter().map(|s| s.to_string()).collect();
    names.push("Is.Not".to_string());
    names.push("Does.Not.Contain".to_string());
    names.extend(
        engine
            .kinds()
            .into_iter()
            .filter(|kind| {
                !BUILTIN_DESCRIPTOR_KINDS.contains(kind) && !FACTORY_NAMES.contains(kind)
            })
            .map(str::to_string),
    );
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_names_include_extensions() {
        let names = factory_names(&Engine::new());
        for expected in ["Str", "Bundle", "Is.Not", "Does.Not.Contain", "Semver", "Url"] {
            assert!(names.iter().any(|n| n == expected), "{expected} missing");
        }
    }

    #[test]
    fn test_empty_program() {
        let engine = Engine::new();
        assert_eq!(load(&engine, "  // nothing here\n").unwrap_err(), SpecError::Empty);
    }
}
