//! Built-in structural validators
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

mod directory;
mod field;
mod file;
mod package;

pub use directory::DirectoryValidator;
pub use field::FieldValidator;
pub use file::{FileValidator, JsonFileValidator};
pub use package::PackageValidator;

use crate::registry::Registry;
use std::sync::Arc;

/// Register the validators for every built-in descriptor kind
pub fn register_builtins(registry: &mut Registry) {
    registry.register("Field", Arc::new(FieldValidator));
    registry.register("File", Arc::new(FileValidator));
    registry.register("Directory", Arc::new(DirectoryValidator));
    registry.register("JsonFile", Arc::new(JsonFileValidator));
    registry.register("Package", Arc::new(PackageValidator));
}
