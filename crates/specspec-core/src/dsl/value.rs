//! Runtime values of the spec language
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::ast::Expr;
use crate::rules::Rule;
use regex::Regex;
use serde_json::{Map, Number, Value as Json};
use std::sync::Arc;

/// Built-in rule factories, one per kind spec authors can write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Str,
    Num,
    Bool,
    Literal,
    Pattern,
    Field,
    Object,
    File,
    Directory,
    JsonFile,
    Package,
    OneOf,
    ListOf,
    Contains,
    IsNot,
    DoesNotContain,
}

/// Factory names bound as free identifiers
pub const FACTORY_NAMES: &[&str] = &[
    "Str", "Num", "Bool", "Literal", "Pattern", "Field", "Object", "File", "Directory", "JsonFile",
    "Package", "Bundle", "OneOf", "ListOf", "Contains",
];

/// Descriptor kinds that have a dedicated factory
pub const BUILTIN_DESCRIPTOR_KINDS: &[&str] =
    &["Field", "File", "Directory", "JsonFile", "Package"];

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Str" => Builtin::Str,
            "Num" => Builtin::Num,
            "Bool" => Builtin::Bool,
            "Literal" => Builtin::Literal,
            "Pattern" => Builtin::Pattern,
            "Field" => Builtin::Field,
            "Object" => Builtin::Object,
            "File" => Builtin::File,
            "Directory" => Builtin::Directory,
            "JsonFile" => Builtin::JsonFile,
            "Package" | "Bundle" => Builtin::Package,
            "OneOf" => Builtin::OneOf,
            "ListOf" => Builtin::ListOf,
            "Contains" => Builtin::Contains,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Str => "Str",
            Builtin::Num => "Num",
            Builtin::Bool => "Bool",
            Builtin::Literal => "Literal",
            Builtin::Pattern => "Pattern",
            Builtin::Field => "Field",
            Builtin::Object => "Object",
            Builtin::File => "File",
            Builtin::Directory => "Directory",
            Builtin::JsonFile => "JsonFile",
            Builtin::Package => "Package",
            Builtin::OneOf => "OneOf",
            Builtin::ListOf => "ListOf",
            Builtin::Contains => "Contains",
            Builtin::IsNot => "Is.Not",
            Builtin::DoesNotContain => "Does.Not.Contain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Factory {
    Builtin(Builtin),
    /// A host-registered descriptor kind
    Custom(String),
}

impl Factory {
    pub fn name(&self) -> &str {
        match self {
            Factory::Builtin(builtin) => builtin.name(),
            Factory::Custom(kind) => kind,
        }
    }
}

/// `Is`, `Does` and `Does.Not`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Is,
    Does,
    DoesNot,
}

/// Immutable, shareable chain of `let` bindings
#[derive(Debug, Clone, Default)]
pub struct Scope(Option<Arc<Binding>>);

#[derive(Debug)]
pub struct Binding {
    name: String,
    value: Value,
    parent: Scope,
}

impl Scope {
    /// A new scope with one more binding; `self` is untouched
    pub fn bind(&self, name: impl Into<String>, value: Value) -> Scope {
        Scope(Some(Arc::new(Binding {
            name: name.into(),
            value,
            parent: self.clone(),
        })))
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut current = self.0.as_deref();
        while let Some(binding) = current {
            if binding.name == name {
                return Some(&binding.value);
            }
            current = binding.parent.0.as_deref();
        }
        None
    }
}

/// A lambda closed over the scope it was written in
#[derive(Debug, Clone)]
pub struct Lambda {
    pub param: Option<String>,
    pub body: Arc<Expr>,
    pub scope: Scope,
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Regex(Regex),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
    Rule(Rule),
    Factory(Factory),
    Namespace(Namespace),
    Lambda(Lambda),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Regex(_) => "regex",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Rule(_) => "rule",
            Value::Factory(_) => "factory",
            Value::Namespace(_) => "namespace",
            Value::Lambda(_) => "lambda",
        }
    }

    /// Object member lookup; the last duplicate key wins
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Convert plain data to JSON; None when the value holds rules, regexes or callables
    pub fn to_json(&self) -> Option<Json> {
        Some(match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => number_to_json(*n)?,
            Value::Str(s) => Json::String(s.clone()),
            Value::Array(items) => {
                Json::Array(items.iter().map(Value::to_json).collect::<Option<_>>()?)
            }
            Value::Object(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json()?);
                }
                Json::Object(map)
            }
            _ => return None,
        })
    }

    pub fn from_json(json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => Value::Array(items.iter().map(Value::from_json).collect()),
            Json::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

/// Integral numbers become JSON integers so that `3` stays `3`
fn number_to_json(n: f64) -> Option<Json> {
    const MAX_SAFE: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() < MAX_SAFE {
        Some(Json::from(n as i64))
    } else {
        Number::from_f64(n).map(Json::Number)
    }
}
