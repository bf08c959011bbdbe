//! Evaluator for parsed spec programs
//!
//! Evaluation is sandboxed by construction: the only names in scope are the
//! rule factories, the `Is`/`Does` namespaces, host-registered kinds and the
//! program's own `let` bindings. A lambda captures the scope it is written
//! in, so it cannot name itself, but it can still be handed itself as an
//! argument. Lambda calls and expression nesting are therefore bounded, and
//! a runaway program fails with an evaluation error instead of exhausting
//! the stack.
//!
//! The root is the first rule returned by a factory call that sits directly
//! in a top-level expression statement; calls nested in another call's
//! arguments, `let` initializers and lambda bodies never qualify.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::ast::{Expr, ExprKind, Program, Stmt};
use super::error::{Position, Result, SpecError};
use super::value::{Builtin, Factory, Lambda, Namespace, Scope, Value, BUILTIN_DESCRIPTOR_KINDS};
use crate::context::Context;
use crate::descriptor::{
    CustomDescriptor, Descriptor, DirectorySpec, FieldSpec, FileSpec, JsonFileSpec, PackageSpec,
    SpecGroup,
};
use crate::engine::Engine;
use crate::error::Error;
use crate::rules::{
    ListOf, Literal, Negation, NumRule, ObjectRule, OneOf, PatternRule, Rule, StrRule,
};
use regex::{Regex, RegexBuilder};
use serde_json::Value as Json;
use std::sync::Arc;

/// Nested lambda calls allowed before evaluation gives up
const MAX_LAMBDA_DEPTH: usize = 64;
/// Nested expression evaluations allowed, lambda bodies included
const MAX_EVAL_DEPTH: usize = 256;

pub struct Interpreter<'e> {
    engine: &'e Engine,
    root: Option<Rule>,
    /// True only while a top-level expression statement is evaluated
    capturing: bool,
    /// How many call argument lists enclose the expression being evaluated
    call_depth: usize,
    lambda_depth: usize,
    eval_depth: usize,
}

impl<'e> Interpreter<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            root: None,
            capturing: false,
            call_depth: 0,
            lambda_depth: 0,
            eval_depth: 0,
        }
    }

    /// Evaluate every statement and return the selected root
    pub fn run(mut self, program: &Program) -> Result<Rule> {
        if program.is_empty() {
            return Err(SpecError::Empty);
        }

        let mut scope = Scope::default();
        for stmt in &program.statements {
            match stmt {
                Stmt::Let {
                    name,
                    value,
                    position,
                } => {
                    if self.global(name).is_some() {
                        return Err(SpecError::eval(
                            format!("Cannot rebind built-in name '{}'", name),
                            *position,
                        ));
                    }
                    self.capturing = false;
                    let value = self.eval(value, &scope)?;
                    scope = scope.bind(name.clone(), value);
                }
                Stmt::Expr(expr) => {
                    self.capturing = true;
                    self.eval(expr, &scope)?;
                    self.capturing = false;
                }
            }
        }

        self.root.ok_or(SpecError::NoRoot)
    }

    fn global(&self, name: &str) -> Option<Value> {
        match name {
            "Is" => Some(Value::Namespace(Namespace::Is)),
            "Does" => Some(Value::Namespace(Namespace::Does)),
            _ => {
                if let Some(builtin) = Builtin::from_name(name) {
                    Some(Value::Factory(Factory::Builtin(builtin)))
                } else if self.engine.is_registered(name)
                    && !BUILTIN_DESCRIPTOR_KINDS.contains(&name)
                {
                    Some(Value::Factory(Factory::Custom(name.to_string())))
                } else {
                    None
                }
            }
        }
    }

    fn eval(&mut self, expr: &Expr, scope: &Scope) -> Result<Value> {
        if self.eval_depth >= MAX_EVAL_DEPTH {
            return Err(SpecError::eval(
                "Expression evaluation nested too deeply",
                expr.position,
            ));
        }
        self.eval_depth += 1;
        let value = self.eval_expr(expr, scope);
        self.eval_depth -= 1;
        value
    }

    fn eval_expr(&mut self, expr: &Expr, scope: &Scope) -> Result<Value> {
        let position = expr.position;
        match &expr.kind {
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(s) => Ok(Value::Str(s.clone())),
            ExprKind::Regex { pattern, flags } => {
                compile_regex(pattern, flags, position).map(Value::Regex)
            }
            ExprKind::Ident(name) => scope
                .lookup(name)
                .cloned()
                .or_else(|| self.global(name))
                .ok_or_else(|| SpecError::eval(format!("Unknown identifier '{}'", name), position)),
            ExprKind::Array(items) => items
                .iter()
                .map(|item| self.eval(item, scope))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            ExprKind::Object(entries) => {
                let mut values = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    values.push((key.clone(), self.eval(value, scope)?));
                }
                Ok(Value::Object(values))
            }
            ExprKind::Lambda { param, body } => Ok(Value::Lambda(Lambda {
                param: param.clone(),
                body: Arc::new((**body).clone()),
                scope: scope.clone(),
            })),
            ExprKind::Call { callee, args } => {
                let callee = self.eval(callee, scope)?;
                self.call_depth += 1;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, scope))
                    .collect::<Result<Vec<_>>>();
                self.call_depth -= 1;
                let result = self.call(&callee, args?, position)?;

                if let (Value::Factory(_), Value::Rule(rule)) = (&callee, &result) {
                    if self.capturing && self.call_depth == 0 && self.root.is_none() {
                        self.root = Some(rule.clone());
                    }
                }
                Ok(result)
            }
            ExprKind::Member { object, name } => {
                let object = self.eval(object, scope)?;
                member(&object, name, position)
            }
            ExprKind::Index { object, index } => {
                let object = self.eval(object, scope)?;
                let index = self.eval(index, scope)?;
                match (&object, &index) {
                    (Value::Array(items), Value::Number(n)) if *n >= 0.0 && n.fract() == 0.0 => {
                        Ok(items.get(*n as usize).cloned().unwrap_or(Value::Null))
                    }
                    (Value::Object(_), Value::Str(key)) => {
                        Ok(object.get(key).cloned().unwrap_or(Value::Null))
                    }
                    _ => Err(SpecError::eval(
                        format!("Cannot index {} with {}", object.type_name(), index.type_name()),
                        position,
                    )),
                }
            }
            ExprKind::Neg(operand) => match self.eval(operand, scope)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(SpecError::eval(
                    format!("Cannot negate {}", other.type_name()),
                    position,
                )),
            },
        }
    }

    fn call(&mut self, callee: &Value, mut args: Vec<Value>, position: Position) -> Result<Value> {
        match callee {
            Value::Factory(Factory::Builtin(builtin)) => {
                self.builtin(*builtin, &args, position).map(Value::Rule)
            }
            Value::Factory(Factory::Custom(kind)) => {
                let call = Call::new(kind, &args, position);
                call.arity(0, 1)?;
                let params = match args.first() {
                    None => Json::Null,
                    Some(arg) => call.data(arg)?,
                };
                Ok(Value::Rule(Rule::Contains(Descriptor::Custom(CustomDescriptor::new(
                    kind.clone(),
                    params,
                )))))
            }
            Value::Lambda(lambda) => {
                if args.len() > 1 {
                    return Err(SpecError::eval(
                        format!("Lambda takes at most one argument, got {}", args.len()),
                        position,
                    ));
                }
                self.call_lambda(lambda, args.pop())
            }
            other => Err(SpecError::eval(
                format!("{} is not callable", other.type_name()),
                position,
            )),
        }
    }

    /// Evaluate a lambda body with its parameter bound to `arg`
    pub fn call_lambda(&mut self, lambda: &Lambda, arg: Option<Value>) -> Result<Value> {
        if self.lambda_depth >= MAX_LAMBDA_DEPTH {
            return Err(SpecError::eval(
                format!("Lambda recursion too deep (limit {})", MAX_LAMBDA_DEPTH),
                lambda.body.position,
            ));
        }
        let scope = match &lambda.param {
            Some(param) => lambda.scope.bind(param.clone(), arg.unwrap_or(Value::Null)),
            None => lambda.scope.clone(),
        };
        let capturing = std::mem::replace(&mut self.capturing, false);
        self.lambda_depth += 1;
        let result = self.eval(&lambda.body, &scope);
        self.lambda_depth -= 1;
        self.capturing = capturing;
        result
    }

    fn builtin(&self, builtin: Builtin, args: &[Value], position: Position) -> Result<Rule> {
        let call = Call::new(builtin.name(), args, position);
        match builtin {
            Builtin::Str => {
                call.arity(0, 1)?;
                let opts = call.options(args.first(), &["minLength", "maxLength", "match"])?;
                let mut rule = StrRule::new();
                rule.min_length = opts.count("minLength")?;
                rule.max_length = opts.count("maxLength")?;
                rule.pattern = opts.regex("match")?;
                Ok(Rule::Str(rule))
            }
            Builtin::Num => {
                call.arity(0, 1)?;
                let opts = call.options(args.first(), &["min", "max", "integer"])?;
                let mut rule = NumRule::new();
                rule.min = opts.number("min")?;
                rule.max = opts.number("max")?;
                rule.integer = opts.flag("integer")?.unwrap_or(false);
                Ok(Rule::Num(rule))
            }
            Builtin::Bool => {
                call.arity(0, 0)?;
                Ok(Rule::Bool)
            }
            Builtin::Literal => {
                call.arity(1, 1)?;
                Ok(Rule::Literal(Literal::new(call.data(&args[0])?)))
            }
            Builtin::Pattern => {
                call.arity(1, 1)?;
                Ok(Rule::Pattern(PatternRule::new(call.regex(&args[0])?)))
            }
            Builtin::Field => {
                call.arity(1, 1)?;
                let spec = match &args[0] {
                    Value::Str(key) => FieldSpec::new(key.clone()),
                    arg => {
                        let opts =
                            call.options(Some(arg), &["key", "optional", "required", "value"])?;
                        let mut spec = FieldSpec::new(opts.required_string("key")?);
                        spec.optional = opts.flag("optional")?.unwrap_or(false)
                            || opts.flag("required")? == Some(false);
                        if let Some(value) = opts.get("value") {
                            spec = spec.value(call.rule(value)?);
                        }
                        spec
                    }
                };
                Ok(Rule::Contains(Descriptor::Field(spec)))
            }
            Builtin::Object => {
                call.arity(0, 1)?;
                let opts = call.options(args.first(), &["required", "optional"])?;
                Ok(Rule::Object(ObjectRule::new(
                    opts.rules("required")?,
                    opts.rules("optional")?,
                )))
            }
            Builtin::File => {
                call.arity(1, 1)?;
                let spec = match &args[0] {
                    Value::Str(path) => FileSpec::new(path.clone()),
                    arg => {
                        let opts = call.options(Some(arg), &["path", "ext", "content"])?;
                        let mut spec = FileSpec::new(opts.required_string("path")?)
                            .content(opts.rules("content")?);
                        if let Some(ext) = opts.string("ext")? {
                            spec = spec.ext(ext);
                        }
                        spec
                    }
                };
                Ok(Rule::Contains(Descriptor::File(spec)))
            }
            Builtin::Directory => {
                call.arity(0, 1)?;
                let spec = match args.first() {
                    Some(Value::Str(path)) => DirectorySpec::new(path.clone()),
                    arg => {
                        let opts = call.options(arg, &["path", "content"])?;
                        let mut spec = match opts.string("path")? {
                            Some(path) => DirectorySpec::new(path),
                            None => DirectorySpec::current(),
                        };
                        match opts.get("content") {
                            None => {}
                            Some(Value::Array(_)) => spec.required = opts.rules("content")?,
                            Some(content @ Value::Object(_)) => {
                                let content =
                                    call.options(Some(content), &["required", "optional"])?;
                                spec.required = content.rules("required")?;
                                spec.optional = content.rules("optional")?;
                            }
                            Some(other) => {
                                return Err(call.error(format!(
                                    "content must be an array or {{required, optional}}, got {}",
                                    other.type_name()
                                )))
                            }
                        }
                        spec
                    }
                };
                Ok(Rule::Contains(Descriptor::Directory(spec)))
            }
            Builtin::JsonFile => {
                call.arity(1, 1)?;
                let spec = match &args[0] {
                    Value::Str(path) => JsonFileSpec::new(path.clone()),
                    arg => {
                        let opts = call.options(Some(arg), &["path", "required", "optional"])?;
                        JsonFileSpec::new(opts.required_string("path")?)
                            .required(opts.rules("required")?)
                            .optional(opts.rules("optional")?)
                    }
                };
                Ok(Rule::Contains(Descriptor::JsonFile(spec)))
            }
            Builtin::Package => {
                call.arity(1, 1)?;
                let spec = match &args[0] {
                    group @ (Value::Lambda(_) | Value::Array(_)) => {
                        PackageSpec::new(call.group(group)?)
                    }
                    arg => {
                        let opts = call.options(Some(arg), &["name", "spec"])?;
                        let group = match opts.get("spec") {
                            Some(group) => call.group(group)?,
                            None => SpecGroup::Rules(Vec::new()),
                        };
                        let mut spec = PackageSpec::new(group);
                        if let Some(name) = opts.regex("name")? {
                            spec = spec.name(name);
                        }
                        spec
                    }
                };
                Ok(Rule::Contains(Descriptor::Package(spec)))
            }
            Builtin::OneOf => {
                if args.is_empty() {
                    return Err(call.error("expects at least one option"));
                }
                let options = args.iter().map(|arg| call.rule(arg)).collect::<Result<Vec<_>>>()?;
                Ok(Rule::OneOf(OneOf::new(options)))
            }
            Builtin::ListOf => {
                call.arity(1, 2)?;
                let opts = call.options(args.get(1), &["min", "max"])?;
                let mut rule = ListOf::new(call.rule(&args[0])?);
                rule.min = opts.count("min")?;
                rule.max = opts.count("max")?;
                Ok(Rule::ListOf(rule))
            }
            Builtin::Contains => {
                call.arity(1, 1)?;
                call.descriptor(&args[0])
            }
            Builtin::IsNot => {
                call.arity(1, 1)?;
                Ok(Rule::Not(Negation::is_not(call.rule(&args[0])?)))
            }
            Builtin::DoesNotContain => {
                call.arity(1, 1)?;
                Ok(Rule::Not(Negation::does_not_contain(call.descriptor(&args[0])?)))
            }
        }
    }
}

fn member(object: &Value, name: &str, position: Position) -> Result<Value> {
    match (object, name) {
        (Value::Namespace(Namespace::Is), "Not") => {
            Ok(Value::Factory(Factory::Builtin(Builtin::IsNot)))
        }
        (Value::Namespace(Namespace::Does), "Not") => Ok(Value::Namespace(Namespace::DoesNot)),
        (Value::Namespace(Namespace::DoesNot), "Contain") => {
            Ok(Value::Factory(Factory::Builtin(Builtin::DoesNotContain)))
        }
        (Value::Object(_), _) => Ok(object.get(name).cloned().unwrap_or(Value::Null)),
        _ => Err(SpecError::eval(
            format!("Cannot read member '{}' of {}", name, object.type_name()),
            position,
        )),
    }
}

fn compile_regex(pattern: &str, flags: &str, position: Position) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .ignore_whitespace(flags.contains('x'))
        .build()
        .map_err(|e| SpecError::eval(format!("Invalid regex /{}/: {}", pattern, e), position))
}

/// Argument handling for one factory call
struct Call<'a> {
    kind: &'a str,
    args: &'a [Value],
    position: Position,
}

impl<'a> Call<'a> {
    fn new(kind: &'a str, args: &'a [Value], position: Position) -> Self {
        Self {
            kind,
            args,
            position,
        }
    }

    fn error(&self, message: impl AsRef<str>) -> SpecError {
        SpecError::eval(format!("{}: {}", self.kind, message.as_ref()), self.position)
    }

    fn arity(&self, min: usize, max: usize) -> Result<()> {
        let n = self.args.len();
        if n < min || n > max {
            let expected = if min == max {
                format!("{}", min)
            } else {
                format!("{} to {}", min, max)
            };
            return Err(self.error(format!("expects {} arguments, got {}", expected, n)));
        }
        Ok(())
    }

    fn options(&self, arg: Option<&'a Value>, allowed: &[&str]) -> Result<Options<'a, '_>> {
        let entries: &[(String, Value)] = match arg {
            None | Some(Value::Null) => &[],
            Some(Value::Object(entries)) => entries,
            Some(other) => {
                return Err(self.error(format!(
                    "expects an options object, got {}",
                    other.type_name()
                )))
            }
        };
        if let Some((key, _)) = entries.iter().find(|(k, _)| !allowed.contains(&k.as_str())) {
            return Err(self.error(format!(
                "unknown option '{}' (expected one of: {})",
                key,
                allowed.join(", ")
            )));
        }
        Ok(Options { call: self, entries })
    }

    fn data(&self, value: &Value) -> Result<Json> {
        value
            .to_json()
            .ok_or_else(|| self.error(format!("expects a data value, got {}", value.type_name())))
    }

    fn regex(&self, value: &Value) -> Result<Regex> {
        match value {
            Value::Regex(re) => Ok(re.clone()),
            Value::Str(pattern) => Regex::new(pattern)
                .map_err(|e| self.error(format!("invalid pattern '{}': {}", pattern, e))),
            other => Err(self.error(format!(
                "expects a regex or pattern string, got {}",
                other.type_name()
            ))),
        }
    }

    /// Coerce an argument to a rule: literals, regexes and inline shapes included
    fn rule(&self, value: &Value) -> Result<Rule> {
        match value {
            Value::Rule(rule) => Ok(rule.clone()),
            Value::Regex(re) => Ok(Rule::Pattern(PatternRule::new(re.clone()))),
            Value::Object(_) => {
                let shape = self.options(Some(value), &["required", "optional"])?;
                Ok(Rule::Object(ObjectRule::new(
                    shape.rules("required")?,
                    shape.rules("optional")?,
                )))
            }
            Value::Factory(factory) => Err(self.error(format!(
                "expects a rule, got factory {} (missing '()'?)",
                factory.name()
            ))),
            Value::Namespace(_) | Value::Lambda(_) => {
                Err(self.error(format!("expects a rule, got {}", value.type_name())))
            }
            data => Ok(Rule::Literal(Literal::new(self.data(data)?))),
        }
    }

    fn rules(&self, key: &str, value: &Value) -> Result<Vec<Rule>> {
        match value {
            Value::Array(items) => items.iter().map(|item| self.rule(item)).collect(),
            other => Err(self.error(format!(
                "{} must be an array of rules, got {}",
                key,
                other.type_name()
            ))),
        }
    }

    fn descriptor(&self, value: &Value) -> Result<Rule> {
        match value {
            Value::Rule(rule @ Rule::Contains(_)) => Ok(rule.clone()),
            other => Err(self.error(format!(
                "expects a structural descriptor, got {}",
                match other {
                    Value::Rule(rule) => rule.kind().to_string(),
                    _ => other.type_name().to_string(),
                }
            ))),
        }
    }

    fn group(&self, value: &Value) -> Result<SpecGroup> {
        match value {
            Value::Array(_) => Ok(SpecGroup::Rules(self.rules("spec", value)?)),
            Value::Lambda(lambda) => Ok(lambda_group(self.kind.to_string(), lambda.clone())),
            other => Err(self.error(format!(
                "spec must be a lambda or an array, got {}",
                other.type_name()
            ))),
        }
    }
}

/// Options object passed to a factory, already checked for unknown keys
struct Options<'a, 'c> {
    call: &'c Call<'a>,
    entries: &'a [(String, Value)],
}

impl<'a, 'c> Options<'a, 'c> {
    /// Member value; `null` counts as absent
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .filter(|v| !matches!(v, Value::Null))
    }

    fn number(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(*n)),
            Some(other) => Err(self.call.error(format!(
                "{} must be a number, got {}",
                key,
                other.type_name()
            ))),
        }
    }

    fn count(&self, key: &str) -> Result<Option<usize>> {
        match self.number(key)? {
            None => Ok(None),
            Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(Some(n as usize)),
            Some(n) => Err(self
                .call
                .error(format!("{} must be a non-negative integer, got {}", key, n))),
        }
    }

    fn flag(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.call.error(format!(
                "{} must be a boolean, got {}",
                key,
                other.type_name()
            ))),
        }
    }

    fn string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.call.error(format!(
                "{} must be a string, got {}",
                key,
                other.type_name()
            ))),
        }
    }

    fn required_string(&self, key: &str) -> Result<String> {
        self.string(key)?
            .ok_or_else(|| self.call.error(format!("missing required option '{}'", key)))
    }

    fn regex(&self, key: &str) -> Result<Option<Regex>> {
        self.get(key).map(|value| self.call.regex(value)).transpose()
    }

    fn rules(&self, key: &str) -> Result<Vec<Rule>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(value) => self.call.rules(key, value),
        }
    }
}

/// A rule group built by evaluating `lambda` against each validated context
fn lambda_group(kind: String, lambda: Lambda) -> SpecGroup {
    SpecGroup::factory(move |ctx: &Context<'_>| {
        let group_error = |err: SpecError| Error::SpecGroup {
            kind: kind.clone(),
            message: err.to_string(),
        };

        let mut interpreter = Interpreter::new(ctx.engine());
        let produced = interpreter
            .call_lambda(&lambda, Some(subject_snapshot(ctx)))
            .map_err(group_error)?;

        let call = Call::new(&kind, &[], lambda.body.position);
        let rules = match &produced {
            Value::Array(_) => call.rules("spec", &produced),
            single => call.rule(single).map(|rule| vec![rule]),
        };
        rules.map_err(group_error)
    })
}

/// Read-only view of the context a lambda runs against
fn subject_snapshot(ctx: &Context<'_>) -> Value {
    let name = ctx
        .subject()
        .fs_entry()
        .map(|entry| Value::Str(entry.name()))
        .unwrap_or(Value::Null);
    Value::Object(vec![
        (
            "path".to_string(),
            Value::Array(ctx.path().iter().cloned().map(Value::Str).collect()),
        ),
        ("value".to_string(), Value::from_json(ctx.value())),
        (
            "json".to_string(),
            ctx.json().map(Value::from_json).unwrap_or(Value::Null),
        ),
        ("name".to_string(), name),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parser::parse;

    fn load(source: &str) -> Result<Rule> {
        let engine = Engine::new();
        Interpreter::new(&engine).run(&parse(source)?)
    }

    #[test]
    fn test_root_is_first_top_level_call() {
        assert_eq!(load("Str(); Num()").unwrap().kind(), "Str");
        assert_eq!(load("ListOf(Num())").unwrap().kind(), "ListOf");
    }

    #[test]
    fn test_let_initializers_never_become_root() {
        let source = "let name = Str(); Object({required: [Field({key: 'a', value: name})]})";
        assert_eq!(load(source).unwrap().kind(), "Object");
        assert!(matches!(load("let only = Str();"), Err(SpecError::NoRoot)));
    }

    #[test]
    fn test_lambda_bodies_never_become_root() {
        let rule = load("let group = (it) => [Str()]; Package(group)").unwrap();
        assert_eq!(rule.kind(), "Package");
    }

    #[test]
    fn test_namespaces() {
        assert_eq!(load("Is.Not(Str())").unwrap().kind(), "Is.Not");
        assert_eq!(load("Does.Not.Contain(File('x'))").unwrap().kind(), "Does.Not.Contain");
        assert!(matches!(load("Does.Not.Contain(Str())"), Err(SpecError::Eval { .. })));
    }

    #[test]
    fn test_custom_kinds_are_factories() {
        let rule = load("Url({schemes: ['https']})").unwrap();
        let Rule::Contains(Descriptor::Custom(custom)) = rule else {
            panic!("expected custom descriptor");
        };
        assert_eq!(custom.kind, "Url");
        assert_eq!(custom.params, serde_json::json!({"schemes": ["https"]}));
    }

    #[test]
    fn test_evaluation_errors() {
        for source in [
            "Nope()",
            "let Str = 1; Str",
            "Str({minLength: 'x'})",
            "Str({minLen: 3})",
            "Pattern(/(/)",
            "OneOf(Str)",
            "Field({optional: true})",
            "3()",
        ] {
            assert!(matches!(load(source), Err(SpecError::Eval { .. })), "{source}");
        }
    }

    #[test]
    fn test_self_application_is_bounded() {
        let err = load("let f = (x) => x(x); f(f); Str()").unwrap_err();
        match err {
            SpecError::Eval { message, .. } => assert!(message.contains("recursion"), "{message}"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_rule_results_are_ignored() {
        assert_eq!(load("[1, 2]; 'text'; Bool()").unwrap().kind(), "Bool");
    }
}
