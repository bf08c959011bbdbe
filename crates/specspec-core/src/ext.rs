//! Extension leaf kinds: `Url` and `Semver`
//!
//! These are registered through the same public registry a host would use,
//! so they double as the reference for writing a custom kind. Their
//! parameters arrive as the JSON object the spec author passed.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::context::{type_name, Context};
use crate::descriptor::{CustomDescriptor, Descriptor};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::issue::codes;
use crate::registry::Validator;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, OnceLock};

pub const URL_KIND: &str = "Url";
pub const SEMVER_KIND: &str = "Semver";

static SEMVER_REGEX: OnceLock<Regex> = OnceLock::new();

fn semver_regex() -> &'static Regex {
    SEMVER_REGEX.get_or_init(|| {
        Regex::new(
            r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
        )
        .expect("Valid regex pattern")
    })
}

/// Register the extension kinds on an engine
pub fn register(engine: &mut Engine) {
    engine.register(URL_KIND, Arc::new(UrlValidator));
    engine.register(SEMVER_KIND, Arc::new(SemverValidator));
}

fn custom<'d>(descriptor: &'d Descriptor, kind: &str) -> Result<&'d CustomDescriptor> {
    match descriptor {
        Descriptor::Custom(custom) if custom.kind == kind => Ok(custom),
        other => Err(other.mismatch(kind)),
    }
}

/// Silent validation for leaf kinds, where presence is meaningless
fn probe_matches(
    validator: &dyn Validator,
    descriptor: &Descriptor,
    engine: &Engine,
    ctx: &Context<'_>,
) -> Result<bool> {
    let probe = ctx.probe();
    validator.validate(descriptor, engine, &probe)?;
    Ok(probe.is_clean())
}

/// `Url({schemes})`: an absolute URL, optionally restricted to some schemes
pub struct UrlValidator;

impl UrlValidator {
    fn schemes(params: &Value) -> Result<Option<Vec<String>>> {
        match params.get("schemes") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(|s| s.to_ascii_lowercase())
                        .ok_or_else(|| Error::invalid_argument(URL_KIND, "schemes must be strings"))
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(_) => Err(Error::invalid_argument(URL_KIND, "schemes must be an array")),
        }
    }
}

impl Validator for UrlValidator {
    fn validate(&self, descriptor: &Descriptor, _engine: &Engine, ctx: &Context<'_>) -> Result<()> {
        let spec = custom(descriptor, URL_KIND)?;
        let schemes = Self::schemes(&spec.params)?;

        let value = ctx.value();
        let Some(text) = value.as_str() else {
            ctx.add_issue(
                codes::TYPE_MISMATCH,
                format!("Expected URL string, got {}", type_name(value)),
            );
            return Ok(());
        };

        let parsed = match url::Url::parse(text) {
            Ok(parsed) => parsed,
            Err(e) => {
                ctx.add_issue(codes::URL_INVALID, format!("Invalid URL '{}': {}", text, e));
                return Ok(());
            }
        };
        if let Some(allowed) = schemes {
            if !allowed.iter().any(|s| s == parsed.scheme()) {
                ctx.add_issue(
                    codes::URL_SCHEME_MISMATCH,
                    format!(
                        "URL scheme '{}' is not one of: {}",
                        parsed.scheme(),
                        allowed.join(", ")
                    ),
                );
            }
        }
        Ok(())
    }

    fn matches(&self, descriptor: &Descriptor, engine: &Engine, ctx: &Context<'_>) -> Result<bool> {
        probe_matches(self, descriptor, engine, ctx)
    }
}

/// `Semver({prerelease})`: a semantic version string
pub struct SemverValidator;

impl Validator for SemverValidator {
    fn validate(&self, descriptor: &Descriptor, _engine: &Engine, ctx: &Context<'_>) -> Result<()> {
        let spec = custom(descriptor, SEMVER_KIND)?;
        let allow_prerelease = match spec.params.get("prerelease") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => {
                return Err(Error::invalid_argument(SEMVER_KIND, "prerelease must be a boolean"))
            }
        };

        let value = ctx.value();
        let Some(text) = value.as_str() else {
            ctx.add_issue(
                codes::TYPE_MISMATCH,
                format!("Expected version string, got {}", type_name(value)),
            );
            return Ok(());
        };

        let Some(caps) = semver_regex().captures(text) else {
            ctx.add_issue(
                codes::SEMVER_INVALID,
                format!("'{}' is not a valid semantic version", text),
            );
            return Ok(());
        };
        if !allow_prerelease {
            if let Some(pre) = caps.get(4) {
                ctx.add_issue(
                    codes::SEMVER_PRERELEASE,
                    format!("Prerelease versions are not allowed (got '{}')", pre.as_str()),
                );
            }
        }
        Ok(())
    }

    fn matches(&self, descriptor: &Descriptor, engine: &Engine, ctx: &Context<'_>) -> Result<bool> {
        probe_matches(self, descriptor, engine, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use serde_json::json;

    fn check(kind: &str, params: Value, value: Value) -> Vec<String> {
        let engine = Engine::new();
        let rule = Rule::Contains(Descriptor::Custom(CustomDescriptor::new(kind, params)));
        engine
            .validate(&rule, value)
            .issues
            .into_iter()
            .map(|i| i.code)
            .collect()
    }

    #[test]
    fn test_url() {
        assert!(check(URL_KIND, json!({}), json!("https://example.com/x")).is_empty());
        assert_eq!(check(URL_KIND, json!({}), json!("not a url")), vec!["url.invalid"]);
        assert_eq!(
            check(URL_KIND, json!({"schemes": ["https"]}), json!("ftp://example.com")),
            vec!["url.scheme_mismatch"]
        );
        assert_eq!(check(URL_KIND, Value::Null, json!(3)), vec!["type.mismatch"]);
    }

    #[test]
    fn test_url_bad_params_is_engine_error() {
        assert_eq!(
            check(URL_KIND, json!({"schemes": "https"}), json!("https://a.b")),
            vec!["engine.error"]
        );
    }

    #[test]
    fn test_semver() {
        assert!(check(SEMVER_KIND, json!({}), json!("1.2.3-beta.1+build.5")).is_empty());
        assert_eq!(check(SEMVER_KIND, json!({}), json!("1.2")), vec!["semver.invalid"]);
        assert_eq!(check(SEMVER_KIND, json!({}), json!("01.2.3")), vec!["semver.invalid"]);
        assert_eq!(
            check(SEMVER_KIND, json!({"prerelease": false}), json!("2.0.0-rc.1")),
            vec!["semver.prerelease"]
        );
    }
}
