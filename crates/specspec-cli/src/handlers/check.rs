//! Check command handler

use super::{read_spec, Outcome};
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use specspec_core::{Engine, Report, Target};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Handle the check command
#[instrument(
    skip(config, output),
    fields(spec = %args.spec.display(), target = %args.target.display())
)]
pub fn handle_check(
    args: CheckArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<Outcome> {
    let _timer = Timer::with_details("check_command", &format!("spec: {}", args.spec.display()));

    let source = read_spec(&args.spec)?;
    debug!(bytes = source.len(), "spec read");

    let target = if args.data {
        Target::Value(load_document(&args.target)?)
    } else {
        Target::Path(args.target.clone())
    };

    output.info(&format!(
        "Checking {} against {}",
        args.target.display(),
        args.spec.display()
    ))?;

    let engine = Engine::new();
    let report = {
        let _validation_timer = Timer::new("validation");
        engine.run(&source, target)
    };

    let strict = args.strict || config.validation.strict;
    let passed = passes(&report, strict);
    if passed {
        info!(issues = report.issues.len(), "check passed");
    } else {
        warn!(
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            strict,
            "check failed"
        );
    }

    output.report(&report, config.validation.max_issues)?;
    if report.ok && !passed {
        output.warning("✗ Warnings are treated as failures (strict mode)")?;
    }

    Ok(if passed {
        Outcome::Success
    } else {
        Outcome::ValidationFailed
    })
}

/// Whether a report counts as a pass; strict runs also fail on warnings
pub fn passes(report: &Report, strict: bool) -> bool {
    report.ok && !(strict && report.warnings().next().is_some())
}

/// Parse a JSON or YAML document, chosen by extension
fn load_document(path: &Path) -> Result<serde_json::Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;

    let is_yaml = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML document".to_string(),
            reason: e.to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON document".to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use specspec_core::Issue;
    use std::path::PathBuf;

    fn sink_writer() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, false, true, Box::new(std::io::sink()))
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn args(spec: PathBuf, target: PathBuf, data: bool) -> CheckArgs {
        CheckArgs {
            spec,
            target,
            data,
            strict: false,
        }
    }

    #[test]
    fn test_strict_mode_fails_on_warnings() {
        let report = Report::from_issues(vec![Issue::warning("note", "just saying", vec![])]);
        assert!(passes(&report, false));
        assert!(!passes(&report, true));
    }

    #[test]
    fn test_check_directory_target() {
        let dir = tempfile::tempdir().unwrap();
        let spec = write(dir.path(), "pkg.ss", "Package([File('README.md')])");
        let pkg = dir.path().join("pkg");
        fs::create_dir(&pkg).unwrap();

        let config = Config::default();
        let outcome =
            handle_check(args(spec.clone(), pkg.clone(), false), &config, &mut sink_writer())
                .unwrap();
        assert_eq!(outcome, Outcome::ValidationFailed);

        fs::write(pkg.join("README.md"), "# pkg").unwrap();
        let outcome = handle_check(args(spec, pkg, false), &config, &mut sink_writer()).unwrap();
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn test_check_yaml_document() {
        let dir = tempfile::tempdir().unwrap();
        let spec = write(
            dir.path(),
            "service.ss",
            "Object({required: [Field({key: 'port', value: Num({min: 1})})]})",
        );
        let good = write(dir.path(), "good.yaml", "port: 8080\n");
        let bad = write(dir.path(), "bad.yml", "port: 0\n");

        let config = Config::default();
        assert_eq!(
            handle_check(args(spec.clone(), good, true), &config, &mut sink_writer()).unwrap(),
            Outcome::Success
        );
        assert_eq!(
            handle_check(args(spec, bad, true), &config, &mut sink_writer()).unwrap(),
            Outcome::ValidationFailed
        );
    }

    #[test]
    fn test_missing_inputs_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();

        let err = handle_check(
            args(dir.path().join("absent.ss"), dir.path().to_path_buf(), false),
            &config,
            &mut sink_writer(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));

        let spec = write(dir.path(), "any.ss", "Str()");
        let doc = write(dir.path(), "doc.json", "{ nope");
        let err = handle_check(args(spec, doc, true), &config, &mut sink_writer()).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
        let message = err.to_string();
        assert!(message.contains("expected JSON document"), "{message}");
        assert!(message.contains("line 1"), "{message}");
    }
}
