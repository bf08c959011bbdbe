//! Lint command handler: load a spec without validating anything

use super::{read_spec, Outcome};
use crate::cli::LintArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use serde::Serialize;
use specspec_core::{Engine, Report};
use tracing::{debug, instrument};

/// Machine-readable lint result
#[derive(Debug, Serialize)]
struct LintSummary<'a> {
    ok: bool,
    root: &'a str,
}

/// Handle the lint command
#[instrument(skip(output), fields(spec = %args.spec.display()))]
pub fn handle_lint(args: LintArgs, output: &mut OutputWriter) -> Result<Outcome> {
    let source = read_spec(&args.spec)?;
    let engine = Engine::new();

    match engine.load(&source) {
        Ok(root) => {
            debug!(root = root.kind(), "spec is loadable");
            if output.format() == crate::cli::OutputFormat::Human {
                output.success(&format!(
                    "✓ {} loads; root rule is {}",
                    args.spec.display(),
                    root.kind()
                ))?;
            } else {
                output.data(&LintSummary {
                    ok: true,
                    root: root.kind(),
                })?;
            }
            Ok(Outcome::Success)
        }
        Err(err) => {
            debug!(code = err.code(), "spec rejected");
            output.report(&Report::single(err.to_issue()), 0)?;
            Ok(Outcome::ValidationFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::path::PathBuf;

    fn lint(source: &str) -> Outcome {
        let dir = tempfile::tempdir().unwrap();
        let spec: PathBuf = dir.path().join("spec.ss");
        std::fs::write(&spec, source).unwrap();
        let mut output =
            OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(std::io::sink()));
        handle_lint(LintArgs { spec }, &mut output).unwrap()
    }

    #[test]
    fn test_lint_outcomes() {
        assert_eq!(lint("Object({required: [Field('name')]})"), Outcome::Success);
        assert_eq!(lint("Object({"), Outcome::ValidationFailed);
        assert_eq!(lint("let x = Str();"), Outcome::ValidationFailed);
        assert_eq!(lint(""), Outcome::ValidationFailed);
    }
}
