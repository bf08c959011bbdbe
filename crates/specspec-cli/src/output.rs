//! Output formatting and writing utilities
//!
//! This module formats and writes output in various formats (JSON, YAML,
//! human-readable), with specialized support for validation reports.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use specspec_core::{Issue, Level, Report};
use std::io::{self, Write};
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for reports
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a validation report, showing at most `max_issues` issues (0 = all)
    fn format_report(&self, report: &Report, max_issues: usize, use_color: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_report(&self, report: &Report, max_issues: usize, use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(report, max_issues, use_color)),
            _ if max_issues > 0 && report.issues.len() > max_issues => {
                let truncated = Report {
                    ok: report.ok,
                    issues: report.issues[..max_issues].to_vec(),
                };
                self.format(&truncated)
            }
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Human {
            self.writeln(&formatted)
        } else {
            self.write(&formatted)
        }
    }

    /// Write a validation report with specialized formatting
    pub fn report(&mut self, report: &Report, max_issues: usize) -> Result<()> {
        let formatted = self.format.format_report(report, max_issues, self.use_color)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a list of names, one per line, or as a sequence in machine formats
    pub fn list(&mut self, items: &[String]) -> Result<()> {
        if self.format == OutputFormat::Human {
            for item in items {
                self.writeln(item)?;
            }
            Ok(())
        } else {
            self.data(&items)
        }
    }
}

/// Format a report for human reading
fn format_report_human(report: &Report, max_issues: usize, use_color: bool) -> String {
    let mut output = String::new();

    let shown = if max_issues > 0 {
        report.issues.len().min(max_issues)
    } else {
        report.issues.len()
    };
    for issue in &report.issues[..shown] {
        output.push_str(&format_issue_human(issue, use_color));
        output.push('\n');
    }
    if shown < report.issues.len() {
        output.push_str(&format!(
            "  ... {} more issue(s) not shown\n",
            report.issues.len() - shown
        ));
    }
    if !report.issues.is_empty() {
        output.push('\n');
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    let summary = if report.ok {
        if warnings == 0 {
            "✓ Passed".to_string()
        } else {
            format!("✓ Passed with {} warning(s)", warnings)
        }
    } else {
        format!("✗ Failed: {} error(s), {} warning(s)", errors, warnings)
    };

    let summary = match (use_color, report.ok) {
        (false, _) => summary,
        (true, true) => summary.green().to_string(),
        (true, false) => summary.red().bold().to_string(),
    };
    output.push_str(&summary);
    output.push('\n');
    output
}

/// One line per issue: level, code, path, message
fn format_issue_human(issue: &Issue, use_color: bool) -> String {
    let level = match (use_color, issue.level) {
        (false, Level::Error) => "error".to_string(),
        (false, Level::Warning) => "warning".to_string(),
        (true, Level::Error) => "error".red().bold().to_string(),
        (true, Level::Warning) => "warning".yellow().bold().to_string(),
    };
    let path = if use_color {
        issue.display_path().cyan().to_string()
    } else {
        issue.display_path()
    };
    format!("{} [{}] {}: {}", level, issue.code, path, issue.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use specspec_core::codes;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample_report() -> Report {
        Report::from_issues(vec![
            Issue::error(
                codes::FIELD_MISSING,
                "Missing required field: name",
                vec!["package.json".into()],
            ),
            Issue::warning("style.readme", "README is short", vec![]),
            Issue::error(
                codes::FILE_NOT_FOUND,
                "File not found: LICENSE",
                vec!["LICENSE".into()],
            ),
        ])
    }

    #[test]
    fn test_human_report() {
        let formatted = OutputFormat::Human.format_report(&sample_report(), 0, false).unwrap();
        let lines: Vec<&str> = formatted.lines().collect();
        assert_eq!(
            lines,
            vec![
                "error [field.missing] package.json: Missing required field: name",
                "warning [style.readme] (root): README is short",
                "error [file.not_found] LICENSE: File not found: LICENSE",
                "",
                "✗ Failed: 2 error(s), 1 warning(s)",
            ]
        );
    }

    #[test]
    fn test_human_report_truncates() {
        let formatted = OutputFormat::Human.format_report(&sample_report(), 1, false).unwrap();
        assert!(formatted.contains("... 2 more issue(s) not shown"));
        assert!(!formatted.contains("LICENSE"));
    }

    #[test]
    fn test_passing_report() {
        let formatted = OutputFormat::Human
            .format_report(&Report::from_issues(vec![]), 0, false)
            .unwrap();
        assert_eq!(formatted, "✓ Passed\n");
    }

    #[test]
    fn test_json_report_shape() {
        let formatted = OutputFormat::Json.format_report(&sample_report(), 2, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["issues"].as_array().unwrap().len(), 2);
        assert_eq!(value["issues"][0]["code"], "field.missing");
        assert_eq!(value["issues"][0]["path"], serde_json::json!(["package.json"]));
    }

    #[test]
    fn test_yaml_report() {
        let formatted = OutputFormat::Yaml.format_report(&sample_report(), 0, false).unwrap();
        assert!(formatted.contains("ok: false"));
        assert!(formatted.contains("code: file.not_found"));
    }

    /// Writer that keeps what was written for inspection
    #[derive(Clone, Default)]
    struct Captured(Rc<RefCell<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    #[test]
    fn test_quiet_writer_still_prints_reports() {
        let captured = Captured::default();
        let mut writer =
            OutputWriter::with_writer(OutputFormat::Human, false, true, Box::new(captured.clone()));
        writer.info("checking").unwrap();
        writer.success("done").unwrap();
        writer.report(&Report::from_issues(vec![]), 0).unwrap();
        assert_eq!(captured.text(), "✓ Passed\n");
    }

    #[test]
    fn test_machine_formats_skip_messages() {
        let captured = Captured::default();
        let mut writer =
            OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(captured.clone()));
        writer.info("checking").unwrap();
        writer.list(&["Str".to_string(), "Num".to_string()]).unwrap();
        assert_eq!(captured.text(), r#"["Str","Num"]"#);
    }
}
