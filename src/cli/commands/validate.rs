//! `validate` command
//!
//! Loads each configuration file and reports problems without playing.

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::ConfigLoader;
use crate::error::{ConfigError, ParlorError, Severity, ValidationIssue};

/// Validation result for one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// File path as given.
    pub file: String,
    /// Whether the file passed.
    pub valid: bool,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
}

/// Validates every file and prints a report.
///
/// # Errors
///
/// Returns the first file's error once every file has been reported.
/// With `--strict`, warnings fail validation too.
pub fn run(args: &ValidateArgs) -> Result<(), ParlorError> {
    let loader = ConfigLoader::with_defaults();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_error: Option<ConfigError> = None;

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");
        let file = path.display().to_string();

        let report = match loader.load(path) {
            Ok(result) if args.strict && !result.warnings.is_empty() => {
                let warnings = strings(&result.warnings);
                let strict: Vec<ValidationIssue> = result
                    .warnings
                    .into_iter()
                    .map(|w| ValidationIssue {
                        severity: Severity::Error,
                        ..w
                    })
                    .collect();
                first_error.get_or_insert(ConfigError::ValidationError {
                    path: file.clone(),
                    errors: strict,
                });
                FileReport {
                    file,
                    valid: false,
                    errors: Vec::new(),
                    warnings,
                }
            }
            Ok(result) => FileReport {
                file,
                valid: true,
                errors: Vec::new(),
                warnings: strings(&result.warnings),
            },
            Err(e) => {
                let errors = match &e {
                    ConfigError::ValidationError { errors, .. } => strings(errors),
                    other => vec![other.to_string()],
                };
                first_error.get_or_insert(e);
                FileReport {
                    file,
                    valid: false,
                    errors,
                    warnings: Vec::new(),
                }
            }
        };
        reports.push(report);
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                print_human(report);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    first_error.map_or(Ok(()), |e| Err(e.into()))
}

fn strings(issues: &[ValidationIssue]) -> Vec<String> {
    issues.iter().map(ToString::to_string).collect()
}

fn print_human(report: &FileReport) {
    let status = if report.valid { "ok" } else { "invalid" };
    println!("{}: {status}", report.file);
    for line in report.errors.iter().chain(&report.warnings) {
        println!("  {line}");
    }
}
