//! Batch duplicate-id check for CI pipelines.
//!
//! Each HTML file is scanned on its own, exactly as the language server
//! scans the focused document, and its duplicate-id diagnostics are
//! reported with file-relative positions.

use crate::exit_code::ExitCode;
use crate::{OutputFormat, OutputOptions};
use anyhow::Context;
use colored::Colorize;
use html_id_config::{find_config, load_config, HtmlIdConfig};
use html_id_dom::CompletionDatabase;
use html_id_ide::{AnalysisHost, Diagnostic, DiagnosticSeverity, FileUri, RuleSeverity};
use html_id_types::Language;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// Diagnostics found in one file.
#[derive(Debug)]
struct FileReport {
    path: String,
    diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    fn count(&self, severity: DiagnosticSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Files found under the input paths, plus the paths that couldn't be walked.
#[derive(Debug, Default)]
struct Inputs {
    files: Vec<PathBuf>,
    failures: Vec<String>,
}

/// Run the check command.
///
/// Exits with 1 when any error-severity diagnostic is reported, 2 when the
/// config is unusable and 4 when an input couldn't be read. I/O failures win
/// over diagnostics since the results are incomplete.
pub fn run(
    config_path: Option<PathBuf>,
    paths: &[PathBuf],
    format: OutputFormat,
    output: OutputOptions,
) -> ExitCode {
    let start_time = std::time::Instant::now();

    let config = match resolve_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            report_fatal(format, &format!("{err:#}"));
            return ExitCode::ConfigError;
        }
    };
    let severity = config.duplicate_id_severity();

    let roots = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.to_vec()
    };
    let Inputs {
        files,
        mut failures,
    } = collect_html_files(&roots);
    tracing::debug!(files = files.len(), "Collected HTML files");

    let mut reports = Vec::with_capacity(files.len());
    for path in &files {
        match check_file(path, severity) {
            Ok(report) => reports.push(report),
            Err(err) => failures.push(format!("{}: {err}", path.display())),
        }
    }
    reports.sort_by(|a, b| a.path.cmp(&b.path));

    match format {
        OutputFormat::Human => {
            print_human(&reports, &failures, output);
            if output.show_info {
                println!(
                    "  {} {:.2}s",
                    "⏱".dimmed(),
                    start_time.elapsed().as_secs_f64()
                );
            }
        }
        OutputFormat::Json => {
            let report = json_report(&reports, &failures);
            match serde_json::to_string_pretty(&report) {
                Ok(text) => println!("{text}"),
                Err(err) => eprintln!("{err}"),
            }
        }
    }

    exit_code_for(&reports, &failures)
}

/// Load the explicit config, or discover one from the current directory.
fn resolve_config(config_path: Option<&Path>) -> anyhow::Result<HtmlIdConfig> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            find_config(&cwd)?
        }
    };

    match path {
        Some(path) => Ok(load_config(&path)?),
        None => Ok(HtmlIdConfig::default()),
    }
}

/// Walk `roots` for HTML files. Explicitly named files are kept whatever
/// their extension.
fn collect_html_files(roots: &[PathBuf]) -> Inputs {
    let mut inputs = Inputs::default();

    for root in roots {
        if root.is_file() {
            inputs.files.push(root.clone());
            continue;
        }
        if !root.exists() {
            inputs
                .failures
                .push(format!("{}: No such file or directory", root.display()));
            continue;
        }

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !SKIPPED_DIRS
                        .iter()
                        .any(|skipped| entry.file_name() == *skipped)
            });
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    if Language::from_path(entry.path()).is_some() {
                        inputs.files.push(entry.into_path());
                    }
                }
                Ok(_) => {}
                Err(err) => inputs.failures.push(err.to_string()),
            }
        }
    }

    inputs
}

fn check_file(path: &Path, severity: RuleSeverity) -> std::io::Result<FileReport> {
    let text = std::fs::read_to_string(path)?;
    let file = FileUri::from_path(&std::path::absolute(path)?);

    // Duplicate detection never consults member data
    let mut host = AnalysisHost::new(Arc::new(CompletionDatabase::new()));
    host.set_duplicate_id_severity(severity);
    host.rebuild(&file, &text);

    Ok(FileReport {
        path: path.display().to_string(),
        diagnostics: host.snapshot().file_diagnostics(&file),
    })
}

fn exit_code_for(reports: &[FileReport], failures: &[String]) -> ExitCode {
    if !failures.is_empty() {
        ExitCode::IoError
    } else if reports
        .iter()
        .any(|report| report.count(DiagnosticSeverity::Error) > 0)
    {
        ExitCode::DiagnosticError
    } else {
        ExitCode::Success
    }
}

fn report_fatal(format: OutputFormat, message: &str) {
    match format {
        OutputFormat::Human => eprintln!("{} {message}", "✗".red()),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": message })),
    }
}

fn print_human(reports: &[FileReport], failures: &[String], output: OutputOptions) {
    for report in reports {
        for diag in &report.diagnostics {
            let severity_styled = match diag.severity {
                DiagnosticSeverity::Error => "error:".red().bold(),
                DiagnosticSeverity::Warning => "warning:".yellow().bold(),
                _ => "info:".dimmed(),
            };
            let message_styled = match diag.severity {
                DiagnosticSeverity::Error => diag.message.red(),
                DiagnosticSeverity::Warning => diag.message.yellow(),
                _ => diag.message.normal(),
            };

            println!(
                "\n{}:{}:{}: {} {}",
                report.path,
                diag.range.start.line + 1,
                diag.range.start.character + 1,
                severity_styled,
                message_styled
            );
            if let Some(ref rule) = diag.code {
                println!("  {}: {}", "rule".dimmed(), rule.dimmed());
            }
        }
    }

    for failure in failures {
        eprintln!("{} {failure}", "✗".red());
    }

    if !output.show_info {
        return;
    }

    let checked = reports.len();
    let errors: usize = reports
        .iter()
        .map(|r| r.count(DiagnosticSeverity::Error))
        .sum();
    let warnings: usize = reports
        .iter()
        .map(|r| r.count(DiagnosticSeverity::Warning))
        .sum();

    println!();
    if errors == 0 && warnings == 0 {
        println!(
            "{}",
            format!("✓ No duplicate ids in {checked} file(s)").green().bold()
        );
    } else if errors == 0 {
        println!(
            "{}",
            format!("✓ Checked {checked} file(s) with {warnings} warning(s)")
                .yellow()
                .bold()
        );
    } else {
        println!(
            "{}",
            format!("✗ Found {errors} error(s), {warnings} warning(s) in {checked} file(s)").red()
        );
    }
}

fn json_report(reports: &[FileReport], failures: &[String]) -> serde_json::Value {
    let diagnostic_to_json = |diag: &Diagnostic| {
        serde_json::json!({
            "message": diag.message,
            "severity": diag.severity.to_string(),
            "rule": diag.code,
            "location": {
                "start": { "line": diag.range.start.line + 1, "column": diag.range.start.character + 1 },
                "end": { "line": diag.range.end.line + 1, "column": diag.range.end.character + 1 }
            }
        })
    };

    let files: Vec<serde_json::Value> = reports
        .iter()
        .filter(|report| !report.diagnostics.is_empty())
        .map(|report| {
            let (errors, warnings): (Vec<&Diagnostic>, Vec<&Diagnostic>) = report
                .diagnostics
                .iter()
                .partition(|diag| diag.severity.is_error());
            serde_json::json!({
                "file": report.path,
                "errors": errors.into_iter().map(diagnostic_to_json).collect::<Vec<_>>(),
                "warnings": warnings.into_iter().map(diagnostic_to_json).collect::<Vec<_>>()
            })
        })
        .collect();

    let total_errors: usize = reports
        .iter()
        .map(|r| r.count(DiagnosticSeverity::Error))
        .sum();
    let total_warnings: usize = reports
        .iter()
        .map(|r| r.count(DiagnosticSeverity::Warning))
        .sum();

    serde_json::json!({
        "success": total_errors == 0 && failures.is_empty(),
        "files": files,
        "io_errors": failures,
        "stats": {
            "total_files": reports.len(),
            "files_with_issues": files.len(),
            "total_errors": total_errors,
            "total_warnings": total_warnings
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const DUPLICATES: &str = "<div id=\"x\"></div>\n<p id=\"x\"></p>";

    fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_collect_html_files_skips_node_modules() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "index.html", "");
        write(temp.path(), "pages/about.HTM", "");
        write(temp.path(), "pages/notes.txt", "");
        write(temp.path(), "pages/feed.xhtml", "");
        write(temp.path(), "node_modules/pkg/readme.html", "");

        let inputs = collect_html_files(&[temp.path().to_path_buf()]);

        let mut names: Vec<_> = inputs
            .files
            .iter()
            .map(|path| path.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![PathBuf::from("index.html"), PathBuf::from("pages/about.HTM")]
        );
        assert!(inputs.failures.is_empty());
    }

    #[test]
    fn test_explicit_file_is_kept() {
        let temp = TempDir::new().unwrap();
        let page = write(temp.path(), "page.xhtml", "");

        let inputs = collect_html_files(std::slice::from_ref(&page));
        assert_eq!(inputs.files, vec![page]);
    }

    #[test]
    fn test_missing_path_is_failure() {
        let temp = TempDir::new().unwrap();
        let inputs = collect_html_files(&[temp.path().join("missing")]);

        assert!(inputs.files.is_empty());
        assert_eq!(inputs.failures.len(), 1);
        assert!(inputs.failures[0].contains("missing"));
    }

    #[test]
    fn test_check_file_reports_each_occurrence() {
        let temp = TempDir::new().unwrap();
        let page = write(temp.path(), "index.html", DUPLICATES);

        let report = check_file(&page, RuleSeverity::Error).unwrap();

        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(report.count(DiagnosticSeverity::Error), 2);
        assert_eq!(report.diagnostics[1].range.start.line, 1);
    }

    #[test]
    fn test_check_file_respects_severity() {
        let temp = TempDir::new().unwrap();
        let page = write(temp.path(), "index.html", DUPLICATES);

        let warn = check_file(&page, RuleSeverity::Warn).unwrap();
        assert_eq!(warn.count(DiagnosticSeverity::Warning), 2);

        let off = check_file(&page, RuleSeverity::Off).unwrap();
        assert!(off.diagnostics.is_empty());
    }

    #[test]
    fn test_exit_codes() {
        let temp = TempDir::new().unwrap();
        let dirty = check_file(&write(temp.path(), "a.html", DUPLICATES), RuleSeverity::Error)
            .unwrap();
        let clean = check_file(&write(temp.path(), "b.html", "<p id=\"a\"></p>"), RuleSeverity::Error)
            .unwrap();
        let warned = check_file(&write(temp.path(), "c.html", DUPLICATES), RuleSeverity::Warn)
            .unwrap();

        assert_eq!(exit_code_for(&[clean], &[]), ExitCode::Success);
        assert_eq!(exit_code_for(&[warned], &[]), ExitCode::Success);
        assert_eq!(
            exit_code_for(std::slice::from_ref(&dirty), &[]),
            ExitCode::DiagnosticError
        );
        assert_eq!(
            exit_code_for(&[dirty], &["x.html: denied".to_string()]),
            ExitCode::IoError
        );
        assert_eq!(exit_code_for(&[], &[]), ExitCode::Success);
    }

    #[test]
    fn test_json_report() {
        let reports = vec![
            FileReport {
                path: "clean.html".to_string(),
                diagnostics: Vec::new(),
            },
            FileReport {
                path: "index.html".to_string(),
                diagnostics: vec![Diagnostic::new(
                    html_id_ide::Range::on_line(html_id_ide::Position::new(0, 9), 1),
                    DiagnosticSeverity::Error,
                    "Duplicate id \"x\" found 2 times. IDs must be unique.",
                    "html-id-intellisense",
                )
                .with_code("duplicate-id")],
            },
        ];

        let report = json_report(&reports, &[]);

        assert_eq!(report["success"], json!(false));
        assert_eq!(
            report["stats"],
            json!({ "total_files": 2, "files_with_issues": 1, "total_errors": 1, "total_warnings": 0 })
        );
        assert_eq!(report["files"][0]["file"], "index.html");
        assert_eq!(
            report["files"][0]["errors"][0]["location"]["start"],
            json!({ "line": 1, "column": 10 })
        );
        assert_eq!(report["files"][0]["errors"][0]["rule"], "duplicate-id");
    }

    #[test]
    fn test_resolve_config_from_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "htmlid.config.json",
            r#"{ "diagnostics": { "duplicateIds": "warn" } }"#,
        );

        let config = resolve_config(Some(&path)).unwrap();
        assert_eq!(config.duplicate_id_severity(), RuleSeverity::Warn);
    }

    #[test]
    fn test_resolve_config_reports_invalid_file() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "htmlid.config.json", "{ not json");

        assert!(resolve_config(Some(&path)).is_err());
    }
}
