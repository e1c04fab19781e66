// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for sanforge.

use std::io::{self, Write};

use clap::Parser;
use serde_json::json;

use sanforge::assembler::cli::{parse_address, validate_cli, Cli, OutputFormat};
use sanforge::assembler::{opcode_report, opcode_report_json, run_with_cli, DEFAULT_ENTRY_BASE};
use sanforge::core::error::{Diagnostic, Severity};

fn severity_to_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

fn format_diagnostic_line(
    diag: &Diagnostic,
    source_lines: Option<&[String]>,
    use_color: bool,
    format: OutputFormat,
) -> String {
    if format == OutputFormat::Json {
        json!({
            "code": diag.code(),
            "severity": severity_to_str(diag.severity()),
            "message": diag.message(),
            "file": diag.file(),
            "line": diag.line(),
            "col_start": diag.column(),
            "col_end": diag.col_end(),
            "notes": diag.notes(),
        })
        .to_string()
    } else {
        diag.format_with_context(source_lines, use_color)
    }
}

fn emit_diagnostics(
    diagnostics: &[Diagnostic],
    source_lines: &[String],
    emit_warnings: bool,
    format: OutputFormat,
) {
    let use_color = std::env::var("NO_COLOR").is_err() && format == OutputFormat::Text;
    let mut stderr = io::stderr().lock();
    for diag in diagnostics
        .iter()
        .filter(|diag| emit_warnings || diag.severity() != Severity::Warning)
    {
        let line = format_diagnostic_line(diag, Some(source_lines), use_color, format);
        let _ = writeln!(stderr, "{line}");
    }
}

fn init_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.print_opcodes {
        let entry_base = match cli.entry_base.as_deref() {
            Some(base) => match parse_address(base, "--entry-base address") {
                Ok(base) => base,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            },
            None => DEFAULT_ENTRY_BASE,
        };
        if cli.format == OutputFormat::Json {
            println!("{}", opcode_report_json(entry_base));
        } else {
            println!("{}", opcode_report(entry_base));
        }
        return;
    }

    let cli_config = match validate_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run_with_cli(&cli_config) {
        Ok(report) => {
            if cli_config.quiet {
                return;
            }
            emit_diagnostics(
                report.diagnostics(),
                report.source_lines(),
                cli_config.emit_warnings,
                cli_config.output_format,
            );
        }
        Err(err) => {
            emit_diagnostics(
                err.diagnostics(),
                err.source_lines(),
                cli_config.emit_warnings,
                cli_config.output_format,
            );
            if cli_config.output_format != OutputFormat::Json {
                eprintln!("{err}");
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanforge::core::error::{AsmError, AsmErrorKind};

    #[test]
    fn format_diagnostic_line_json_has_expected_keys_with_nulls() {
        let diag = Diagnostic::new(
            7,
            Severity::Error,
            AsmError::new(AsmErrorKind::Parser, "boom", None),
        )
        .with_code("san999");
        let line = format_diagnostic_line(&diag, None, false, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["code"], "san999");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["message"], "boom");
        assert_eq!(value["line"], 7);
        assert!(value["file"].is_null());
        assert!(value["col_start"].is_null());
        assert!(value["col_end"].is_null());
        assert!(value["notes"].is_array());
    }

    #[test]
    fn format_diagnostic_line_text_includes_source_context() {
        let diag = Diagnostic::new(
            1,
            Severity::Warning,
            AsmError::new(AsmErrorKind::Stack, "left over", None),
        );
        let lines = vec!["$10 inx".to_string()];
        let text = format_diagnostic_line(&diag, Some(&lines), false, OutputFormat::Text);
        assert!(text.contains("$10 inx"));
        assert!(text.contains("left over"));
    }
}
