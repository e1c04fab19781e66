// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::env;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};

use crate::core::error::{AsmError, AsmErrorKind, AsmRunError};
use crate::families::mos6502::EncodeMode;

use super::engine::{SessionConfig, DEFAULT_ENTRY_BASE, DEFAULT_ORIGIN};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Table-driven 65C02 assembler for SAN (operand-before-mnemonic) source.

Operands are pushed first and consumed by the mnemonic word that follows,
e.g. `$42 lda.#` or `$1234 jmp`. Mnemonics carry their addressing mode as a
suffix (lda.zx, lda.zxi, jmp.i, asl.a).

Outputs are opt-in: -x/--hex and -b/--bin. With neither, an Intel Hex file is
written next to the input. Use -o/--outfile to set the output base name when
filenames are omitted. For -b, a range is optional: ssss:eeee (4 hex digits
each). If the range is omitted, the binary spans the emitted output.";

#[derive(Parser, Debug)]
#[command(
    name = "sanforge",
    version = VERSION,
    about = "65C02 SAN assembler with table-driven opcode encoding",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select global CLI output format. text is default; json enables machine-readable diagnostics and reports."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Suppress diagnostic output for successful assembly runs. Errors are still reported."
    )]
    pub quiet: bool,
    #[arg(
        short = 'w',
        long = "no-warn",
        action = ArgAction::SetTrue,
        long_help = "Suppress warning diagnostics."
    )]
    pub no_warn: bool,
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        long_help = "Increase log verbosity (repeatable). -v logs directives, -vv every word. RUST_LOG overrides."
    )]
    pub verbose: u8,
    #[arg(
        long = "print-opcodes",
        action = ArgAction::SetTrue,
        long_help = "Print the opcode table (opcode, SAN name, length, entry slot) and exit."
    )]
    pub print_opcodes: bool,
    #[arg(
        short = 'x',
        long = "hex",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Emit an Intel Hex file. FILE is optional; when omitted, the output base is used and a .hex extension is added."
    )]
    pub hex_name: Option<String>,
    #[arg(
        short = 'b',
        long = "bin",
        value_name = "[FILE:]ssss:eeee|FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Emit a binary image file. The range is optional: ssss:eeee (4 hex digits each). Use FILE:ssss:eeee to override the filename. If FILE has no extension, .bin is added. Without a range the binary spans the emitted output."
    )]
    pub bin_output: Option<String>,
    #[arg(
        short = 'o',
        long = "outfile",
        value_name = "BASE",
        long_help = "Output filename base when -x/-b omit filenames. Defaults to the input base."
    )]
    pub outfile: Option<String>,
    #[arg(
        short = 'f',
        long = "fill",
        value_name = "hh",
        long_help = "Fill byte for binary output (2 hex digits). Defaults to FF. Requires -b/--bin."
    )]
    pub fill_byte: Option<String>,
    #[arg(
        short = 'g',
        long = "go",
        value_name = "aaaa",
        long_help = "Set execution start address (4 hex digits). Adds a Start Address record to hex output. Requires hex output."
    )]
    pub go_addr: Option<String>,
    #[arg(
        long = "origin",
        value_name = "aaaa",
        long_help = "Address of the first emitted byte (4 hex digits). Defaults to 0800. Source can still move it with `org` before any code."
    )]
    pub origin: Option<String>,
    #[arg(
        long = "entry-base",
        value_name = "aaaa",
        long_help = "Base address of the opcode entry-point table (4 hex digits). Defaults to A000. Affects the slot numbers in --print-opcodes."
    )]
    pub entry_base: Option<String>,
    #[arg(
        long = "unchecked",
        action = ArgAction::SetTrue,
        long_help = "Skip operand, opcode and branch range checks; values are truncated."
    )]
    pub unchecked: bool,
    #[arg(
        value_name = "INPUT",
        required_unless_present = "print_opcodes",
        long_help = "SAN source file to assemble."
    )]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinRange {
    pub start: u16,
    pub end: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinOutputSpec {
    pub name: Option<String>,
    pub range: Option<BinRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn is_valid_hex_4(s: &str) -> bool {
    s.len() == 4 && s.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn is_valid_hex_2(s: &str) -> bool {
    s.len() == 2 && s.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn parse_bin_range_str(s: &str) -> Option<BinRange> {
    let (start, end) = s.split_once(':')?;
    if !is_valid_hex_4(start) || !is_valid_hex_4(end) {
        return None;
    }
    let start = u16::from_str_radix(start, 16).ok()?;
    let end = u16::from_str_radix(end, 16).ok()?;
    if start > end {
        return None;
    }
    Some(BinRange { start, end })
}

pub fn parse_bin_output_arg(arg: &str) -> Result<BinOutputSpec, &'static str> {
    const RANGE_ERR: &str = "Invalid -b/--bin range; must be ssss:eeee (4 hex digits, start <= end)";

    if arg.is_empty() {
        return Ok(BinOutputSpec {
            name: None,
            range: None,
        });
    }
    if !arg.contains(':') {
        return Ok(BinOutputSpec {
            name: Some(arg.to_string()),
            range: None,
        });
    }

    let mut parts = arg.rsplitn(3, ':');
    let end = parts.next().unwrap_or_default();
    let start = parts.next().unwrap_or_default();
    let name = parts.next();
    if !is_valid_hex_4(start) || !is_valid_hex_4(end) {
        return Err("Invalid -b/--bin argument; use ssss:eeee, name:ssss:eeee, or name only");
    }
    let range = parse_bin_range_str(&format!("{start}:{end}")).ok_or(RANGE_ERR)?;
    Ok(BinOutputSpec {
        name: name.filter(|name| !name.is_empty()).map(str::to_string),
        range: Some(range),
    })
}

pub fn resolve_output_path(base: &str, name: Option<String>, extension: &str) -> Option<String> {
    let name = name?;
    if name.is_empty() {
        return Some(format!("{base}.{extension}"));
    }
    let mut path = PathBuf::from(&name);
    if path.extension().is_none() {
        path = PathBuf::from(format!("{name}.{extension}"));
    }
    Some(path.to_string_lossy().to_string())
}

/// Output base for `path`: the input path without its extension.
pub fn input_base_from_path(path: &Path) -> Result<String, AsmRunError> {
    if path.file_name().and_then(|s| s.to_str()).is_none() {
        return Err(cli_error("Invalid input file name"));
    }
    if path.is_dir() {
        return Err(cli_error(format!(
            "Input must be a file: {}",
            path.display()
        )));
    }
    Ok(path.with_extension("").to_string_lossy().to_string())
}

fn cli_error(message: impl Into<String>) -> AsmRunError {
    AsmRunError::new(
        AsmError::new(AsmErrorKind::Cli, &message.into(), None),
        Vec::new(),
        Vec::new(),
    )
}

fn parse_env_bool(var_name: &str) -> Result<Option<bool>, AsmRunError> {
    let Some(raw) = env::var_os(var_name) else {
        return Ok(None);
    };
    let value = raw.to_string_lossy().trim().to_ascii_lowercase();
    let parsed = match value.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        "" => None,
        _ => {
            return Err(cli_error(format!(
                "Invalid boolean value for {var_name}: {value}"
            )))
        }
    };
    Ok(parsed)
}

fn parse_env_string(var_name: &str) -> Result<Option<String>, AsmRunError> {
    let Some(raw) = env::var_os(var_name) else {
        return Ok(None);
    };
    let value = raw.to_string_lossy().trim().to_string();
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(value))
}

/// Parse a 4-hex-digit address with an optional `$` prefix.
pub fn parse_address(value: &str, what: &str) -> Result<u16, AsmRunError> {
    let value = value.strip_prefix('$').unwrap_or(value);
    if !is_valid_hex_4(value) {
        return Err(cli_error(format!("Invalid {what}; must be 4 hex digits")));
    }
    u16::from_str_radix(value, 16)
        .map_err(|_| cli_error(format!("Invalid {what}; must be 4 hex digits")))
}

/// Validate CLI arguments and return parsed configuration.
pub fn validate_cli(cli: &Cli) -> Result<CliConfig, AsmRunError> {
    let env_origin = parse_env_string("SANFORGE_ORIGIN")?;
    let env_fill_byte = parse_env_string("SANFORGE_FILL_BYTE")?;
    let env_unchecked = parse_env_bool("SANFORGE_UNCHECKED")?;
    let env_quiet = parse_env_bool("SANFORGE_QUIET")?;

    let effective_quiet = if cli.quiet {
        true
    } else {
        env_quiet.unwrap_or(false)
    };
    let effective_unchecked = if cli.unchecked {
        true
    } else {
        env_unchecked.unwrap_or(false)
    };
    let effective_origin = if cli.origin.is_some() {
        cli.origin.clone()
    } else {
        env_origin
    };
    let effective_fill_byte = if cli.fill_byte.is_some() {
        cli.fill_byte.clone()
    } else {
        env_fill_byte
    };

    let Some(input_path) = cli.input.clone() else {
        return Err(cli_error("No input file specified"));
    };
    let input_base = input_base_from_path(&input_path)?;
    let out_base = cli.outfile.clone().unwrap_or(input_base);

    let bin_spec = match cli.bin_output.as_deref() {
        Some(arg) => Some(parse_bin_output_arg(arg).map_err(|msg| cli_error(msg))?),
        None => None,
    };
    let hex_name = if cli.hex_name.is_none() && bin_spec.is_none() {
        Some(String::new())
    } else {
        cli.hex_name.clone()
    };
    let hex_path = resolve_output_path(&out_base, hex_name, "hex");

    let go_addr = match cli.go_addr.as_deref() {
        Some(go) => {
            if hex_path.is_none() {
                return Err(cli_error("-g/--go requires hex output (-x/--hex)"));
            }
            Some(parse_address(go, "-g/--go address")?)
        }
        None => None,
    };

    let fill_byte = match effective_fill_byte.as_deref() {
        Some(fill) => {
            if !is_valid_hex_2(fill) {
                return Err(cli_error("Invalid -f/--fill byte; must be 2 hex digits"));
            }
            u8::from_str_radix(fill, 16)
                .map_err(|_| cli_error("Invalid -f/--fill byte; must be 2 hex digits"))?
        }
        None => 0xff,
    };
    if cli.fill_byte.is_some() && bin_spec.is_none() {
        return Err(cli_error("-f/--fill requires binary output (-b/--bin)"));
    }

    let origin = match effective_origin.as_deref() {
        Some(origin) => parse_address(origin, "--origin address")?,
        None => DEFAULT_ORIGIN,
    };
    let entry_base = match cli.entry_base.as_deref() {
        Some(base) => parse_address(base, "--entry-base address")?,
        None => DEFAULT_ENTRY_BASE,
    };

    Ok(CliConfig {
        input_path,
        out_base,
        hex_path,
        bin_spec,
        go_addr,
        fill_byte,
        session: SessionConfig {
            origin,
            entry_base,
            mode: if effective_unchecked {
                EncodeMode::Unchecked
            } else {
                EncodeMode::Checked
            },
        },
        quiet: effective_quiet,
        emit_warnings: !cli.no_warn,
        output_format: cli.format,
    })
}

/// Validated CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub input_path: PathBuf,
    pub out_base: String,
    pub hex_path: Option<String>,
    pub bin_spec: Option<BinOutputSpec>,
    pub go_addr: Option<u16>,
    pub fill_byte: u8,
    pub session: SessionConfig,
    pub quiet: bool,
    pub emit_warnings: bool,
    pub output_format: OutputFormat,
}

impl CliConfig {
    /// Path of the binary image, if one was requested.
    pub fn bin_path(&self) -> Option<String> {
        let spec = self.bin_spec.as_ref()?;
        resolve_output_path(&self.out_base, Some(spec.name.clone().unwrap_or_default()), "bin")
    }
}
