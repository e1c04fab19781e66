// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! SAN assembler front end.
//!
//! Ties the source tokenizer and assembly session to the 65C02 encoder, and
//! writes hex/binary images for CLI runs.

pub mod cli;
mod engine;
mod output;
pub mod tokenizer;

use std::fs;
use std::path::Path;

use log::debug;
use serde_json::json;

use crate::core::error::{AsmError, AsmErrorKind, AsmRunError, AsmRunReport, Diagnostic};
use crate::core::imagestore::ImageStore;
use crate::families::mos6502::{DispatchTable, FAMILY_INSTRUCTION_TABLE, OPCODE_INFO};

use cli::CliConfig;
use output::emit_outputs;

pub use cli::VERSION;
pub use engine::{describe_opcode, Session, SessionConfig, DEFAULT_ENTRY_BASE, DEFAULT_ORIGIN};

const OPCODE_REPORT_SCHEMA: &str = "sanforge-opcodes-v1";

impl AsmRunReport {
    /// Emitted bytes keyed by address.
    pub fn image(&self) -> ImageStore {
        let mut image = ImageStore::new();
        image.store_slice(self.origin(), self.bytes());
        image
    }
}

/// Assemble SAN source text in a fresh session.
pub fn assemble_source(source: &str, config: SessionConfig) -> Result<AsmRunReport, AsmRunError> {
    assemble_named(source, config, None)
}

/// Read and assemble one SAN source file.
pub fn assemble_file(path: &Path, config: SessionConfig) -> Result<AsmRunReport, AsmRunError> {
    let file = path.to_string_lossy().to_string();
    let source = fs::read_to_string(path).map_err(|err| {
        AsmRunError::new(
            AsmError::new(AsmErrorKind::Io, &err.to_string(), Some(&file)),
            Vec::new(),
            Vec::new(),
        )
    })?;
    assemble_named(&source, config, Some(file))
}

fn assemble_named(
    source: &str,
    config: SessionConfig,
    file: Option<String>,
) -> Result<AsmRunReport, AsmRunError> {
    let source_lines: Vec<String> = source.lines().map(str::to_string).collect();
    let attach_file = |diag: Diagnostic| diag.with_file(file.clone());

    let mut session = Session::new(config);
    let result = session.run_source(source);
    for site in session.jump_sites() {
        debug!("jmp ${:04X} at ${:04X}", site.target, site.address);
    }

    match result {
        Ok(()) => {
            let diagnostics: Vec<Diagnostic> =
                session.finish().into_iter().map(attach_file).collect();
            let buffer = session.into_buffer();
            debug!(
                "assembled {} bytes at ${:04X}",
                buffer.len(),
                buffer.origin()
            );
            Ok(AsmRunReport::new(diagnostics, source_lines)
                .with_code(buffer.origin(), buffer.into_bytes()))
        }
        Err(diag) => {
            let error = diag.error.clone();
            Err(
                AsmRunError::new(error, vec![attach_file(diag)], source_lines)
                    .with_bytes(session.into_buffer().into_bytes()),
            )
        }
    }
}

/// Assemble the input named by a validated command line and write its outputs.
pub fn run_with_cli(config: &CliConfig) -> Result<AsmRunReport, AsmRunError> {
    let report = assemble_file(&config.input_path, config.session)?;
    emit_outputs(config, &report)?;
    Ok(report)
}

/// Plain-text opcode table for an entry-point table at `entry_base`.
pub fn opcode_report(entry_base: u16) -> String {
    let dispatch = DispatchTable::new(entry_base);
    let mut lines = vec![
        OPCODE_REPORT_SCHEMA.to_string(),
        format!("version={VERSION}"),
        format!("entry_base={entry_base:04X}"),
    ];
    for entry in FAMILY_INSTRUCTION_TABLE {
        lines.push(format!(
            "opcode={:02X};name={};length={};slot={}",
            entry.opcode,
            entry.mnemonic,
            entry.length(),
            dispatch.slot_for_opcode(entry.opcode)
        ));
    }
    let reserved = OPCODE_INFO.len() - FAMILY_INSTRUCTION_TABLE.len();
    lines.push(format!("reserved={reserved}"));
    lines.join("\n")
}

pub fn opcode_report_json(entry_base: u16) -> String {
    let dispatch = DispatchTable::new(entry_base);
    let opcodes: Vec<serde_json::Value> = FAMILY_INSTRUCTION_TABLE
        .iter()
        .map(|entry| {
            let slot = dispatch.slot_for_opcode(entry.opcode);
            json!({
                "opcode": entry.opcode,
                "name": entry.mnemonic,
                "mode": format!("{:?}", entry.mode),
                "length": entry.length(),
                "slot": slot,
                "entry": format!("{:04X}", dispatch.entry_address(slot)),
            })
        })
        .collect();

    json!({
        "schema": OPCODE_REPORT_SCHEMA,
        "version": VERSION,
        "entry_base": format!("{entry_base:04X}"),
        "opcodes": opcodes,
        "reserved": OPCODE_INFO.len() - FAMILY_INSTRUCTION_TABLE.len(),
    })
    .to_string()
}
