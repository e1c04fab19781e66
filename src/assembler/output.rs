// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Hex and binary image files for a finished run.

use std::fs::File;
use std::io::{BufWriter, Write};

use log::info;

use crate::core::error::{AsmError, AsmErrorKind, AsmRunError, AsmRunReport};

use super::cli::CliConfig;

fn io_error(report: &AsmRunReport, message: &str, param: Option<&str>) -> AsmRunError {
    AsmRunError::new(
        AsmError::new(AsmErrorKind::Io, message, param),
        report.diagnostics().to_vec(),
        report.source_lines().to_vec(),
    )
    .with_bytes(report.bytes().to_vec())
}

fn create_output(report: &AsmRunReport, path: &str) -> Result<BufWriter<File>, AsmRunError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|_| io_error(report, "Error opening file for write", Some(path)))
}

/// Write every output file the configuration asks for.
pub(super) fn emit_outputs(config: &CliConfig, report: &AsmRunReport) -> Result<(), AsmRunError> {
    let image = report.image();

    if let Some(hex_path) = &config.hex_path {
        let mut hex_file = create_output(report, hex_path)?;
        image
            .write_hex_file(&mut hex_file, config.go_addr)
            .and_then(|_| hex_file.flush())
            .map_err(|err| io_error(report, &err.to_string(), Some(hex_path)))?;
        info!("wrote {hex_path} ({} bytes)", report.bytes().len());
    }

    if let (Some(spec), Some(bin_path)) = (&config.bin_spec, config.bin_path()) {
        let range = match spec.range {
            Some(range) => Some((range.start, range.end)),
            None => image.output_range(),
        };
        let mut bin_file = create_output(report, &bin_path)?;
        if let Some((start, end)) = range {
            image
                .write_bin_file(&mut bin_file, start, end, config.fill_byte)
                .and_then(|_| bin_file.flush())
                .map_err(|err| io_error(report, &err.to_string(), Some(&bin_path)))?;
            info!("wrote {bin_path} (${start:04X}-${end:04X})");
        }
    }

    Ok(())
}
