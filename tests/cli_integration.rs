// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

mod common;

use std::fs;

use common::sanforge_cli::{run_sanforge, stderr_text, stdout_text, unique_temp_dir, write_source};

#[test]
fn assembles_to_default_hex_file() {
    let dir = unique_temp_dir("hex");
    let src = write_source(&dir, "prog.san", "$42 lda.# $1234 sta rts\n");
    let output = run_sanforge(&[src.to_str().expect("utf8 path"), "--origin", "1000"]);
    assert!(output.status.success(), "{}", stderr_text(&output));
    let hex = fs::read_to_string(dir.join("prog.hex")).expect("hex output");
    assert_eq!(hex, ":06100000A9428D341260CC\n:00000001FF\n");
}

#[test]
fn writes_binary_with_fill_and_range() {
    let dir = unique_temp_dir("bin");
    let src = write_source(&dir, "rom.san", "( reset ) $C000 org here jmp\n");
    let out_base = dir.join("image");
    let output = run_sanforge(&[
        "-b",
        "c000:c003",
        "-f",
        "00",
        "-o",
        out_base.to_str().expect("utf8 path"),
        src.to_str().expect("utf8 path"),
    ]);
    assert!(output.status.success(), "{}", stderr_text(&output));
    let bin = fs::read(dir.join("image.bin")).expect("bin output");
    assert_eq!(bin, vec![0x4C, 0x00, 0xC0, 0x00]);
    assert!(!dir.join("image.hex").exists());
}

#[test]
fn go_address_adds_start_record() {
    let dir = unique_temp_dir("go");
    let src = write_source(&dir, "go.san", "nop\n");
    let hex_path = dir.join("go-out.hex");
    let output = run_sanforge(&[
        "-x",
        hex_path.to_str().expect("utf8 path"),
        "-g",
        "0800",
        src.to_str().expect("utf8 path"),
    ]);
    assert!(output.status.success(), "{}", stderr_text(&output));
    let hex = fs::read_to_string(&hex_path).expect("hex output");
    let lines: Vec<&str> = hex.lines().collect();
    assert_eq!(lines, vec![":01080000EA0D", ":0400000300000800F1", ":00000001FF"]);
}

#[test]
fn underflow_fails_with_located_diagnostic() {
    let dir = unique_temp_dir("underflow");
    let src = write_source(&dir, "bad.san", "nop\nlda.#\n");
    let output = run_sanforge(&[src.to_str().expect("utf8 path")]);
    assert!(!output.status.success());
    let stderr = stderr_text(&output);
    assert!(stderr.contains("bad.san:2: ERROR [san302]"), "{stderr}");
    assert!(stderr.contains("lda.# ($A9)"), "{stderr}");
    assert!(!dir.join("bad.hex").exists());
}

#[test]
fn json_diagnostics_are_machine_readable() {
    let dir = unique_temp_dir("json");
    let src = write_source(&dir, "warn.san", "$10 inx\n");
    let output = run_sanforge(&["--format", "json", src.to_str().expect("utf8 path")]);
    assert!(output.status.success(), "{}", stderr_text(&output));
    let stderr = stderr_text(&output);
    let line = stderr.lines().next().expect("diagnostic line");
    let value: serde_json::Value = serde_json::from_str(line).expect("valid json");
    assert_eq!(value["severity"], "warning");
    assert_eq!(value["code"], "san301");
    assert_eq!(value["line"], 1);
}

#[test]
fn no_warn_and_quiet_suppress_warnings() {
    let dir = unique_temp_dir("quiet");
    let src = write_source(&dir, "warn.san", "$10 inx\n");
    for flag in ["-w", "-q"] {
        let output = run_sanforge(&[flag, src.to_str().expect("utf8 path")]);
        assert!(output.status.success());
        assert!(stderr_text(&output).is_empty(), "{flag}");
    }
}

#[test]
fn unchecked_flag_truncates_wide_operands() {
    let dir = unique_temp_dir("unchecked");
    let src = write_source(&dir, "wide.san", "$1234 lda.#\n");
    let checked = run_sanforge(&[src.to_str().expect("utf8 path")]);
    assert!(!checked.status.success());

    let output = run_sanforge(&["--unchecked", src.to_str().expect("utf8 path"), "-b"]);
    assert!(output.status.success(), "{}", stderr_text(&output));
    let bin = fs::read(dir.join("wide.bin")).expect("bin output");
    assert_eq!(bin, vec![0xA9, 0x34]);
}

#[test]
fn print_opcodes_reports_table() {
    let output = run_sanforge(&["--print-opcodes"]);
    assert!(output.status.success());
    let stdout = stdout_text(&output);
    assert!(stdout.starts_with("sanforge-opcodes-v1\n"));
    assert!(stdout.contains("entry_base=A000"));
    assert!(stdout.contains("opcode=4C;name=jmp;length=3;"));

    let json = run_sanforge(&["--print-opcodes", "--format", "json"]);
    let value: serde_json::Value =
        serde_json::from_str(stdout_text(&json).trim()).expect("valid json");
    assert_eq!(value["opcodes"].as_array().map(Vec::len), Some(212));
}

#[test]
fn print_opcodes_rejects_bad_entry_base() {
    let output = run_sanforge(&["--print-opcodes", "--entry-base", "zzzz"]);
    assert!(!output.status.success());
    assert!(stdout_text(&output).is_empty());
    assert!(stderr_text(&output).contains("--entry-base"));

    let output = run_sanforge(&["--print-opcodes", "--entry-base", "$B000"]);
    assert!(output.status.success(), "{}", stderr_text(&output));
    assert!(stdout_text(&output).contains("entry_base=B000"));
}

#[test]
fn invalid_cli_value_is_rejected() {
    let dir = unique_temp_dir("cli");
    let src = write_source(&dir, "prog.san", "nop\n");
    let output = run_sanforge(&["--origin", "xyz", src.to_str().expect("utf8 path")]);
    assert!(!output.status.success());
    assert!(stderr_text(&output).contains("--origin"));
}

#[test]
fn missing_input_file_is_an_io_error() {
    let dir = unique_temp_dir("missing");
    let output = run_sanforge(&[dir.join("absent.san").to_str().expect("utf8 path")]);
    assert!(!output.status.success());
    assert!(stderr_text(&output).contains("absent.san"));
}
