// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

pub fn unique_temp_dir(label: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_micros();
    let seq = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "sanforge-it-{label}-{}-{now}-{seq}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn write_source(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("write source");
    path
}

/// Run the compiled binary with a clean SANFORGE_* environment.
pub fn run_sanforge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sanforge"))
        .args(args)
        .env_remove("SANFORGE_ORIGIN")
        .env_remove("SANFORGE_FILL_BYTE")
        .env_remove("SANFORGE_UNCHECKED")
        .env_remove("SANFORGE_QUIET")
        .env("NO_COLOR", "1")
        .output()
        .expect("run sanforge")
}

pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}
