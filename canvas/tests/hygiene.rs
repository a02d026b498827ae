//! Hygiene: source-level checks on the canvas crate.
//!
//! Each pattern has a budget (zero everywhere today). Production files under
//! `src/` are scanned; `*_test.rs` files are exempt. Raising a budget means
//! removing an existing occurrence first.

use std::fs;
use std::path::Path;

// Panics in library code.
const MAX_UNWRAP: usize = 0;
const MAX_EXPECT: usize = 0;
const MAX_PANIC: usize = 0;
const MAX_UNREACHABLE: usize = 0;
const MAX_TODO: usize = 0;
const MAX_UNIMPLEMENTED: usize = 0;

// Errors dropped on the floor.
const MAX_SILENT_DISCARD: usize = 0;
const MAX_DOT_OK: usize = 0;

// Output goes through `tracing`.
const MAX_PRINT: usize = 0;
const MAX_DBG: usize = 0;

const MAX_ALLOW_DEAD_CODE: usize = 0;

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        if !path.extension().is_some_and(|e| e == "rs") {
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Per-file line counts for `pattern`, skipping `//` comment lines.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| !line.trim_start().starts_with("//"))
                .filter(|line| line.contains(pattern))
                .count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn assert_budget(patterns: &[&str], max: usize) {
    let files = source_files();
    assert!(!files.is_empty(), "no source files found under src/");
    let found: Vec<(String, usize)> = patterns.iter().flat_map(|p| hits(&files, p)).collect();
    let count: usize = found.iter().map(|(_, c)| c).sum();
    let listing = found
        .iter()
        .map(|(path, c)| format!("  {path}: {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(count <= max, "{patterns:?} budget exceeded: found {count}, max {max}.\n{listing}");
}

// =============================================================
// Panics
// =============================================================

#[test]
fn unwrap_budget() {
    assert_budget(&[".unwrap()"], MAX_UNWRAP);
}

#[test]
fn expect_budget() {
    assert_budget(&[".expect("], MAX_EXPECT);
}

#[test]
fn panic_budget() {
    assert_budget(&["panic!("], MAX_PANIC);
}

#[test]
fn unreachable_budget() {
    assert_budget(&["unreachable!("], MAX_UNREACHABLE);
}

#[test]
fn todo_budget() {
    assert_budget(&["todo!("], MAX_TODO);
}

#[test]
fn unimplemented_budget() {
    assert_budget(&["unimplemented!("], MAX_UNIMPLEMENTED);
}

// =============================================================
// Discarded errors
// =============================================================

#[test]
fn silent_discard_budget() {
    assert_budget(&["let _ ="], MAX_SILENT_DISCARD);
}

#[test]
fn dot_ok_budget() {
    assert_budget(&[".ok()"], MAX_DOT_OK);
}

// =============================================================
// Output and structure
// =============================================================

#[test]
fn print_budget() {
    assert_budget(&["println!(", "eprintln!("], MAX_PRINT);
}

#[test]
fn dbg_budget() {
    assert_budget(&["dbg!("], MAX_DBG);
}

#[test]
fn allow_dead_code_budget() {
    assert_budget(&["#[allow(dead_code)]"], MAX_ALLOW_DEAD_CODE);
}
