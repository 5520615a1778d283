/*!
 * End-to-end tests for the pastepack pipeline
 */

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use indicatif::ProgressBar;
use tempfile::TempDir;

use crate::bundler::sha256_hex;
use crate::config::{Config, ExtensionSet};
use crate::error::PastePackError;
use crate::types::{BundleResult, BundleWarning};
use crate::writer::SEPARATOR;

// tempdir() names start with a dot; use a visible prefix so direct file
// inputs are not treated as hidden
fn test_dir() -> io::Result<TempDir> {
    tempfile::Builder::new().prefix("pastepack").tempdir()
}

fn write_file(root: &Path, rel: &str, content: &[u8]) -> io::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(&path)?;
    file.write_all(content)?;
    Ok(())
}

// Helper function to create a small project tree
fn setup_test_directory() -> io::Result<TempDir> {
    let temp_dir = test_dir()?;
    let root = temp_dir.path();

    write_file(root, "a.py", &[b'a'; 50])?;
    write_file(root, "b.txt", &[b'b'; 50])?;
    write_file(root, "node_modules/x.js", b"module.exports = 1;\n")?;
    write_file(root, ".git/config", b"[core]\n")?;
    write_file(root, "image.png", &[0x89, b'P', b'N', b'G', 0, 0, 0, 0])?;

    Ok(temp_dir)
}

fn run(config: &Config) -> crate::Result<BundleResult> {
    crate::pack(config, Arc::new(ProgressBar::hidden()))
}

fn block_paths(result: &BundleResult) -> Vec<String> {
    result.blocks.iter().map(|b| b.path.clone()).collect()
}

// Drop the only line that depends on the wall clock
fn without_generated_line(artifact: &str) -> String {
    artifact
        .lines()
        .filter(|line| !line.starts_with("Generated: "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_default_config_scenario() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let result = run(&Config::new([temp_dir.path()]))?;

    assert_eq!(block_paths(&result), vec!["a.py", "b.txt"]);
    assert_eq!(result.included_count, 2);
    assert_eq!(result.total_bytes, 100);
    assert!(result.warnings.is_empty());

    let artifact = result.artifact();
    assert!(!artifact.contains("node_modules"));
    assert!(!artifact.contains("image.png"));
    assert!(!artifact.contains("[core]"));

    Ok(())
}

#[test]
fn test_binary_file_never_bundled_even_with_wildcard() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let mut config = Config::new([temp_dir.path()]);
    config.extensions = ExtensionSet::Any;

    let result = run(&config)?;
    assert!(!block_paths(&result).contains(&"image.png".to_string()));

    Ok(())
}

#[test]
fn test_per_file_limit_scenario() -> io::Result<()> {
    let temp_dir = test_dir()?;
    write_file(temp_dir.path(), "big.txt", &[b'x'; 20])?;
    write_file(temp_dir.path(), "small.txt", &[b'y'; 5])?;

    let mut config = Config::new([temp_dir.path()]);
    config.max_file_bytes = 10;

    let result = run(&config)?;
    assert_eq!(block_paths(&result), vec!["small.txt"]);
    assert_eq!(result.included_count, 1);
    assert_eq!(result.warnings.len(), 1);
    assert!(matches!(
        result.warnings[0],
        BundleWarning::FileTooLarge { size: 20, limit: 10, .. }
    ));

    Ok(())
}

#[test]
fn test_total_budget_never_exceeded() -> io::Result<()> {
    let temp_dir = test_dir()?;
    for (i, size) in [30usize, 25, 20, 15, 10, 5].iter().enumerate() {
        write_file(temp_dir.path(), &format!("f{}.txt", i), &vec![b'z'; *size])?;
    }

    let mut config = Config::new([temp_dir.path()]);
    config.max_total_bytes = 60;

    let result = run(&config)?;
    assert!(result.total_bytes <= 60);
    // f0 (30) + f1 (25) = 55; f2 would make 75, so f2..f5 are all dropped
    assert_eq!(block_paths(&result), vec!["f0.txt", "f1.txt"]);
    assert_eq!(
        result.warnings,
        vec![BundleWarning::BudgetExhausted {
            path: "f2.txt".into(),
            limit: 60
        }]
    );

    Ok(())
}

#[test]
fn test_output_is_sorted_case_insensitively() -> io::Result<()> {
    let temp_dir = test_dir()?;
    write_file(temp_dir.path(), "Zeta.md", b"z\n")?;
    write_file(temp_dir.path(), "alpha.md", b"a\n")?;
    write_file(temp_dir.path(), "Beta/inner.md", b"b\n")?;
    write_file(temp_dir.path(), "beta.md", b"b\n")?;

    let result = run(&Config::new([temp_dir.path()]))?;
    let paths = block_paths(&result);
    // '.' sorts before '/', so "beta.md" precedes "beta/inner.md"
    assert_eq!(paths, vec!["alpha.md", "beta.md", "Beta/inner.md", "Zeta.md"]);

    let lowered: Vec<String> = paths.iter().map(|p| p.to_lowercase()).collect();
    let mut sorted = lowered.clone();
    sorted.sort();
    assert_eq!(lowered, sorted);

    Ok(())
}

#[test]
fn test_idempotent_apart_from_timestamp() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let config = Config::new([temp_dir.path()]);

    let first = run(&config)?.artifact();
    std::thread::sleep(Duration::from_millis(5));
    let second = run(&config)?.artifact();

    assert_eq!(without_generated_line(&first), without_generated_line(&second));

    Ok(())
}

#[test]
fn test_header_fields_and_digest() -> io::Result<()> {
    let temp_dir = test_dir()?;
    let raw = b"print('hi')\r\nprint('bye')";
    write_file(temp_dir.path(), "pkg/hello.py", raw)?;

    let path = temp_dir.path().join("pkg/hello.py");
    let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    filetime::set_file_mtime(&path, FileTime::from_system_time(mtime))?;

    let result = run(&Config::new([temp_dir.path()]))?;
    let abs = dunce::canonicalize(&path)?;
    let artifact = result.artifact();

    let expected_header = format!(
        "<<<FILE path=\"pkg/hello.py\" abspath=\"{}\" size={} mtime=\"2023-11-14T22:13:20+00:00\" sha256=\"{}\" lang=\"python\">>>",
        abs.display(),
        raw.len(),
        sha256_hex(raw)
    );
    let expected_block = format!(
        "{sep}\n{header}\n```python\nprint('hi')\nprint('bye')\n```\n<<<END FILE>>>\n{sep}\n\n",
        sep = SEPARATOR,
        header = expected_header
    );
    assert!(artifact.ends_with(&expected_block), "artifact was:\n{}", artifact);

    Ok(())
}

#[test]
fn test_preamble_summary() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let result = run(&Config::new([temp_dir.path()]))?;
    let artifact = result.artifact();
    let root = dunce::canonicalize(temp_dir.path())?;

    assert!(artifact.starts_with("PASTE‑PACK BUNDLE — multi‑file paste for ChatGPT\nGenerated: "));
    assert!(artifact.contains(&format!("\nPaths: {}\n", root.display())));
    assert!(artifact.contains("\nFiles included: 2; Total bytes: 100\n"));
    assert!(artifact.contains("Please treat each file separately when reviewing.\n\n====="));

    Ok(())
}

#[test]
fn test_single_file_inputs_and_roots() -> io::Result<()> {
    let temp_dir = test_dir()?;
    write_file(temp_dir.path(), "one/a.rs", b"fn a() {}\n")?;
    write_file(temp_dir.path(), "two/b.rs", b"fn b() {}\n")?;

    let config = Config::new([
        temp_dir.path().join("two/b.rs"),
        temp_dir.path().join("one/a.rs"),
    ]);
    let result = run(&config)?;

    assert_eq!(block_paths(&result), vec!["a.rs", "b.rs"]);
    let root = dunce::canonicalize(temp_dir.path())?;
    assert_eq!(result.roots, vec![root.join("one"), root.join("two")]);

    Ok(())
}

#[test]
fn test_extension_filter_applies() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let mut config = Config::new([temp_dir.path()]);
    config.extensions = ExtensionSet::from_list(&[".py"]);

    let result = run(&config)?;
    assert_eq!(block_paths(&result), vec!["a.py"]);

    Ok(())
}

#[test]
fn test_missing_path_fails_before_traversal() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let config = Config::new([temp_dir.path().to_path_buf(), temp_dir.path().join("missing")]);

    match run(&config) {
        Err(PastePackError::PathNotFound(p)) => assert!(p.ends_with("missing")),
        other => panic!("expected PathNotFound, got {:?}", other.map(|r| r.included_count)),
    }

    Ok(())
}

#[test]
fn test_nothing_matched() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let mut config = Config::new([temp_dir.path()]);
    config.extensions = ExtensionSet::from_list(&[".kt"]);

    let err = run(&config).map(|r| r.included_count).unwrap_err();
    assert!(matches!(err, PastePackError::NoFilesMatched));
    assert_eq!(err.exit_code(), 3);

    Ok(())
}

#[test]
fn test_hidden_files_opt_in() -> io::Result<()> {
    let temp_dir = test_dir()?;
    write_file(temp_dir.path(), ".github/workflow.yml", b"on: push\n")?;
    write_file(temp_dir.path(), "visible.yml", b"a: 1\n")?;

    let result = run(&Config::new([temp_dir.path()]))?;
    assert_eq!(block_paths(&result), vec!["visible.yml"]);

    let mut config = Config::new([temp_dir.path()]);
    config.include_hidden = true;
    let result = run(&config)?;
    assert_eq!(block_paths(&result), vec![".github/workflow.yml", "visible.yml"]);

    Ok(())
}
