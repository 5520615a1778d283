/*!
 * Core types and data structures for the pastepack pipeline
 */

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

/// A text file discovered under one of the input paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Input path the file was discovered under
    pub root: PathBuf,
    /// Resolved location on disk
    pub absolute_path: PathBuf,
    /// Path relative to `root`
    pub relative_path: PathBuf,
    /// Size in bytes at discovery time
    pub size_bytes: u64,
    /// Last modification time
    pub modified_at: SystemTime,
}

impl FileCandidate {
    /// Relative path with `/` separators, independent of the host
    pub fn display_path(&self) -> String {
        to_slash_path(&self.relative_path)
    }

    /// Extension including the leading dot, lowercased (`".rs"`), if any
    pub fn extension(&self) -> Option<String> {
        self.absolute_path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
    }
}

/// Join the normal components of `path` with `/`
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// One file's serialized form in the artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFileBlock {
    /// Relative path, `/`-separated
    pub path: String,
    /// Absolute path on disk
    pub absolute_path: String,
    /// Raw byte length as read
    pub size: u64,
    /// Modification time, ISO-8601 UTC
    pub mtime: String,
    /// Hex sha256 of the raw bytes
    pub sha256: String,
    /// Fence language tag, empty if unknown
    pub lang: String,
    /// Decoded, newline-normalized content
    pub body: String,
}

/// A non-fatal problem met while bundling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleWarning {
    /// The file could not be read
    ReadFailed { path: PathBuf, reason: String },
    /// The file is larger than the per-file budget
    FileTooLarge { path: String, size: u64, limit: u64 },
    /// Adding the file would overflow the total budget; bundling stopped here
    BudgetExhausted { path: String, limit: u64 },
}

impl fmt::Display for BundleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { path, reason } => {
                write!(f, "Skipping {} — read error: {}", path.display(), reason)
            }
            Self::FileTooLarge { path, size, limit } => write!(
                f,
                "Skipping {} — {} bytes exceeds --max-file-bytes={}",
                path, size, limit
            ),
            Self::BudgetExhausted { path, limit } => write!(
                f,
                "Stopped before {} — adding it would exceed --max-total-bytes={}",
                path, limit
            ),
        }
    }
}

/// The finished bundle
#[derive(Debug, Clone)]
pub struct BundleResult {
    /// Summary text placed before the file blocks
    pub preamble: String,
    /// Rendered files, in output order
    pub blocks: Vec<RenderedFileBlock>,
    /// Warnings, in the order they were raised
    pub warnings: Vec<BundleWarning>,
    /// Number of files in `blocks`
    pub included_count: usize,
    /// Sum of raw byte lengths of the included files
    pub total_bytes: u64,
    /// When the bundle was generated
    pub generated_at: DateTime<Utc>,
    /// Distinct input roots, sorted
    pub roots: Vec<PathBuf>,
}

impl BundleResult {
    /// The full artifact text: preamble, a blank line, then every block
    pub fn artifact(&self) -> String {
        let mut out = String::with_capacity(
            self.preamble.len() + self.blocks.iter().map(|b| b.body.len() + 512).sum::<usize>(),
        );
        out.push_str(&self.preamble);
        out.push('\n');
        for block in &self.blocks {
            out.push_str(&block.to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(rel: &str) -> FileCandidate {
        FileCandidate {
            root: PathBuf::from("/proj"),
            absolute_path: PathBuf::from("/proj").join(rel),
            relative_path: PathBuf::from(rel),
            size_bytes: 0,
            modified_at: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_display_path_uses_forward_slashes() {
        let c = FileCandidate {
            relative_path: ["src", "core", "lib.rs"].iter().collect(),
            ..candidate("x")
        };
        assert_eq!(c.display_path(), "src/core/lib.rs");
    }

    #[test]
    fn test_extension() {
        assert_eq!(candidate("a/Main.RS").extension().as_deref(), Some(".rs"));
        assert_eq!(candidate("archive.tar.gz").extension().as_deref(), Some(".gz"));
        assert_eq!(candidate("Makefile").extension(), None);
        assert_eq!(candidate(".env").extension(), None);
    }

    #[test]
    fn test_warning_messages() {
        let w = BundleWarning::FileTooLarge {
            path: "big.txt".into(),
            size: 20,
            limit: 10,
        };
        assert_eq!(
            w.to_string(),
            "Skipping big.txt — 20 bytes exceeds --max-file-bytes=10"
        );

        let w = BundleWarning::BudgetExhausted {
            path: "c.py".into(),
            limit: 100,
        };
        assert_eq!(
            w.to_string(),
            "Stopped before c.py — adding it would exceed --max-total-bytes=100"
        );
    }
}
