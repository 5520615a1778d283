/*!
 * Bundling: ordered reading, budget enforcement and block rendering
 */

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use indicatif::ProgressBar;
use sha2::{Digest, Sha256};

use crate::config::{byte_budget, Config, LanguageMap};
use crate::types::{BundleResult, BundleWarning, FileCandidate, RenderedFileBlock};
use crate::utils::normalize_newlines;
use crate::writer::{format_system_time, render_preamble};

/// Joins candidates into one artifact
pub struct Bundler {
    /// Per-file budget; `None` is unbounded
    max_file_bytes: Option<u64>,
    /// Total budget; `None` is unbounded
    max_total_bytes: Option<u64>,
    /// Extension to fence language table
    languages: LanguageMap,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Bundler {
    /// Create a bundler with explicit limits (0 or less is unbounded)
    pub fn new(
        max_file_bytes: i64,
        max_total_bytes: i64,
        languages: LanguageMap,
        progress: Arc<ProgressBar>,
    ) -> Self {
        Self {
            max_file_bytes: byte_budget(max_file_bytes),
            max_total_bytes: byte_budget(max_total_bytes),
            languages,
            progress,
        }
    }

    /// Create a bundler from the application configuration
    pub fn from_config(config: &Config, progress: Arc<ProgressBar>) -> Self {
        Self::new(
            config.max_file_bytes,
            config.max_total_bytes,
            config.languages.clone(),
            progress,
        )
    }

    /// Bundle the candidates.
    ///
    /// Candidates are processed in case-insensitive relative path order.
    /// Unreadable and oversized files are skipped with a warning; the first
    /// file that would push the total past its budget stops processing.
    pub fn bundle(&self, mut candidates: Vec<FileCandidate>) -> BundleResult {
        sort_candidates(&mut candidates);

        self.progress.set_length(candidates.len() as u64);
        self.progress.set_position(0);

        let mut blocks = Vec::new();
        let mut warnings = Vec::new();
        let mut total: u64 = 0;

        for candidate in &candidates {
            self.progress
                .set_message(format!("Bundling {}", candidate.display_path()));
            self.progress.inc(1);

            let raw = match fs::read(&candidate.absolute_path) {
                Ok(raw) => raw,
                Err(e) => {
                    warnings.push(BundleWarning::ReadFailed {
                        path: candidate.absolute_path.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let len = raw.len() as u64;

            if let Some(limit) = self.max_file_bytes.filter(|&limit| len > limit) {
                warnings.push(BundleWarning::FileTooLarge {
                    path: candidate.display_path(),
                    size: len,
                    limit,
                });
                continue;
            }

            if let Some(limit) = self.max_total_bytes.filter(|&limit| total + len > limit) {
                log::debug!(
                    "Total budget reached at {}; {} bytes already included",
                    candidate.display_path(),
                    total
                );
                warnings.push(BundleWarning::BudgetExhausted {
                    path: candidate.display_path(),
                    limit,
                });
                break;
            }

            blocks.push(self.render(candidate, &raw));
            total += len;
        }

        for warning in &warnings {
            log::debug!("{}", warning);
        }

        let roots: Vec<PathBuf> = candidates
            .iter()
            .map(|c| c.root.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let generated_at = Utc::now();
        let preamble = render_preamble(generated_at, &roots, blocks.len(), total);

        BundleResult {
            preamble,
            included_count: blocks.len(),
            blocks,
            warnings,
            total_bytes: total,
            generated_at,
            roots,
        }
    }

    /// Decode, hash and describe one file
    fn render(&self, candidate: &FileCandidate, raw: &[u8]) -> RenderedFileBlock {
        let body = normalize_newlines(&String::from_utf8_lossy(raw));

        RenderedFileBlock {
            path: candidate.display_path(),
            absolute_path: candidate.absolute_path.display().to_string(),
            size: raw.len() as u64,
            mtime: format_system_time(candidate.modified_at),
            sha256: sha256_hex(raw),
            lang: self.languages.infer(&candidate.absolute_path).to_string(),
            body,
        }
    }
}

/// Sort by relative path, case-insensitively; ties fall back to the exact
/// path so the order is total
pub fn sort_candidates(candidates: &mut [FileCandidate]) {
    candidates.sort_by_cached_key(|c| {
        let path = c.display_path();
        (path.to_lowercase(), path)
    });
}

/// Hex sha256 digest of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
