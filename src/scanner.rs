/*!
 * File discovery: walks the input paths and yields text file candidates
 */

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use walkdir::{DirEntry, WalkDir};

use crate::classifier::is_probably_text;
use crate::config::Config;
use crate::error::{PastePackError, Result};
use crate::matcher;
use crate::types::FileCandidate;

/// Scanner for the configured input paths
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        Self { config, progress }
    }

    /// Walk every input path and return the discovered candidates, in
    /// input order and then traversal order.
    pub fn scan(&self) -> Result<Vec<FileCandidate>> {
        let mut candidates = Vec::new();

        for input in &self.config.paths {
            let abs_path = dunce::canonicalize(input).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PastePackError::PathNotFound(input.clone())
                } else {
                    PastePackError::Io(e)
                }
            })?;

            if abs_path.is_file() {
                candidates.extend(self.scan_file(&abs_path));
            } else if abs_path.is_dir() {
                self.scan_directory(&abs_path, &mut candidates);
            } else {
                crate::bail!(
                    InvalidArgument,
                    "not a regular file or directory: {}",
                    input.display()
                );
            }
        }

        log::info!("Discovered {} candidate files", candidates.len());
        Ok(candidates)
    }

    /// Process a file passed directly as an input path
    fn scan_file(&self, abs_path: &Path) -> Option<FileCandidate> {
        if !self.config.include_hidden && has_hidden_component(abs_path) {
            log::debug!("Skipping hidden input {}", abs_path.display());
            return None;
        }

        let root = abs_path.parent().map(Path::to_path_buf).unwrap_or_default();
        let name = abs_path.file_name()?;
        self.candidate(&root, abs_path, PathBuf::from(name))
    }

    /// Walk a directory, pruning hidden and excluded subdirectories
    fn scan_directory(&self, root: &Path, candidates: &mut Vec<FileCandidate>) {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.should_prune(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Error walking {}: {}", root.display(), e);
                    continue;
                }
            };

            // Symlinks to files count as the file; directory symlinks are never entered
            if entry.depth() == 0 || !entry.path().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.config.include_hidden && name.starts_with('.') {
                log::debug!("Skipping hidden file {}", entry.path().display());
                continue;
            }

            let rel_path = match entry.path().strip_prefix(root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };

            candidates.extend(self.candidate(root, entry.path(), rel_path));
        }
    }

    /// True for subdirectories that must not be descended into
    fn should_prune(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        let pruned = (!self.config.include_hidden && name.starts_with('.'))
            || self.should_ignore(&name, entry.path());
        if pruned {
            log::debug!("Pruning directory {}", entry.path().display());
        }
        pruned
    }

    /// Check a name/path pair against the exclusion rules
    pub fn should_ignore(&self, name: &str, path: &Path) -> bool {
        matcher::matches(name, path, &self.config.exclusions)
    }

    /// Apply exclusion rules and the classifier, then read metadata
    fn candidate(&self, root: &Path, abs_path: &Path, rel_path: PathBuf) -> Option<FileCandidate> {
        let name = abs_path.file_name()?.to_string_lossy();
        if self.should_ignore(&name, abs_path) {
            log::debug!("Excluding {}", abs_path.display());
            return None;
        }

        self.progress.inc(1);
        self.progress
            .set_message(format!("Classifying {}", rel_path.display()));

        if !is_probably_text(abs_path, self.config.sample_size) {
            return None;
        }

        let metadata = match fs::metadata(abs_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("Cannot stat {}: {}", abs_path.display(), e);
                return None;
            }
        };

        Some(FileCandidate {
            root: root.to_path_buf(),
            absolute_path: abs_path.to_path_buf(),
            relative_path: rel_path,
            size_bytes: metadata.len(),
            modified_at: metadata.modified().unwrap_or(std::time::UNIX_EPOCH),
        })
    }
}

/// True if any normal component of `path` starts with a dot
fn has_hidden_component(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(part) => part.to_string_lossy().starts_with('.'),
        _ => false,
    })
}
