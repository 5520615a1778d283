/*!
 * pastepack - Bundle source files into one delimited paste for LLM chat context
 *
 * This library discovers text files under a set of paths, filters them by
 * exclusion rules and extension allow-lists, and joins the survivors into a
 * single artifact with deterministic per-file metadata headers.
 */

pub mod bundler;
pub mod classifier;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod report;
pub mod scanner;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use indicatif::ProgressBar;

// Re-export main components for easier access
pub use bundler::Bundler;
pub use config::{Config, ExtensionSet, LanguageMap};
pub use error::{PastePackError, Result};
pub use filter::filter_by_extension;
pub use matcher::ExclusionRule;
pub use report::{BundleReport, ReportFormat, Reporter};
pub use scanner::Scanner;
pub use types::{BundleResult, BundleWarning, FileCandidate, RenderedFileBlock};
pub use writer::{FileSink, OutputSink, StdoutSink};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the whole pipeline: validate, discover, filter and bundle.
///
/// Fails with [`PastePackError::PathNotFound`] before any traversal if an
/// input is missing, and with [`PastePackError::NoFilesMatched`] if nothing
/// survives discovery and filtering. Per-file problems are returned as
/// warnings inside the result.
pub fn pack(config: &Config, progress: Arc<ProgressBar>) -> Result<BundleResult> {
    config.validate()?;

    let scanner = Scanner::new(config.clone(), Arc::clone(&progress));
    let candidates = filter_by_extension(scanner.scan()?, &config.extensions);
    if candidates.is_empty() {
        return Err(PastePackError::NoFilesMatched);
    }

    let bundler = Bundler::from_config(config, progress);
    Ok(bundler.bundle(candidates))
}
