/*!
 * Configuration handling for pastepack
 */

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;

use crate::classifier::DEFAULT_SAMPLE_SIZE;
use crate::error::{PastePackError, Result};
use crate::matcher::ExclusionRule;
use crate::utils::{absolutize, DEFAULT_EXCLUDES, DEFAULT_EXTENSIONS, DEFAULT_LANGUAGES};

/// Default per-file byte budget
pub const DEFAULT_MAX_FILE_BYTES: i64 = 250_000;

/// Default total byte budget
pub const DEFAULT_MAX_TOTAL_BYTES: i64 = 1_500_000;

/// Command-line arguments for pastepack
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "pastepack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Bundle files and folders into a single clipboard-ready paste with clear file headers",
    long_about = "Walks the given files and folders, keeps probable text files with allowed extensions, and joins them into one delimited paste with per-file metadata headers and language-tagged code fences."
)]
pub struct Args {
    /// Files and/or directories to include
    #[clap(required_unless_present = "generate")]
    pub paths: Vec<String>,

    /// Comma-separated list of file extensions to include (e.g. .py,.ts). Use * for all text files.
    #[clap(long, value_delimiter = ',', default_values_t = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect::<Vec<_>>())]
    pub ext: Vec<String>,

    /// Glob pattern, folder name or absolute path to exclude. Repeatable; added to the defaults.
    #[clap(long)]
    pub exclude: Vec<String>,

    /// Do not apply the built-in exclusion list
    #[clap(long)]
    pub no_default_excludes: bool,

    /// Include dotfiles and dotfolders
    #[clap(long)]
    pub include_hidden: bool,

    /// Skip any single file larger than this (0 or less for no limit)
    #[clap(long, default_value_t = DEFAULT_MAX_FILE_BYTES, allow_negative_numbers = true)]
    pub max_file_bytes: i64,

    /// Stop when total raw bytes would exceed this (0 or less for no limit)
    #[clap(long, default_value_t = DEFAULT_MAX_TOTAL_BYTES, allow_negative_numbers = true)]
    pub max_total_bytes: i64,

    /// Also write the bundle to this file path
    #[clap(long)]
    pub out: Option<String>,

    /// Do not copy to clipboard; print to stdout instead
    #[clap(long)]
    pub no_clip: bool,

    /// Suppress non-error output
    #[clap(long, short)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(long, short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Allowed file extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionSet {
    /// Every extension, including none
    Any,
    /// Only these lowercased extensions, each with its leading dot
    Only(BTreeSet<String>),
}

impl ExtensionSet {
    /// Build from a list of extensions. An empty list or the single token
    /// `*` allows everything.
    pub fn from_list<S: AsRef<str>>(list: &[S]) -> Self {
        let entries: Vec<&str> = list
            .iter()
            .map(|e| e.as_ref().trim())
            .filter(|e| !e.is_empty())
            .collect();

        if entries.is_empty() || entries == ["*"] {
            return Self::Any;
        }

        Self::Only(
            entries
                .into_iter()
                .map(|e| {
                    let e = e.to_lowercase();
                    if e.starts_with('.') {
                        e
                    } else {
                        format!(".{}", e)
                    }
                })
                .collect(),
        )
    }

    /// Check a lowercased extension such as `".rs"`
    pub fn allows(&self, extension: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Only(set) => extension.is_some_and(|ext| set.contains(ext)),
        }
    }
}

/// Extension to code-fence language table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageMap(HashMap<String, String>);

impl LanguageMap {
    /// Build from `(extension, language)` pairs; extensions are lowercased
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(ext, lang)| (ext.as_ref().to_lowercase(), lang.into()))
                .collect(),
        )
    }

    /// Language tag for a path, or `""` if its extension is unmapped
    pub fn infer(&self, path: &Path) -> &str {
        path.extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .and_then(|ext| self.0.get(&ext))
            .map_or("", String::as_str)
    }
}

impl Default for LanguageMap {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGES.iter().copied())
    }
}

/// Convert a signed byte limit to an optional budget; 0 or less is unbounded
pub fn byte_budget(limit: i64) -> Option<u64> {
    u64::try_from(limit).ok().filter(|&l| l > 0)
}

/// Absolute output path with its parent directory resolved, so it compares
/// equal to the canonical paths produced during discovery
fn resolve_output_path(path: &Path) -> PathBuf {
    let abs = absolutize(path);
    let resolved = match (abs.parent(), abs.file_name()) {
        (Some(parent), Some(name)) => dunce::canonicalize(parent).ok().map(|p| p.join(name)),
        _ => None,
    };
    resolved.unwrap_or(abs)
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Files and directories to bundle
    pub paths: Vec<PathBuf>,

    /// Allowed extensions
    pub extensions: ExtensionSet,

    /// Exclusion rules
    pub exclusions: Vec<ExclusionRule>,

    /// Whether dotfiles and dotfolders are considered
    pub include_hidden: bool,

    /// Per-file byte budget (0 or less is unbounded)
    pub max_file_bytes: i64,

    /// Total byte budget (0 or less is unbounded)
    pub max_total_bytes: i64,

    /// Bytes sampled by the text classifier
    pub sample_size: usize,

    /// Extension to fence language table
    pub languages: LanguageMap,

    /// Optional file to also write the bundle to
    pub output_file: Option<PathBuf>,

    /// Copy the bundle to the clipboard
    pub clip: bool,

    /// Suppress non-error output
    pub quiet: bool,
}

impl Config {
    /// Configuration with every default for the given paths
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            extensions: ExtensionSet::from_list(DEFAULT_EXTENSIONS),
            exclusions: DEFAULT_EXCLUDES
                .iter()
                .map(|p| ExclusionRule::parse(p))
                .collect(),
            include_hidden: false,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            sample_size: DEFAULT_SAMPLE_SIZE,
            languages: LanguageMap::default(),
            output_file: None,
            clip: true,
            quiet: false,
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let mut config = Self::new(args.paths);

        if args.no_default_excludes {
            config.exclusions.clear();
        }
        config
            .exclusions
            .extend(args.exclude.iter().map(|p| ExclusionRule::parse(p)));

        config.extensions = ExtensionSet::from_list(&args.ext);
        config.include_hidden = args.include_hidden;
        config.max_file_bytes = args.max_file_bytes;
        config.max_total_bytes = args.max_total_bytes;
        config.output_file = args.out.map(PathBuf::from);
        config.clip = !args.no_clip;
        config.quiet = args.quiet;

        // Never bundle our own previous output
        if let Some(out) = &config.output_file {
            config
                .exclusions
                .push(ExclusionRule::PathPrefix(resolve_output_path(out)));
        }

        config
    }

    /// Validate the configuration before any traversal
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            !self.paths.is_empty(),
            InvalidArgument,
            "at least one path is required"
        );
        crate::ensure!(
            self.sample_size > 0,
            Config,
            "classifier sample size must be positive"
        );

        for path in &self.paths {
            if !path.exists() {
                return Err(PastePackError::PathNotFound(path.clone()));
            }
            if !path.is_file() && !path.is_dir() {
                crate::bail!(
                    InvalidArgument,
                    "not a regular file or directory: {}",
                    path.display()
                );
            }
        }

        // Check if output file directory exists
        if let Some(parent) = self.output_file.as_deref().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                crate::bail!(Config, "Output directory not found: {}", parent.display());
            }
        }

        Ok(())
    }
}
