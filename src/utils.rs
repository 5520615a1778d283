/*!
 * Utility functions and default tables for pastepack
 */

use std::env;
use std::path::{Component, Path, PathBuf};

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Turn `\r\n` and lone `\r` into `\n`
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Absolute form of `path` with `.` and `..` removed, without touching the
/// filesystem (symlinks are left alone)
pub fn absolutize(path: &Path) -> PathBuf {
    let joined;
    let path = if path.is_absolute() {
        path
    } else {
        joined = env::current_dir().unwrap_or_default().join(path);
        joined.as_path()
    };

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Default patterns to exclude
pub const DEFAULT_EXCLUDES: &[&str] = &[
    // Version Control
    ".git",
    ".svn",
    ".hg",
    // Dependencies
    "node_modules",
    ".venv",
    "venv",
    // Build & Dist
    "dist",
    "build",
    "out",
    "target",
    "coverage",
    // Python
    "__pycache__",
    "*.pyc",
    "*.pyo",
    // Java
    "*.class",
    // OS Files
    ".DS_Store",
];

/// Default extension allow-list
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    // web
    ".html", ".htm", ".css", ".scss", ".sass", ".less", ".js", ".jsx", ".ts", ".tsx", ".json",
    ".mjs", ".cjs",
    // python
    ".py", ".pyi", ".toml", ".ini", ".cfg", ".yml", ".yaml",
    // compiled languages
    ".java", ".kt", ".kts", ".scala", ".go", ".rs", ".c", ".h", ".cpp", ".hpp",
    // scripting
    ".sh", ".bash", ".zsh", ".ps1", ".bat",
    // data & markup
    ".md", ".txt", ".csv", ".xml", ".env", ".sql",
];

/// Default extension to code-fence language table
pub const DEFAULT_LANGUAGES: &[(&str, &str)] = &[
    (".py", "python"),
    (".pyi", "python"),
    (".toml", "toml"),
    (".ini", "ini"),
    (".json", "json"),
    (".yml", "yaml"),
    (".yaml", "yaml"),
    (".js", "javascript"),
    (".mjs", "javascript"),
    (".cjs", "javascript"),
    (".ts", "ts"),
    (".tsx", "tsx"),
    (".jsx", "jsx"),
    (".html", "html"),
    (".htm", "html"),
    (".css", "css"),
    (".scss", "scss"),
    (".less", "less"),
    (".md", "md"),
    (".txt", "text"),
    (".csv", "csv"),
    (".xml", "xml"),
    (".java", "java"),
    (".kt", "kotlin"),
    (".kts", "kotlin"),
    (".scala", "scala"),
    (".go", "go"),
    (".rs", "rust"),
    (".c", "c"),
    (".h", "c"),
    (".cpp", "cpp"),
    (".hpp", "cpp"),
    (".sql", "sql"),
    (".sh", "bash"),
    (".bash", "bash"),
    (".zsh", "zsh"),
    (".ps1", "powershell"),
    (".bat", "bat"),
    (".env", "bash"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(12), "12 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(normalize_newlines("\r\r\n"), "\n\n");
        assert_eq!(normalize_newlines("plain"), "plain");
    }

    #[cfg(unix)]
    #[test]
    fn test_absolutize_is_lexical() {
        assert_eq!(absolutize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(absolutize(Path::new("/..")), PathBuf::from("/"));
        assert!(absolutize(Path::new("rel/x")).is_absolute());
    }

    #[test]
    fn test_every_default_language_is_lowercase() {
        for (ext, lang) in DEFAULT_LANGUAGES {
            assert!(ext.starts_with('.'));
            assert_eq!(*ext, ext.to_lowercase());
            assert!(!lang.is_empty());
        }
    }
}
