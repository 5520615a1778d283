/*!
 * Artifact rendering and output sinks for pastepack
 */

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::error::{Result, ResultExt};
use crate::types::RenderedFileBlock;

/// Separator line written around every file block
pub const SEPARATOR: &str =
    "==============================================================================";

/// Render a timestamp as ISO-8601 UTC (`2024-05-01T12:00:00+00:00`), with a
/// microsecond fraction only when it is non-zero. Sub-microsecond precision
/// is rounded to the nearest microsecond.
pub fn format_iso_utc(time: DateTime<Utc>) -> String {
    let time = time + chrono::Duration::nanoseconds(500);
    let micros = time.timestamp_subsec_micros();
    if micros == 0 {
        time.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
    } else {
        format!("{}.{:06}+00:00", time.format("%Y-%m-%dT%H:%M:%S"), micros)
    }
}

/// [`format_iso_utc`] for a filesystem timestamp
pub fn format_system_time(time: SystemTime) -> String {
    format_iso_utc(DateTime::<Utc>::from(time))
}

/// Render the summary block that opens the artifact
pub fn render_preamble(
    generated_at: DateTime<Utc>,
    roots: &[PathBuf],
    file_count: usize,
    total_bytes: u64,
) -> String {
    let roots = roots
        .iter()
        .map(|r| r.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "PASTE‑PACK BUNDLE — multi‑file paste for ChatGPT\n\
         Generated: {}\n\
         Paths: {}\n\
         Files included: {}; Total bytes: {}\n\
         Notes: Each file starts with a <<<FILE ...>>> header and ends with <<<END FILE>>>.\n\
         Please treat each file separately when reviewing.\n",
        format_iso_utc(generated_at),
        roots,
        file_count,
        total_bytes
    )
}

impl RenderedFileBlock {
    /// The single `<<<FILE ...>>>` metadata line, without newline
    pub fn header(&self) -> String {
        format!(
            "<<<FILE path=\"{}\" abspath=\"{}\" size={} mtime=\"{}\" sha256=\"{}\" lang=\"{}\">>>",
            self.path, self.absolute_path, self.size, self.mtime, self.sha256, self.lang
        )
    }
}

impl fmt::Display for RenderedFileBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f, "{}", self.header())?;
        writeln!(f, "```{}", self.lang)?;
        f.write_str(&self.body)?;
        if !self.body.ends_with('\n') {
            f.write_str("\n")?;
        }
        writeln!(f, "```")?;
        writeln!(f, "<<<END FILE>>>")?;
        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f)
    }
}

/// A destination for the finished artifact
pub trait OutputSink {
    /// Short human-readable name, e.g. the file path
    fn describe(&self) -> String;

    /// Hand over the artifact text
    fn deliver(&self, text: &str) -> Result<()>;
}

/// Writes the artifact to a file, replacing any previous content
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Create a new file sink
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for FileSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn deliver(&self, text: &str) -> Result<()> {
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write to {}", self.path.display()))
    }
}

/// Prints the artifact on standard output
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn describe(&self) -> String {
        "stdout".to_string()
    }

    fn deliver(&self, text: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(text.as_bytes())?;
        lock.write_all(b"\n")?;
        lock.flush()?;
        Ok(())
    }
}
