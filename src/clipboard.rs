/*!
 * Clipboard support for pastepack
 *
 * Copies the artifact to the system clipboard by piping it into the first
 * available platform clipboard tool.
 */

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use thiserror::Error;

use crate::writer::OutputSink;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Trait for clipboard operations
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Available clipboard providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipboardProvider {
    /// tmux clipboard
    Tmux,
    /// X11 clipboard with xclip
    Xclip,
    /// X11 clipboard with xsel
    Xsel,
    /// Wayland clipboard
    Wayland,
    /// macOS clipboard
    MacOS,
    /// Native Windows `clip`
    Windows,
    /// Windows clipboard from WSL
    Wsl,
    /// Termux clipboard
    Termux,
}

impl ClipboardProvider {
    /// Command line for this provider
    fn command(&self) -> (&'static str, Vec<&'static str>) {
        match self {
            Self::Tmux => ("tmux", vec!["load-buffer", "-w", "-"]),
            Self::Xclip => ("xclip", vec!["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", vec!["-b", "-i"]),
            Self::Wayland => ("wl-copy", vec![]),
            Self::MacOS => ("pbcopy", vec![]),
            Self::Windows => ("clip", vec![]),
            Self::Wsl => ("clip.exe", vec![]),
            Self::Termux => ("termux-clipboard-set", vec![]),
        }
    }

    /// Bytes to pipe into the command. `clip` reads UTF-16LE.
    fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Windows => encode_utf16le(text),
            _ => text.as_bytes().to_vec(),
        }
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.command();
        execute_clipboard_command(cmd, &args, &self.encode(text))
    }
}

//--------------------------------------------------------------------
// Public API
//--------------------------------------------------------------------

/// Copy text to the clipboard
///
/// Tries each detected clipboard mechanism in order of preference and
/// returns the last failure if none of them accepts the text.
///
/// # Examples
/// ```no_run
/// use pastepack::clipboard::copy_to_clipboard;
///
/// if let Err(e) = copy_to_clipboard("Hello, clipboard!") {
///     eprintln!("Failed to copy to clipboard: {}", e);
/// }
/// ```
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut last_error = ClipboardError::NoClipboardFound;

    for provider in determine_clipboard_providers() {
        match provider.copy_to_clipboard(text) {
            Ok(()) => {
                log::info!("Copied {} bytes with {:?}", text.len(), provider);
                return Ok(());
            }
            Err(e) => {
                log::debug!("Clipboard provider {:?} failed: {}", provider, e);
                last_error = e;
            }
        }
    }

    Err(last_error)
}

/// Check if a command exists on the system
pub fn command_exists(command: &str) -> bool {
    if let Some(paths) = env::var_os("PATH") {
        for dir in env::split_paths(&paths) {
            let p = dir.join(command);
            if p.is_file() {
                return true;
            }
            if cfg!(windows) && p.with_extension("exe").is_file() {
                return true;
            }
        }
    }

    false
}

/// Clipboard as an output sink
pub struct ClipboardSink;

impl OutputSink for ClipboardSink {
    fn describe(&self) -> String {
        "clipboard".to_string()
    }

    fn deliver(&self, text: &str) -> crate::error::Result<()> {
        copy_to_clipboard(text)?;
        Ok(())
    }
}

//--------------------------------------------------------------------
// Internal Implementation
//--------------------------------------------------------------------

/// Pipe `input` into `cmd` and wait for it to finish
fn execute_clipboard_command(cmd: &str, args: &[&str], input: &[u8]) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)))?;

    {
        let stdin = child.stdin.as_mut().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;
        stdin
            .write_all(input)
            .map_err(|e| ClipboardError::CommandFailed(format!("Failed to write to {}: {}", cmd, e)))?;
    }
    // Close stdin so the tool sees EOF
    drop(child.stdin.take());

    let status = child.wait()?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

/// UTF-16LE bytes of `text`, no byte-order mark
fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Platform detection cache (using thread-safe lazy initialization)
static PLATFORM: OnceLock<&'static str> = OnceLock::new();

/// Determine the platform (cached)
fn get_platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                "wsl"
            } else {
                "linux"
            }
        } else if cfg!(target_os = "android") {
            "android"
        } else {
            "unknown"
        }
    })
}

/// Determine which clipboard providers to try based on platform and preference
fn determine_clipboard_providers() -> Vec<ClipboardProvider> {
    let mut providers = Vec::with_capacity(3);

    // Prefer tmux when running inside a session
    if env::var("TMUX").is_ok() && command_exists("tmux") {
        providers.push(ClipboardProvider::Tmux);
    }

    match get_platform() {
        "macos" => {
            if command_exists("pbcopy") {
                providers.push(ClipboardProvider::MacOS);
            }
        }
        "windows" => providers.push(ClipboardProvider::Windows),
        "wsl" => {
            if command_exists("clip.exe") {
                providers.push(ClipboardProvider::Wsl);
            }
        }
        "linux" => {
            if env::var("WAYLAND_DISPLAY").is_ok() && command_exists("wl-copy") {
                providers.push(ClipboardProvider::Wayland);
            }
            if command_exists("xclip") {
                providers.push(ClipboardProvider::Xclip);
            }
            if command_exists("xsel") {
                providers.push(ClipboardProvider::Xsel);
            }
        }
        "android" => {
            if command_exists("termux-clipboard-set") {
                providers.push(ClipboardProvider::Termux);
            }
        }
        _ => {}
    }

    providers
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_command_exists() {
        assert!(command_exists("sh"));
        assert!(!command_exists("nonexistentcommandxyz"));
    }

    #[test]
    fn test_get_platform() {
        let platform = get_platform();
        assert!(["macos", "windows", "wsl", "linux", "android", "unknown"].contains(&platform));
        assert_eq!(platform, get_platform());
    }

    #[test]
    fn test_provider_commands() {
        assert_eq!(
            ClipboardProvider::Xclip.command(),
            ("xclip", vec!["-selection", "clipboard", "-in"])
        );
        assert_eq!(ClipboardProvider::MacOS.command().0, "pbcopy");
        assert!(ClipboardProvider::Wayland.command().1.is_empty());
    }

    #[test]
    fn test_windows_clip_gets_utf16le() {
        assert_eq!(ClipboardProvider::Windows.encode("hé"), vec![b'h', 0, 0xE9, 0]);
        assert_eq!(ClipboardProvider::Xsel.encode("hé"), "hé".as_bytes().to_vec());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_is_reported() {
        let err = execute_clipboard_command("false", &[], b"text").unwrap_err();
        assert!(matches!(err, ClipboardError::CommandFailed(_)));

        let err = execute_clipboard_command("nonexistentcommandxyz", &[], b"text").unwrap_err();
        assert!(err.to_string().contains("Failed to spawn nonexistentcommandxyz"));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_command() {
        assert!(execute_clipboard_command("cat", &[], b"text").is_ok());
    }

    #[test]
    #[ignore] // Requires a running tmux session
    fn test_tmux_clipboard() {
        if env::var("TMUX").is_err() || !command_exists("tmux") {
            return;
        }

        let test_text = "Test text for tmux clipboard";
        ClipboardProvider::Tmux
            .copy_to_clipboard(test_text)
            .expect("Failed to copy to tmux clipboard");

        let output = Command::new("tmux")
            .args(["show-buffer"])
            .output()
            .expect("Failed to execute tmux show-buffer");
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), test_text);
    }
}
