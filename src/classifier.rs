/*!
 * Text/binary classification
 */

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes sampled from the start of a file by default
pub const DEFAULT_SAMPLE_SIZE: usize = 1024;

/// Decide whether `path` is probably a text file.
///
/// Reads at most `sample_size` bytes from the start of the file. A NUL byte
/// in the sample means binary. Files that cannot be opened or read are
/// reported as not text rather than as an error.
pub fn is_probably_text(path: &Path, sample_size: usize) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::debug!("Cannot open {} for sampling: {}", path.display(), e);
            return false;
        }
    };

    let mut sample = Vec::with_capacity(sample_size);
    if let Err(e) = file.take(sample_size as u64).read_to_end(&mut sample) {
        log::debug!("Cannot read sample from {}: {}", path.display(), e);
        return false;
    }

    let text = looks_like_text(&sample);
    if !text {
        log::debug!("Classified {} as binary", path.display());
    }
    text
}

/// Pure byte test behind [`is_probably_text`]
pub fn looks_like_text(sample: &[u8]) -> bool {
    !sample.contains(&0)
}
