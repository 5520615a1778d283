/*!
 * Extension allow-list filtering
 */

use crate::config::ExtensionSet;
use crate::types::FileCandidate;

/// Keep the candidates whose extension is allowed, preserving order
pub fn filter_by_extension(
    candidates: Vec<FileCandidate>,
    allowed: &ExtensionSet,
) -> Vec<FileCandidate> {
    if *allowed == ExtensionSet::Any {
        return candidates;
    }

    let before = candidates.len();
    let kept: Vec<FileCandidate> = candidates
        .into_iter()
        .filter(|c| allowed.allows(c.extension().as_deref()))
        .collect();
    log::debug!(
        "Extension filter kept {} of {} candidates",
        kept.len(),
        before
    );
    kept
}
