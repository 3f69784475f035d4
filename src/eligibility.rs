//! Whether a message has already been scored by SpamAssassin

use std::path::Path;
use tracing::warn;

/// Header prefix SpamAssassin adds to every message it scans
pub const SPAM_STATUS_MARKER: &str = "X-Spam-Status: ";

/// True when the message at `path` carries the spam status marker.
///
/// Messages SpamAssassin skipped (too large, locally generated) are not worth
/// learning from. Unreadable files are never eligible.
#[must_use]
pub fn is_eligible(path: &Path) -> bool {
    match std::fs::read(path) {
        Ok(raw) => contains_spam_status(&String::from_utf8_lossy(&raw)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Error reading message");
            false
        }
    }
}

/// Line membership test for [`SPAM_STATUS_MARKER`]
#[must_use]
pub fn contains_spam_status(text: &str) -> bool {
    text.lines().any(|line| line.contains(SPAM_STATUS_MARKER))
}
