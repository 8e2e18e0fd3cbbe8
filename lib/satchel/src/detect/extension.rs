//! Guessing from the filename extension.

use std::path::Path;

use super::TypeDetector;

/// Looks the filename extension up in the `mime_guess` table.
///
/// Not part of the default chain: it trusts the name rather than the bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionGuesser;

impl ExtensionGuesser {
    /// MIME type for the extension of `path`, if known. Case-insensitive.
    #[must_use]
    pub fn guess(path: &Path) -> Option<&'static str> {
        mime_guess::from_path(path).first_raw()
    }
}

impl TypeDetector for ExtensionGuesser {
    fn name(&self) -> &'static str {
        "extension"
    }

    fn detect(&self, path: &Path, _contents: &[u8]) -> Option<String> {
        Self::guess(path).map(str::to_string)
    }
}
