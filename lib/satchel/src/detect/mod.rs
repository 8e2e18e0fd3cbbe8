//! MIME type detection for file parts.
//!
//! Detectors are tried in order; the first one that recognises the file
//! wins. When none does, the part is labelled `application/octet-stream`.
//!
//! # Example
//!
//! ```
//! use satchel::detect::{DetectorChain, ExtensionGuesser, MagicSniffer};
//! use std::path::Path;
//!
//! let chain = DetectorChain::empty()
//!     .with(MagicSniffer)
//!     .with(ExtensionGuesser);
//!
//! assert_eq!(chain.detect(Path::new("a.bin"), b"%PDF-1.7"), "application/pdf");
//! assert_eq!(chain.detect(Path::new("notes.csv"), b"a,b"), "text/csv");
//! assert_eq!(chain.detect(Path::new("blob"), b"??"), "application/octet-stream");
//! ```

mod command;
mod extension;
mod magic;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use satchel_core::ContentType;
use tracing::trace;

pub use command::FileCommand;
pub use extension::ExtensionGuesser;
pub use magic::MagicSniffer;

/// Strategy that tries to name the MIME type of a file.
pub trait TypeDetector: fmt::Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// MIME type of the file, or `None` if this strategy cannot tell.
    ///
    /// `contents` is the complete file, read from the start.
    fn detect(&self, path: &Path, contents: &[u8]) -> Option<String>;
}

/// Ordered fallback chain of detectors.
#[derive(Debug, Clone)]
pub struct DetectorChain {
    detectors: Vec<Arc<dyn TypeDetector>>,
}

impl Default for DetectorChain {
    /// Magic-byte sniffing, then the `file` utility.
    fn default() -> Self {
        Self::empty().with(MagicSniffer).with(FileCommand::new())
    }
}

impl DetectorChain {
    /// A chain with no detectors; everything is `application/octet-stream`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Append a detector to the end of the chain.
    #[must_use]
    pub fn with(mut self, detector: impl TypeDetector + 'static) -> Self {
        self.detectors.push(Arc::new(detector));
        self
    }

    /// Names of the detectors, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|detector| detector.name()).collect()
    }

    /// Run the chain. Never fails.
    #[must_use]
    pub fn detect(&self, path: &Path, contents: &[u8]) -> String {
        for detector in &self.detectors {
            if let Some(mime) = detector.detect(path, contents) {
                trace!(detector = detector.name(), path = %path.display(), %mime, "content type detected");
                return mime;
            }
            trace!(detector = detector.name(), path = %path.display(), "no match");
        }
        ContentType::OctetStream.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(&'static str, Option<&'static str>);

    impl TypeDetector for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn detect(&self, _path: &Path, _contents: &[u8]) -> Option<String> {
            self.1.map(str::to_string)
        }
    }

    #[test]
    fn empty_chain_falls_back_to_octet_stream() {
        let chain = DetectorChain::empty();
        assert_eq!(
            chain.detect(Path::new("x"), b"anything"),
            "application/octet-stream"
        );
    }

    #[test]
    fn first_match_wins() {
        let chain = DetectorChain::empty()
            .with(Fixed("none", None))
            .with(Fixed("first", Some("text/first")))
            .with(Fixed("second", Some("text/second")));
        assert_eq!(chain.detect(Path::new("x"), b""), "text/first");
    }

    #[test]
    fn default_chain_order() {
        assert_eq!(DetectorChain::default().names(), ["magic", "file-command"]);
    }
}
