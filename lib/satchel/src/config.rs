//! Encoder configuration types.

use satchel_core::DEFAULT_MAX_DEPTH;

use crate::detect::DetectorChain;

/// Configuration for body encoding.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Maximum nesting depth of the parameter tree.
    pub max_depth: usize,
    /// Detectors used to label file parts.
    pub detectors: DetectorChain,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            detectors: DetectorChain::default(),
        }
    }
}

impl EncoderConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> EncoderConfigBuilder {
        EncoderConfigBuilder::default()
    }
}

/// Builder for [`EncoderConfig`].
#[derive(Debug, Clone, Default)]
pub struct EncoderConfigBuilder {
    max_depth: Option<usize>,
    detectors: Option<DetectorChain>,
}

impl EncoderConfigBuilder {
    /// Set the maximum nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Replace the detector chain.
    #[must_use]
    pub fn detectors(mut self, detectors: DetectorChain) -> Self {
        self.detectors = Some(detectors);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> EncoderConfig {
        EncoderConfig {
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            detectors: self.detectors.unwrap_or_default(),
        }
    }
}
