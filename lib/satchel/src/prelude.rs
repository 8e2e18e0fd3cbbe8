//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for easy glob
//! importing:
//!
//! ```ignore
//! use satchel::prelude::*;
//! ```

pub use crate::detect::{DetectorChain, TypeDetector};
pub use crate::{
    Body, ContentType, EncodedBody, EncoderConfig, Error, FileLike, FileValue, Params, Result,
    Scalar, Value,
};
