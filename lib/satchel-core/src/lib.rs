//! Core types for satchel request-body encoding.
//!
//! This crate provides the data side of body encoding, with no environment
//! or process access:
//! - [`Value`], [`Params`] and [`Scalar`] - nested parameter trees
//! - [`FileLike`] and [`FileValue`] - file capability and provided sources
//! - [`normalize_keys`] and [`to_query_string`] - bracket-notation flattening
//! - [`Form`] and [`Part`] - multipart framing
//! - [`ContentType`] - body MIME types
//! - [`Error`] and [`Result`] - error handling

mod content_type;
mod error;
mod file;
mod flatten;
mod multipart;
pub mod prelude;
mod value;

pub use content_type::ContentType;
pub use error::{Error, Result};
pub use file::{FileLike, FileValue, LocalFile, MemoryFile, ReaderFile};
pub use flatten::{
    DEFAULT_MAX_DEPTH, Leaf, flatten_params, normalize_keys, normalize_keys_with_depth,
    to_query_string, to_query_string_with_depth,
};
pub use multipart::{BOUNDARY_PREFIX, Form, Part, generate_boundary};
pub use value::{Params, Scalar, Value};
