//! Encode nested request parameters as HTTP bodies.
//!
//! Hand a [`Body`] a parameter tree and it picks the wire format:
//! `multipart/form-data` when a file is present anywhere in the tree,
//! `application/x-www-form-urlencoded` for other maps, and the value itself
//! for anything that is not a map.
//!
//! # Example
//!
//! ```
//! use satchel::prelude::*;
//!
//! let params = Params::new()
//!     .with("user", Params::new().with("name", "Alice"))
//!     .with("avatar", FileValue::memory("me.png", b"\x89PNG\r\n\x1a\n".to_vec()));
//!
//! let body = Body::new(params);
//! let request = body
//!     .build_request(http::Request::post("https://example.com/profile"))
//!     .expect("request");
//!
//! let content_type = request.headers()["content-type"].to_str().expect("ascii");
//! assert_eq!(content_type, format!("multipart/form-data; boundary={}", body.boundary()));
//! ```
//!
//! File parts are labelled by a [`DetectorChain`](detect::DetectorChain):
//! magic-byte sniffing first, then the `file` utility if it is installed,
//! then `application/octet-stream`.

mod body;
mod config;
pub mod detect;
pub mod prelude;
mod which;

pub use body::{Body, EncodedBody, QueryNormalizer};
pub use config::{EncoderConfig, EncoderConfigBuilder};
pub use which::{which, which_in};

// Re-export core types
pub use satchel_core::{
    ContentType, Error, FileLike, FileValue, Form, Leaf, LocalFile, MemoryFile, Params, Part,
    ReaderFile, Result, Scalar, Value, normalize_keys, to_query_string,
};
