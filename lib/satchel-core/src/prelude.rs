//! Prelude module for convenient imports.
//!
//! ```ignore
//! use satchel_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Error, FileLike, FileValue, Form, Params, Part, Result, Scalar, Value,
    normalize_keys, to_query_string,
};
