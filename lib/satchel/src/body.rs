//! Request body encoding.
//!
//! A [`Body`] takes a parameter tree and decides how it goes on the wire:
//!
//! - a map containing a file anywhere becomes `multipart/form-data`;
//! - any other map becomes a URL-encoded query string;
//! - anything that is not a map is passed through untouched.
//!
//! # Example
//!
//! ```
//! use satchel::{Body, EncodedBody, FileValue, Params};
//!
//! let body = Body::new(Params::new().with("a", 1).with("b", Params::new().with("c", 2)));
//! assert!(matches!(body.encode().expect("encode"), EncodedBody::Query(q) if q == "a=1&b[c]=2"));
//!
//! let upload = Body::new(Params::new().with("doc", FileValue::memory("doc.pdf", "%PDF-1.7")));
//! assert!(upload.is_multipart().expect("scan"));
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use satchel_core::{
    ContentType, Error, Form, Leaf, Params, Part, Result, Value, flatten_params,
    generate_boundary, to_query_string_with_depth,
};
use tracing::debug;

use crate::EncoderConfig;

/// Custom conversion of a parameter map into a query string.
///
/// Implemented for every `Fn(&Params) -> String + Send + Sync`.
pub trait QueryNormalizer: Send + Sync {
    /// Encode `params` as a query string.
    fn normalize(&self, params: &Params) -> String;
}

impl<F> QueryNormalizer for F
where
    F: Fn(&Params) -> String + Send + Sync,
{
    fn normalize(&self, params: &Params) -> String {
        self(params)
    }
}

/// Result of encoding a [`Body`].
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedBody {
    /// A non-map value, returned unchanged.
    Raw(Value),
    /// A URL-encoded query string.
    Query(String),
    /// A multipart body framed with the encoder's boundary.
    Multipart(Bytes),
}

impl EncodedBody {
    /// Returns `true` for multipart bodies.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    /// Bytes to put on the wire.
    ///
    /// Raw scalars use their string form (binary scalars are untouched) and
    /// raw files are read in full. Raw lists cannot be sent.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            Self::Multipart(bytes) => Ok(bytes),
            Self::Query(query) => Ok(Bytes::from(query)),
            Self::Raw(Value::Scalar(scalar)) => Ok(scalar.to_bytes()),
            Self::Raw(Value::File(file)) => Ok(file.read_all()?),
            Self::Raw(Value::List(_)) => Err(Error::invalid_body(
                "a list cannot be sent as a raw body",
            )),
            Self::Raw(Value::Map(_)) => Err(Error::invalid_body(
                "a map must be encoded before it is sent",
            )),
        }
    }
}

/// Encoder for one outgoing request body.
///
/// The multipart boundary is generated on first use and then stays fixed
/// for the lifetime of the instance, so the `Content-Type` header and the
/// encoded body must come from the same `Body`.
pub struct Body {
    params: Value,
    normalizer: Option<Arc<dyn QueryNormalizer>>,
    config: EncoderConfig,
    boundary: OnceLock<String>,
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("params", &self.params)
            .field("normalizer", &self.normalizer.is_some())
            .field("config", &self.config)
            .field("boundary", &self.boundary.get())
            .finish()
    }
}

impl Body {
    /// Create an encoder with the default configuration.
    #[must_use]
    pub fn new(params: impl Into<Value>) -> Self {
        Self {
            params: params.into(),
            normalizer: None,
            config: EncoderConfig::default(),
            boundary: OnceLock::new(),
        }
    }

    /// Create an encoder from any serializable value.
    pub fn from_serialize<T: serde::Serialize + ?Sized>(params: &T) -> Result<Self> {
        Value::from_serialize(params).map(Self::new)
    }

    /// Use a custom query normalizer instead of bracket flattening.
    ///
    /// Only consulted when the body is not multipart.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: impl QueryNormalizer + 'static) -> Self {
        self.normalizer = Some(Arc::new(normalizer));
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EncoderConfig) -> Self {
        self.config = config;
        self
    }

    /// The parameters being encoded.
    #[must_use]
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// The multipart boundary of this instance.
    #[must_use]
    pub fn boundary(&self) -> &str {
        self.boundary.get_or_init(generate_boundary)
    }

    /// Returns `true` if the parameters are a map holding a file at any depth.
    ///
    /// Fails only when the tree is nested deeper than the configured bound.
    pub fn is_multipart(&self) -> Result<bool> {
        match &self.params {
            Value::Map(params) => has_file(params, 1, self.config.max_depth),
            _ => Ok(false),
        }
    }

    /// `Content-Type` header value matching [`Body::encode`].
    ///
    /// `None` for pass-through bodies.
    pub fn content_type(&self) -> Result<Option<String>> {
        if !self.params.is_map() {
            return Ok(None);
        }
        let content_type = if self.is_multipart()? {
            Form::with_boundary(self.boundary()).content_type()
        } else {
            ContentType::FormUrlEncoded.to_string()
        };
        Ok(Some(content_type))
    }

    /// Encode the parameters.
    pub fn encode(&self) -> Result<EncodedBody> {
        let Value::Map(params) = &self.params else {
            debug!("parameters are not a map, passing body through");
            return Ok(EncodedBody::Raw(self.params.clone()));
        };

        if has_file(params, 1, self.config.max_depth)? {
            self.generate_multipart(params).map(EncodedBody::Multipart)
        } else {
            self.generate_query(params).map(EncodedBody::Query)
        }
    }

    /// Encode and attach the body to an HTTP request.
    ///
    /// Sets `Content-Type` for multipart and query bodies.
    ///
    /// # Example
    ///
    /// ```
    /// use satchel::{Body, Params};
    ///
    /// let body = Body::new(Params::new().with("q", "rust"));
    /// let request = body
    ///     .build_request(http::Request::post("https://example.com/search"))
    ///     .expect("request");
    ///
    /// assert_eq!(request.headers()["content-type"], "application/x-www-form-urlencoded");
    /// assert_eq!(request.body().as_ref(), b"q=rust");
    /// ```
    pub fn build_request(&self, builder: http::request::Builder) -> Result<http::Request<Bytes>> {
        let encoded = self.encode()?;
        let builder = match &encoded {
            EncodedBody::Multipart(_) => builder.header(
                CONTENT_TYPE,
                Form::with_boundary(self.boundary()).content_type(),
            ),
            EncodedBody::Query(_) => builder.header(CONTENT_TYPE, ContentType::FormUrlEncoded.as_str()),
            EncodedBody::Raw(_) => builder,
        };
        Ok(builder.body(encoded.into_bytes()?)?)
    }

    fn generate_multipart(&self, params: &Params) -> Result<Bytes> {
        let pairs = flatten_params(params, self.config.max_depth)?;
        let mut form = Form::with_boundary(self.boundary());

        for (key, leaf) in pairs {
            let part = match leaf {
                Leaf::File(file) => {
                    let data = file.read_all()?;
                    let content_type = self.config.detectors.detect(file.path(), &data);
                    Part::file(key, file.file_name(), content_type, data)
                }
                Leaf::Scalar(scalar) => Part::new(key, scalar.to_bytes()),
            };
            form.push(part);
        }

        debug!(parts = form.parts().len(), boundary = form.boundary(), "encoded multipart body");
        Ok(form.encode())
    }

    fn generate_query(&self, params: &Params) -> Result<String> {
        let query = match &self.normalizer {
            Some(normalizer) => normalizer.normalize(params),
            None => to_query_string_with_depth(params, self.config.max_depth)?,
        };
        debug!(len = query.len(), custom = self.normalizer.is_some(), "encoded query body");
        Ok(query)
    }
}

/// Depth-first search for a file, stopping at the first one found.
fn has_file(params: &Params, depth: usize, max_depth: usize) -> Result<bool> {
    for (_, value) in params {
        if contains_file(value, depth, max_depth)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn contains_file(value: &Value, depth: usize, max_depth: usize) -> Result<bool> {
    match value {
        Value::File(_) => Ok(true),
        Value::Scalar(_) => Ok(false),
        Value::Map(params) => {
            if depth >= max_depth {
                return Err(Error::DepthExceeded { max: max_depth });
            }
            has_file(params, depth + 1, max_depth)
        }
        Value::List(items) => {
            if depth >= max_depth {
                return Err(Error::DepthExceeded { max: max_depth });
            }
            if items.iter().any(Value::is_file) {
                return Ok(true);
            }
            for item in items {
                if contains_file(item, depth + 1, max_depth)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}
