//! Multipart form-data framing.
//!
//! A [`Form`] is an ordered list of [`Part`]s separated by a boundary token.
//! Framing follows RFC 7578:
//!
//! ```text
//! --{boundary}\r\n
//! Content-Disposition: form-data; name="{name}"[; filename="{filename}"]\r\n
//! [Content-Type: {type}\r\n]
//! \r\n
//! {data}\r\n
//! ...
//! --{boundary}--\r\n
//! ```
//!
//! # Example
//!
//! ```
//! use satchel_core::{Form, Part};
//!
//! let form = Form::with_boundary("xyz")
//!     .part(Part::new("name", "John Doe"))
//!     .part(Part::file("avatar", "photo.jpg", "image/jpeg", vec![0xFF, 0xD8]));
//!
//! let body = form.encode();
//! assert!(body.starts_with(b"--xyz\r\n"));
//! assert!(body.ends_with(b"--xyz--\r\n"));
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::ContentType;

/// Prefix of every generated boundary.
pub const BOUNDARY_PREFIX: &str = "------SatchelBoundary";

/// A single part in a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl Part {
    /// Create a plain field part. No `Content-Type` header is emitted.
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Create a file part.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
            data: data.into(),
        }
    }

    /// Get the part name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the filename, if set.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Get the content type, if set.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Get the part data.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    fn encode_into(&self, boundary: &str, buf: &mut BytesMut) {
        buf.put_slice(b"--");
        buf.put_slice(boundary.as_bytes());
        buf.put_slice(b"\r\n");

        buf.put_slice(b"Content-Disposition: form-data; name=\"");
        put_quoted(buf, &self.name);
        buf.put_slice(b"\"");
        if let Some(filename) = &self.filename {
            buf.put_slice(b"; filename=\"");
            put_quoted(buf, filename);
            buf.put_slice(b"\"");
        }
        buf.put_slice(b"\r\n");

        if let Some(content_type) = &self.content_type {
            buf.put_slice(b"Content-Type: ");
            buf.put_slice(content_type.as_bytes());
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"\r\n");
        buf.put_slice(&self.data);
        buf.put_slice(b"\r\n");
    }
}

/// Write a header parameter value, escaping characters that would end it.
fn put_quoted(buf: &mut BytesMut, value: &str) {
    for byte in value.bytes() {
        match byte {
            b'"' => buf.put_slice(b"%22"),
            b'\r' => buf.put_slice(b"%0D"),
            b'\n' => buf.put_slice(b"%0A"),
            other => buf.put_u8(other),
        }
    }
}

/// A multipart form containing multiple parts.
#[derive(Debug, Clone)]
pub struct Form {
    parts: Vec<Part>,
    boundary: String,
}

impl Form {
    /// Create a new form with a given boundary.
    ///
    /// The boundary should be a unique string that doesn't appear in any part data.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            boundary: boundary.into(),
        }
    }

    /// Add a part to the form.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.push(part);
        self
    }

    /// Append a part in place.
    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Get the boundary string.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Get the parts in this form.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Get the Content-Type header value for this form.
    ///
    /// Returns `multipart/form-data; boundary=<boundary>`.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("{}; boundary={}", ContentType::FormData, self.boundary)
    }

    /// Encode the form into bytes, parts in insertion order.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let capacity = self
            .parts
            .iter()
            .map(|part| part.data.len() + part.name.len() + self.boundary.len() + 96)
            .sum::<usize>()
            + self.boundary.len()
            + 8;
        let mut buf = BytesMut::with_capacity(capacity);

        for part in &self.parts {
            part.encode_into(&self.boundary, &mut buf);
        }

        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");

        buf.freeze()
    }
}

/// Generate a random boundary string.
///
/// 128 random bits rendered as hex after [`BOUNDARY_PREFIX`].
#[must_use]
pub fn generate_boundary() -> String {
    format!(
        "{BOUNDARY_PREFIX}{:016x}{:016x}",
        rand::random::<u64>(),
        rand::random::<u64>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(form: &Form) -> String {
        String::from_utf8(form.encode().to_vec()).expect("utf8")
    }

    #[test]
    fn plain_part_has_no_content_type() {
        let part = Part::new("field", "value");
        assert_eq!(part.name(), "field");
        assert_eq!(part.data().as_ref(), b"value");
        assert!(part.content_type().is_none());
        assert!(part.filename().is_none());
    }

    #[test]
    fn part_file() {
        let part = Part::file("upload", "photo.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(part.name(), "upload");
        assert_eq!(part.filename(), Some("photo.jpg"));
        assert_eq!(part.content_type(), Some("image/jpeg"));
    }

    #[test]
    fn generated_boundaries_differ() {
        let a = generate_boundary();
        let b = generate_boundary();
        assert!(a.starts_with(BOUNDARY_PREFIX));
        assert_eq!(a.len(), BOUNDARY_PREFIX.len() + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn form_content_type() {
        let form = Form::with_boundary("test-boundary");
        assert_eq!(
            form.content_type(),
            "multipart/form-data; boundary=test-boundary"
        );
    }

    #[test]
    fn empty_form_is_only_the_closing_delimiter() {
        let form = Form::with_boundary("b");
        assert_eq!(encoded(&form), "--b--\r\n");
    }

    #[test]
    fn form_encode_exact() {
        let form = Form::with_boundary("boundary123")
            .part(Part::new("field", "value"))
            .part(Part::file("upload", "test.txt", "text/plain", "file content"));

        assert_eq!(
            encoded(&form),
            "--boundary123\r\n\
             Content-Disposition: form-data; name=\"field\"\r\n\
             \r\n\
             value\r\n\
             --boundary123\r\n\
             Content-Disposition: form-data; name=\"upload\"; filename=\"test.txt\"\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             file content\r\n\
             --boundary123--\r\n"
        );
    }

    #[test]
    fn header_values_are_escaped() {
        let form = Form::with_boundary("b").part(Part::file(
            "evil\"\r\nX-Injected: 1",
            "a\"b.txt",
            "text/plain",
            "v",
        ));
        let body = encoded(&form);
        assert!(body.contains("name=\"evil%22%0D%0AX-Injected: 1\"; filename=\"a%22b.txt\""));
        assert!(!body.contains("\r\nX-Injected"));
    }

    #[test]
    fn binary_data_is_copied_verbatim() {
        let form = Form::with_boundary("b").part(Part::new("bin", vec![0u8, 159, 146, 150]));
        let body = form.encode();
        let needle: &[u8] = &[b'\r', b'\n', 0, 159, 146, 150, b'\r', b'\n'];
        assert!(body.windows(needle.len()).any(|window| window == needle));
    }
}
