//! Flattening nested parameters into bracket-notation key/value pairs.
//!
//! `{"user": {"name": "a", "tags": ["x", "y"]}}` flattens to
//! `user[name]=a`, `user[tags][]=x`, `user[tags][]=y`, in insertion order,
//! depth first.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::{Error, FileValue, Params, Result, Scalar, Value};

/// Default bound on how deeply parameters may nest.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Characters escaped in query keys and values: everything but unreserved.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Stand-in value for the `key[]` pair an empty list produces.
static EMPTY: Scalar = Scalar::Null;

/// A leaf of a flattened parameter tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leaf<'a> {
    /// A scalar, sent as its string form.
    Scalar(&'a Scalar),
    /// A file, sent as its contents.
    File(&'a FileValue),
}

/// Flatten one entry of a parameter map.
///
/// Lists produce `key[]` entries (an empty list yields a single `key[]` with
/// an empty value), maps produce `key[child]` entries and leaves produce a
/// single pair.
///
/// # Example
///
/// ```
/// use satchel_core::{Params, Value, normalize_keys};
///
/// let value = Value::from(Params::new().with("c", 2).with("d", vec![3, 4]));
/// let pairs = normalize_keys("b", &value).expect("flatten");
/// let keys: Vec<_> = pairs.iter().map(|(key, _)| key.as_str()).collect();
/// assert_eq!(keys, ["b[c]", "b[d][]", "b[d][]"]);
/// ```
pub fn normalize_keys<'a>(key: &str, value: &'a Value) -> Result<Vec<(String, Leaf<'a>)>> {
    normalize_keys_with_depth(key, value, DEFAULT_MAX_DEPTH)
}

/// [`normalize_keys`] with an explicit nesting bound.
pub fn normalize_keys_with_depth<'a>(
    key: &str,
    value: &'a Value,
    max_depth: usize,
) -> Result<Vec<(String, Leaf<'a>)>> {
    let mut pairs = Vec::new();
    walk(key.to_string(), value, 1, max_depth, raw_segment, &mut pairs)?;
    Ok(pairs)
}

/// Flatten a whole parameter map, entry by entry.
pub fn flatten_params(params: &Params, max_depth: usize) -> Result<Vec<(String, Leaf<'_>)>> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        walk(key.clone(), value, 1, max_depth, raw_segment, &mut pairs)?;
    }
    Ok(pairs)
}

/// Encode a parameter map as a URL query string.
///
/// Key segments and values are percent-encoded; nesting brackets are kept
/// literal.
///
/// # Example
///
/// ```
/// use satchel_core::{Params, to_query_string};
///
/// let params = Params::new().with("a", 1).with("b", Params::new().with("c", 2));
/// assert_eq!(to_query_string(&params).expect("query"), "a=1&b[c]=2");
/// ```
pub fn to_query_string(params: &Params) -> Result<String> {
    to_query_string_with_depth(params, DEFAULT_MAX_DEPTH)
}

/// [`to_query_string`] with an explicit nesting bound.
pub fn to_query_string_with_depth(params: &Params, max_depth: usize) -> Result<String> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        walk(
            encode_segment(key).into_owned(),
            value,
            1,
            max_depth,
            encode_segment,
            &mut pairs,
        )?;
    }

    let query = pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={}", encode_segment(&query_value(value))))
        .collect::<Vec<_>>()
        .join("&");
    Ok(query)
}

fn walk<'a>(
    prefix: String,
    value: &'a Value,
    depth: usize,
    max_depth: usize,
    segment: fn(&str) -> Cow<'_, str>,
    out: &mut Vec<(String, Leaf<'a>)>,
) -> Result<()> {
    match value {
        Value::List(items) => {
            if depth >= max_depth {
                return Err(Error::DepthExceeded { max: max_depth });
            }
            let key = format!("{prefix}[]");
            if items.is_empty() {
                out.push((key, Leaf::Scalar(&EMPTY)));
                return Ok(());
            }
            for item in items {
                walk(key.clone(), item, depth + 1, max_depth, segment, out)?;
            }
        }
        Value::Map(params) => {
            if depth >= max_depth {
                return Err(Error::DepthExceeded { max: max_depth });
            }
            for (child, item) in params {
                let key = format!("{prefix}[{}]", segment(child));
                walk(key, item, depth + 1, max_depth, segment, out)?;
            }
        }
        Value::Scalar(scalar) => out.push((prefix, Leaf::Scalar(scalar))),
        Value::File(file) => out.push((prefix, Leaf::File(file))),
    }
    Ok(())
}

fn raw_segment(segment: &str) -> Cow<'_, str> {
    Cow::Borrowed(segment)
}

fn encode_segment(segment: &str) -> Cow<'_, str> {
    utf8_percent_encode(segment, QUERY_ENCODE_SET).into()
}

fn query_value(leaf: Leaf<'_>) -> String {
    match leaf {
        Leaf::Scalar(scalar) => scalar.to_string(),
        Leaf::File(file) => file.file_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(pairs: &[(String, Leaf<'_>)]) -> Vec<String> {
        pairs.iter().map(|(key, _)| key.clone()).collect()
    }

    #[test]
    fn scalar_is_a_single_pair() {
        let scalar = Scalar::Text("v".to_string());
        let value = Value::Scalar(scalar.clone());
        let pairs = normalize_keys("a", &value).expect("flatten");
        assert_eq!(keys(&pairs), ["a"]);
        assert_eq!(pairs.first().map(|(_, leaf)| *leaf), Some(Leaf::Scalar(&scalar)));
    }

    #[test]
    fn nested_maps_and_lists_use_brackets() {
        let value = Value::from(
            Params::new()
                .with("b", Params::new().with("c", 1))
                .with("list", vec!["x", "y"]),
        );
        let pairs = normalize_keys("a", &value).expect("flatten");
        assert_eq!(keys(&pairs), ["a[b][c]", "a[list][]", "a[list][]"]);
    }

    #[test]
    fn list_of_maps() {
        let value = Value::from(vec![
            Params::new().with("id", 1),
            Params::new().with("id", 2),
        ]);
        let pairs = normalize_keys("items", &value).expect("flatten");
        assert_eq!(keys(&pairs), ["items[][id]", "items[][id]"]);
    }

    #[test]
    fn empty_list_yields_empty_value() {
        let value = Value::List(Vec::new());
        let pairs = normalize_keys("tags", &value).expect("flatten");
        assert_eq!(keys(&pairs), ["tags[]"]);
        assert_eq!(pairs.first().map(|(_, leaf)| *leaf), Some(Leaf::Scalar(&Scalar::Null)));
    }

    #[test]
    fn empty_list_inside_map_keeps_its_siblings() {
        let params = Params::new()
            .with("form", Params::new().with("tags", Value::List(Vec::new())).with("name", "x"))
            .with("after", 1);
        let pairs = flatten_params(&params, DEFAULT_MAX_DEPTH).expect("flatten");
        assert_eq!(keys(&pairs), ["form[tags][]", "form[name]", "after"]);
    }

    #[test]
    fn empty_map_yields_nothing() {
        let value = Value::from(Params::new());
        assert!(normalize_keys("a", &value).expect("flatten").is_empty());
    }

    #[test]
    fn flatten_params_keeps_depth_first_order() {
        let params = Params::new()
            .with("first", Params::new().with("x", 1).with("y", Params::new().with("z", 2)))
            .with("second", 3);
        let pairs = flatten_params(&params, DEFAULT_MAX_DEPTH).expect("flatten");
        assert_eq!(keys(&pairs), ["first[x]", "first[y][z]", "second"]);
    }

    #[test]
    fn query_string_simple() {
        let params = Params::new().with("a", 1).with("b", Params::new().with("c", 2));
        assert_eq!(to_query_string(&params).expect("query"), "a=1&b[c]=2");
    }

    #[test]
    fn query_string_escapes_segments_and_values() {
        let params = Params::new()
            .with("full name", "Jane Doe & co")
            .with("filter", Params::new().with("a=b", "c/d"));
        assert_eq!(
            to_query_string(&params).expect("query"),
            "full%20name=Jane%20Doe%20%26%20co&filter[a%3Db]=c%2Fd"
        );
    }

    #[test]
    fn query_string_lists_and_nulls() {
        let params = Params::new()
            .with("tags", vec!["a", "b"])
            .with("none", Value::Scalar(Scalar::Null))
            .with("empty", Value::List(Vec::new()));
        assert_eq!(
            to_query_string(&params).expect("query"),
            "tags[]=a&tags[]=b&none=&empty[]="
        );
    }

    #[test]
    fn query_string_renders_files_by_name() {
        let params = Params::new().with("doc", FileValue::memory("/tmp/report.pdf", "%PDF"));
        assert_eq!(to_query_string(&params).expect("query"), "doc=report.pdf");
    }

    #[test]
    fn query_string_empty_params() {
        assert_eq!(to_query_string(&Params::new()).expect("query"), "");
    }

    #[test]
    fn depth_bound_is_enforced() {
        let mut value = Value::from("leaf");
        for _ in 0..10 {
            value = Params::new().with("k", value).into();
        }

        let err = normalize_keys_with_depth("root", &value, 4).expect_err("too deep");
        assert!(matches!(err, Error::DepthExceeded { max: 4 }));

        assert!(normalize_keys_with_depth("root", &value, 11).is_ok());
    }
}
