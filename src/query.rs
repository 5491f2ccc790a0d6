//! Query parameter values and query-string construction.
//!
//! The daemon's endpoints take heterogeneous parameter maps: scalars,
//! booleans, repeated array parameters, and absent (`null`) entries.
//! [`ParamValue`] makes that shape explicit and [`build_query`] turns a
//! [`Params`] map into the daemon's query-string dialect:
//!
//! - array-valued keys are emitted as repeated `key=value` pairs, grouped
//!   in key-encounter order, ahead of the scalar block;
//! - booleans render as the literals `true`/`false`;
//! - `Null` entries are omitted;
//! - scalar keys and values are percent-encoded, array element values pass
//!   through formatted but unescaped (daemon arguments are CIDs and
//!   flag-like tokens).
//!
//! # Example
//!
//! ```
//! use casd_client::{Params, build_query};
//!
//! let params = Params::new()
//!     .with("arg", vec!["QmA", "QmB"])
//!     .with("recursive", true);
//!
//! assert_eq!(
//!     build_query("pin/add", &params),
//!     "pin/add?arg=QmA&arg=QmB&recursive=true"
//! );
//! ```

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped in the scalar query block: everything but RFC 3986
/// unreserved.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A single query parameter value.
///
/// One variant per shape a daemon parameter can take, so the partition
/// into array and scalar blocks is exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Absent value, always omitted from the query string.
    Null,
    /// Boolean, rendered as `true`/`false`.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point number.
    Float(f64),
    /// String value.
    Str(String),
    /// Repeated parameter, emitted as one `key=value` pair per element.
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Format a scalar for the wire.
    ///
    /// Returns `None` for `Null` and `List`, which have no scalar rendering.
    #[must_use]
    pub fn format(&self) -> Option<String> {
        match self {
            Self::Null | Self::List(_) => None,
            Self::Bool(value) => Some(if *value { "true" } else { "false" }.to_owned()),
            Self::Int(value) => Some(value.to_string()),
            Self::Uint(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Str(value) => Some(value.clone()),
        }
    }

    /// Returns `true` for [`ParamValue::List`].
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Uint(u64::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// An ordered parameter map.
///
/// Keys keep their first-encounter position; setting an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Create an empty parameter map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a parameter, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a parameter, replacing any existing value under the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Get a parameter value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Build the request path with an encoded query string appended.
///
/// Array-valued keys come first as repeated `key=value` groups in
/// key-encounter order, followed by the percent-encoded scalar block.
/// `Null` entries vanish. Empty `params` leaves `path` unchanged.
#[must_use]
pub fn build_query(path: &str, params: &Params) -> String {
    if params.is_empty() {
        return path.to_owned();
    }

    let mut query = String::new();

    for (key, value) in params.iter() {
        if let ParamValue::List(items) = value {
            let group = items
                .iter()
                .filter_map(ParamValue::format)
                .map(|item| format!("{key}={item}"))
                .collect::<Vec<_>>()
                .join("&");
            if !group.is_empty() {
                query.push_str(&group);
                query.push('&');
            }
        }
    }

    let scalars = params
        .iter()
        .filter(|(_, value)| !value.is_list())
        .filter_map(|(key, value)| {
            let formatted = value.format()?;
            Some(format!("{}={}", escape(key), escape(&formatted)))
        })
        .collect::<Vec<_>>()
        .join("&");
    query.push_str(&scalars);

    let query = query.trim_end_matches('&');
    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}

fn escape(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_ESCAPE).to_string()
}
