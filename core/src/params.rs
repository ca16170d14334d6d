//! Parameter sets and their query-string encoding.
//!
//! # Design
//! Optional arguments are modelled as `Option<ParamValue>` per key, so an
//! omitted argument is simply an absent entry. `encode_query` is the single
//! place that drops absent entries; nothing else filters parameters.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in encoded text values. Everything outside the
/// RFC 3986 unreserved set is escaped, including `&`, `=` and `+`, so a value
/// can never split into a second query pair.
const VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

/// Conversion into an optional parameter value. `None` means "absent".
pub trait IntoParam {
    fn into_param(self) -> Option<ParamValue>;
}

impl IntoParam for ParamValue {
    fn into_param(self) -> Option<ParamValue> {
        Some(self)
    }
}

impl IntoParam for &str {
    fn into_param(self) -> Option<ParamValue> {
        Some(ParamValue::Text(self.to_string()))
    }
}

impl IntoParam for String {
    fn into_param(self) -> Option<ParamValue> {
        Some(ParamValue::Text(self))
    }
}

impl IntoParam for &String {
    fn into_param(self) -> Option<ParamValue> {
        Some(ParamValue::Text(self.clone()))
    }
}

impl IntoParam for bool {
    fn into_param(self) -> Option<ParamValue> {
        Some(ParamValue::Bool(self))
    }
}

impl IntoParam for i64 {
    fn into_param(self) -> Option<ParamValue> {
        Some(ParamValue::Int(self))
    }
}

impl IntoParam for u32 {
    fn into_param(self) -> Option<ParamValue> {
        Some(ParamValue::Int(i64::from(self)))
    }
}

impl<T: IntoParam> IntoParam for Option<T> {
    fn into_param(self) -> Option<ParamValue> {
        self.and_then(IntoParam::into_param)
    }
}

/// Ordered mapping from parameter name to an optional value.
///
/// Keys are unique: setting a key twice replaces the earlier value in place
/// and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Option<ParamValue>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn with(mut self, key: &str, value: impl IntoParam) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl IntoParam) {
        let value = value.into_param();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Iterate over present entries only.
    pub fn present(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// True when no entry carries a value.
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

/// Encode the present entries of `params` as `&key=value` pairs.
///
/// Keys and text are percent-encoded; integers and booleans are written
/// literally.
pub fn encode_query(params: &Params) -> String {
    let mut out = String::new();
    for (key, value) in params.present() {
        out.push('&');
        out.extend(utf8_percent_encode(key, VALUE));
        out.push('=');
        match value {
            ParamValue::Text(text) => out.extend(utf8_percent_encode(text, VALUE)),
            ParamValue::Int(n) => out.push_str(&n.to_string()),
            ParamValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        }
    }
    out
}

/// Percent-encode a single text value with the same character set as
/// `encode_query`.
pub(crate) fn encode_value(text: &str) -> String {
    utf8_percent_encode(text, VALUE).to_string()
}

/// Apply the message-format escaping the platform expects for user text.
///
/// `&` is replaced first so the entities produced for `<` and `>` are not
/// escaped twice.
pub fn escape_message_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
