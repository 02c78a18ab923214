//! GraphSON wire format.
//!
//! This module documents the typed-tag wire format as implemented by this library and provides
//! the tag constants and helpers the engine and plugins share.
//!
//! # Tokens
//!
//! The wire tree is plain JSON, represented by [`serde_json::Value`] and re-exported here as
//! [`Token`]. A token is either **untagged** (a JSON scalar, array, or object without an
//! `@type` key) or **tagged**:
//!
//! ```text
//! {"@type": "g:Int32", "@value": 42}
//! ```
//!
//! **Rules**:
//! - A tagged object has exactly the two keys `@type` and `@value`
//! - `@type` is a string of the form `<namespace>:<key>` (`g:List`, `gx:ByteBuffer`, ...)
//! - `@value` is any token, tagged or not
//! - An object with `@type` but without `@value`, with a non-string `@type`, or with extra keys
//!   is malformed input
//!
//! # Composite Payloads
//!
//! | Tag | Payload | Example |
//! |-----|---------|---------|
//! | `g:List` | array | `[1, 2, 2]` |
//! | `g:Set` | array (duplicates collapse) | `[1, 2]` |
//! | `g:Map` | flattened `k, v, k, v` array | `["a", 1, "b", 2]` |
//! | `g:BulkSet` | flattened `element, count` array | `["x", 2, "y", 1]` |
//!
//! Maps are **not** arrays of pairs: keys may themselves be composite tokens, which is why the
//! flattened form exists. A map or bulk set payload of odd length is malformed.
//!
//! # Scalar Tags
//!
//! | Tag | Payload |
//! |-----|---------|
//! | `g:Int32`, `g:Int64` | JSON integer |
//! | `g:Float`, `g:Double` | JSON number, or `"NaN"`, `"Infinity"`, `"-Infinity"` |
//! | `g:Date`, `g:Timestamp` | milliseconds since the Unix epoch |
//! | `gx:BigInteger` | JSON integer, or a decimal string when it exceeds 64 bits |
//! | `gx:ByteBuffer` | standard base64 string |
//!
//! Untagged JSON integers decode as `Int64`, other untagged numbers as `Double`.

use crate::{Error, Result};

/// One node of the JSON token tree.
pub type Token = serde_json::Value;

pub const TYPE_KEY: &str = "@type";
pub const VALUE_KEY: &str = "@value";

pub const LIST: &str = "g:List";
pub const SET: &str = "g:Set";
pub const MAP: &str = "g:Map";
pub const BULK_SET: &str = "g:BulkSet";

pub const INT32: &str = "g:Int32";
pub const INT64: &str = "g:Int64";
pub const FLOAT: &str = "g:Float";
pub const DOUBLE: &str = "g:Double";
pub const DATE: &str = "g:Date";
pub const TIMESTAMP: &str = "g:Timestamp";
pub const BIG_INTEGER: &str = "gx:BigInteger";
pub const BYTE_BUFFER: &str = "gx:ByteBuffer";

/// Wraps a payload with its tag.
///
/// # Examples
///
/// ```rust
/// use graphson_codec::wire;
/// use serde_json::json;
///
/// let token = wire::tagged("g:Int64", json!(7));
/// assert_eq!(token, json!({"@type": "g:Int64", "@value": 7}));
/// ```
#[must_use]
pub fn tagged(tag: &str, payload: Token) -> Token {
    let mut fields = serde_json::Map::with_capacity(2);
    fields.insert(TYPE_KEY.to_string(), Token::String(tag.to_string()));
    fields.insert(VALUE_KEY.to_string(), payload);
    Token::Object(fields)
}

/// Splits a tagged object into its tag and payload.
///
/// Returns `Ok(None)` for objects without an `@type` key.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] when `@type` is present but the object is not a well-formed
/// tagged object.
pub fn split_tagged(fields: &serde_json::Map<String, Token>) -> Result<Option<(&str, &Token)>> {
    let Some(tag) = fields.get(TYPE_KEY) else {
        return Ok(None);
    };
    let tag = tag
        .as_str()
        .ok_or_else(|| Error::malformed(format!("{} must be a string, found {}", TYPE_KEY, tag)))?;
    let payload = fields
        .get(VALUE_KEY)
        .ok_or_else(|| Error::malformed(format!("{} object is missing {}", tag, VALUE_KEY)))?;
    if fields.len() != 2 {
        return Err(Error::malformed(format!(
            "{} object must contain only {} and {}",
            tag, TYPE_KEY, VALUE_KEY
        )));
    }
    Ok(Some((tag, payload)))
}

/// Returns the tag of a token if it is a tagged object.
///
/// Unlike [`split_tagged`] this never fails; malformed objects simply report no tag.
#[must_use]
pub fn tag_of(token: &Token) -> Option<&str> {
    match token {
        Token::Object(fields) => split_tagged(fields).ok().flatten().map(|(tag, _)| tag),
        _ => None,
    }
}

/// Names a token's shape for error messages: its tag when tagged, its JSON type otherwise.
pub(crate) fn describe(token: &Token) -> &str {
    if let Some(tag) = tag_of(token) {
        return tag;
    }
    match token {
        Token::Null => "null",
        Token::Bool(_) => "boolean",
        Token::Number(_) => "number",
        Token::String(_) => "string",
        Token::Array(_) => "array",
        Token::Object(_) => "object",
    }
}
