//! `g:Date` and `g:Timestamp`, both carried as milliseconds since the Unix epoch.

use crate::engine::Engine;
use crate::plugin::{Encoded, TagDecoder, TagEncoder};
use crate::wire::Token;
use crate::{Error, Result, Value};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePlugin {
    tag: &'static str,
}

impl DatePlugin {
    #[must_use]
    pub const fn new(tag: &'static str) -> Self {
        DatePlugin { tag }
    }
}

impl TagDecoder for DatePlugin {
    fn decode_tag(&self, payload: &Token, _: &Engine) -> Result<Value> {
        payload
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(Value::Date)
            .ok_or_else(|| {
                Error::malformed(format!("{} payload {} is not epoch millis", self.tag, payload))
            })
    }
}

impl TagEncoder for DatePlugin {
    fn tag(&self) -> &str {
        self.tag
    }

    fn encode_tag(&self, value: &Value, _: &Engine) -> Result<Encoded> {
        match value {
            Value::Date(dt) => Ok(Encoded::Payload(Token::from(dt.timestamp_millis()))),
            other => Err(Error::unsupported_type(&format!(
                "{} cannot encode {}",
                self.tag,
                other.kind()
            ))),
        }
    }
}
