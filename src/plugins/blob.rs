//! `gx:ByteBuffer`: binary values carried as a standard base64 string.

use crate::engine::Engine;
use crate::plugin::{Encoded, TagDecoder, TagEncoder};
use crate::wire::{self, Token};
use crate::{Error, Result, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

#[derive(Debug, Clone, Copy, Default)]
pub struct ByteBufferPlugin;

impl TagDecoder for ByteBufferPlugin {
    fn decode_tag(&self, payload: &Token, _: &Engine) -> Result<Value> {
        let encoded = payload.as_str().ok_or_else(|| {
            Error::malformed(format!("{} payload must be a string", wire::BYTE_BUFFER))
        })?;
        STANDARD
            .decode(encoded)
            .map(Value::Bytes)
            .map_err(|e| Error::malformed(format!("{} base64 decode failed: {}", wire::BYTE_BUFFER, e)))
    }
}

impl TagEncoder for ByteBufferPlugin {
    fn tag(&self) -> &str {
        wire::BYTE_BUFFER
    }

    fn encode_tag(&self, value: &Value, _: &Engine) -> Result<Encoded> {
        match value {
            Value::Bytes(bytes) => Ok(Encoded::Payload(Token::from(STANDARD.encode(bytes)))),
            other => Err(Error::unsupported_type(&format!(
                "{} cannot encode {}",
                wire::BYTE_BUFFER,
                other.kind()
            ))),
        }
    }
}
