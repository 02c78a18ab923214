//! Numeric scalar tags.
//!
//! Floating point payloads may be the strings `"NaN"`, `"Infinity"`, and `"-Infinity"`, which
//! is also how non-finite values are encoded since JSON numbers cannot carry them.

use crate::engine::Engine;
use crate::plugin::{Encoded, TagDecoder, TagEncoder};
use crate::value::Number;
use crate::wire::{self, Token};
use crate::{Error, Result, Value};
use num_bigint::BigInt;

/// `g:Int32`, `g:Int64`, `g:Float`, and `g:Double`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberPlugin {
    Int32,
    Int64,
    Float,
    Double,
}

impl NumberPlugin {
    fn tag_str(&self) -> &'static str {
        match self {
            NumberPlugin::Int32 => wire::INT32,
            NumberPlugin::Int64 => wire::INT64,
            NumberPlugin::Float => wire::FLOAT,
            NumberPlugin::Double => wire::DOUBLE,
        }
    }

    fn invalid(&self, payload: &Token) -> Error {
        Error::malformed(format!("{} payload {} is not a valid number", self.tag_str(), payload))
    }
}

impl TagDecoder for NumberPlugin {
    fn decode_tag(&self, payload: &Token, _: &Engine) -> Result<Value> {
        let number = match self {
            NumberPlugin::Int32 => payload
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .map(Number::Int32),
            NumberPlugin::Int64 => payload.as_i64().map(Number::Int64),
            NumberPlugin::Float => parse_floating(payload)
                .filter(|d| !d.is_finite() || (*d as f32).is_finite())
                .map(|d| Number::Float(d as f32)),
            NumberPlugin::Double => parse_floating(payload).map(Number::Double),
        };
        number.map(Value::Number).ok_or_else(|| self.invalid(payload))
    }
}

impl TagEncoder for NumberPlugin {
    fn tag(&self) -> &str {
        self.tag_str()
    }

    fn encode_tag(&self, value: &Value, _: &Engine) -> Result<Encoded> {
        let payload = match value {
            Value::Number(Number::Int32(i)) => Token::from(*i),
            Value::Number(Number::Int64(i)) => Token::from(*i),
            Value::Number(Number::Float(f)) => floating_token(f64::from(*f)),
            Value::Number(Number::Double(d)) => floating_token(*d),
            other => {
                return Err(Error::unsupported_type(&format!(
                    "{} cannot encode {}",
                    self.tag_str(),
                    other.kind()
                )))
            }
        };
        Ok(Encoded::Payload(payload))
    }
}

fn parse_floating(payload: &Token) -> Option<f64> {
    match payload {
        Token::Number(n) => n.as_f64(),
        Token::String(s) => match s.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
}

fn floating_token(d: f64) -> Token {
    if d.is_nan() {
        Token::from("NaN")
    } else if d.is_infinite() {
        Token::from(if d > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        Token::from(d)
    }
}

/// `gx:BigInteger`: a JSON integer, or a decimal string beyond 64 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntegerPlugin;

impl TagDecoder for BigIntegerPlugin {
    fn decode_tag(&self, payload: &Token, _: &Engine) -> Result<Value> {
        let parsed = match payload {
            Token::Number(n) if n.is_i64() || n.is_u64() => n.to_string().parse::<BigInt>().ok(),
            Token::String(s) => s.parse::<BigInt>().ok(),
            _ => None,
        };
        parsed.map(Value::BigInt).ok_or_else(|| {
            Error::malformed(format!("{} payload {} is not an integer", wire::BIG_INTEGER, payload))
        })
    }
}

impl TagEncoder for BigIntegerPlugin {
    fn tag(&self) -> &str {
        wire::BIG_INTEGER
    }

    fn encode_tag(&self, value: &Value, _: &Engine) -> Result<Encoded> {
        let Value::BigInt(bi) = value else {
            return Err(Error::unsupported_type(&format!(
                "{} cannot encode {}",
                wire::BIG_INTEGER,
                value.kind()
            )));
        };
        let payload = match i64::try_from(bi) {
            Ok(i) => Token::from(i),
            Err(_) => Token::from(bi.to_string()),
        };
        Ok(Encoded::Payload(payload))
    }
}
