//! Built-in tag plugins.
//!
//! - [`numeric`]: `g:Int32`, `g:Int64`, `g:Float`, `g:Double`, `gx:BigInteger`
//! - [`temporal`]: `g:Date`, `g:Timestamp`
//! - [`blob`]: `gx:ByteBuffer`, a string-based scalar round-tripping through base64
//! - [`collection`]: encoders for `g:List` and `g:Map`, and [`DedupCollectionPlugin`], a
//!   collection-style decoder that is also the `g:Set` encoder
//!
//! `g:List`, `g:Set`, `g:Map`, and `g:BulkSet` are decoded by the engine itself because their
//! result depends on the declared type; only their encoders live here.

pub mod blob;
pub mod collection;
pub mod numeric;
pub mod temporal;

pub use blob::ByteBufferPlugin;
pub use collection::{DedupCollectionPlugin, ListPlugin, MapPlugin};
pub use numeric::{BigIntegerPlugin, NumberPlugin};
pub use temporal::DatePlugin;

use crate::plugin::{TagDecoder, TagEncoder};
use crate::value::ValueKind;
use crate::wire;
use std::sync::Arc;

pub(crate) fn builtin_decoders() -> Vec<(&'static str, Arc<dyn TagDecoder>)> {
    vec![
        (wire::INT32, decoder(NumberPlugin::Int32)),
        (wire::INT64, decoder(NumberPlugin::Int64)),
        (wire::FLOAT, decoder(NumberPlugin::Float)),
        (wire::DOUBLE, decoder(NumberPlugin::Double)),
        (wire::BIG_INTEGER, decoder(BigIntegerPlugin)),
        (wire::DATE, decoder(DatePlugin::new(wire::DATE))),
        (wire::TIMESTAMP, decoder(DatePlugin::new(wire::TIMESTAMP))),
        (wire::BYTE_BUFFER, decoder(ByteBufferPlugin)),
    ]
}

pub(crate) fn builtin_encoders() -> Vec<(ValueKind, Arc<dyn TagEncoder>)> {
    vec![
        (ValueKind::Int32, encoder(NumberPlugin::Int32)),
        (ValueKind::Int64, encoder(NumberPlugin::Int64)),
        (ValueKind::Float, encoder(NumberPlugin::Float)),
        (ValueKind::Double, encoder(NumberPlugin::Double)),
        (ValueKind::BigInt, encoder(BigIntegerPlugin)),
        (ValueKind::Date, encoder(DatePlugin::new(wire::DATE))),
        (ValueKind::Bytes, encoder(ByteBufferPlugin)),
        (ValueKind::List, encoder(ListPlugin)),
        (ValueKind::Set, encoder(DedupCollectionPlugin::new(wire::SET))),
        (ValueKind::Map, encoder(MapPlugin)),
    ]
}

fn decoder<D: TagDecoder + 'static>(plugin: D) -> Arc<dyn TagDecoder> {
    Arc::new(plugin)
}

fn encoder<E: TagEncoder + 'static>(plugin: E) -> Arc<dyn TagEncoder> {
    Arc::new(plugin)
}
