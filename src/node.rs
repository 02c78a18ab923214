//! Deferred materialization of wire tokens.
//!
//! A [`LazyNode`] is what the engine returns when the caller declares [`TypeDesc::Lazy`]: the
//! raw token plus a handle to the engine that produced it. Nothing is decoded until the caller
//! asks for a concrete type, and nothing is cached afterwards: every call to
//! [`LazyNode::materialize`] is an independent decode of the same token.
//!
//! ```rust
//! use graphson_codec::{Engine, LazyNode, TypeDesc};
//! use serde_json::json;
//!
//! let engine = Engine::default();
//! let token = json!({"@type": "g:List", "@value": [1, 2, 3]});
//!
//! let node: LazyNode = engine.decode_as(&token).unwrap();
//! let numbers: Vec<i32> = node.materialize_as().unwrap();
//! let total: Vec<i64> = node.materialize_as().unwrap();
//!
//! assert_eq!(numbers, vec![1, 2, 3]);
//! assert_eq!(total, vec![1, 2, 3]);
//! ```

use crate::engine::Engine;
use crate::typed::FromGraphson;
use crate::types::TypeDesc;
use crate::wire::Token;
use crate::{Result, Value};
use std::fmt;
use std::sync::Arc;

/// A token whose decoding is deferred until a declared type is known.
///
/// Clones share the token and the engine. Equality compares the held tokens only.
#[derive(Clone)]
pub struct LazyNode {
    token: Arc<Token>,
    engine: Engine,
}

impl LazyNode {
    pub(crate) fn new(token: Token, engine: Engine) -> Self {
        LazyNode {
            token: Arc::new(token),
            engine,
        }
    }

    /// The raw token this node wraps.
    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The engine that created this node.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Decodes the held token against `declared`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`Engine::decode`] returns for this token.
    pub fn materialize(&self, declared: &TypeDesc) -> Result<Value> {
        self.engine.decode(&self.token, declared)
    }

    /// Decodes the held token into a Rust type.
    ///
    /// # Errors
    ///
    /// Returns whatever [`Engine::decode_as`] returns for this token.
    pub fn materialize_as<T: FromGraphson>(&self) -> Result<T> {
        self.engine.decode_as(&self.token)
    }
}

impl PartialEq for LazyNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.token, &other.token) || self.token == other.token
    }
}

impl Eq for LazyNode {}

impl fmt::Debug for LazyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyNode")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarKind;
    use serde_json::json;

    #[test]
    fn test_materialize_is_repeatable() {
        let engine = Engine::default();
        let node = LazyNode::new(json!({"@type": "g:Set", "@value": [1, 2, 2]}), engine);
        let declared = TypeDesc::set(TypeDesc::Scalar(ScalarKind::Int64));
        let first = node.materialize(&declared).unwrap();
        let second = node.materialize(&declared).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_set().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_materialize_different_targets() {
        let node = LazyNode::new(json!(7), Engine::default());
        assert_eq!(
            node.materialize(&TypeDesc::Scalar(ScalarKind::Int32)).unwrap(),
            Value::from(7i32)
        );
        assert_eq!(
            node.materialize(&TypeDesc::Scalar(ScalarKind::String)).unwrap(),
            Value::from("7")
        );
    }

    #[test]
    fn test_lazy_node_wraps_null_without_validation() {
        let node = LazyNode::new(Token::Null, Engine::default());
        assert!(node.materialize(&TypeDesc::Scalar(ScalarKind::Int32)).is_err());
        assert_eq!(node.materialize(&TypeDesc::Object).unwrap(), Value::Null);
    }

    #[test]
    fn test_clones_are_equal() {
        let node = LazyNode::new(json!({"a": 1}), Engine::default());
        assert_eq!(node.clone(), node);
    }
}
