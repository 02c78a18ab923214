/// Builds wire tokens, with a shorthand for tagged objects.
///
/// `tagged!(tag => payload)` wraps any `json!`-style payload as
/// `{"@type": tag, "@value": payload}`. Inside lists and maps, each element may itself be a
/// parenthesized `(tag => payload)` pair or a plain `json!` expression.
///
/// # Examples
///
/// ```rust
/// use graphson_codec::tagged;
/// use serde_json::json;
///
/// assert_eq!(tagged!("g:Int32" => 7), json!({"@type": "g:Int32", "@value": 7}));
///
/// let set = tagged!("g:Set" => [1, 2, ("g:Int64" => 3)]);
/// assert_eq!(
///     set,
///     json!({"@type": "g:Set", "@value": [1, 2, {"@type": "g:Int64", "@value": 3}]})
/// );
/// ```
#[macro_export]
macro_rules! tagged {
    (@elem ($tag:expr => $($payload:tt)+)) => {
        $crate::tagged!($tag => $($payload)+)
    };

    (@elem $other:tt) => {
        $crate::__serde_json::json!($other)
    };

    // List-style payload whose elements may be nested tag pairs
    ($tag:expr => [ $($elem:tt),* $(,)? ]) => {
        $crate::wire::tagged(
            $tag,
            $crate::__serde_json::Value::Array(vec![$($crate::tagged!(@elem $elem)),*]),
        )
    };

    ($tag:expr => $payload:tt) => {
        $crate::wire::tagged($tag, $crate::__serde_json::json!($payload))
    };
}
