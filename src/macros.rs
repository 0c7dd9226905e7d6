/// Builds a [`Dynamic`](crate::Dynamic) value from JSON-like literal syntax.
///
/// Objects become shared [`DynMap`](crate::DynMap)s (keys in source order),
/// arrays become [`DynSeq`](crate::DynSeq)s, and any other expression is
/// converted through [`to_dynamic`](crate::to_dynamic). Array elements and
/// object values are single token trees, so wrap negative numbers or paths
/// in parentheses: `scl!([(-1), (i64::MAX)])`.
///
/// # Examples
///
/// ```rust
/// use serde_scl::{dumps, scl};
///
/// let config = scl!({
///     "name": "api",
///     "ports": [80, 443],
///     "tls": { "enabled": true }
/// });
/// let text = dumps(&config).unwrap();
/// assert!(text.starts_with("name :: str { \"api\" }\n"));
/// ```
#[macro_export]
macro_rules! scl {
    (null) => {
        $crate::Dynamic::Null
    };

    (true) => {
        $crate::Dynamic::Bool(true)
    };

    (false) => {
        $crate::Dynamic::Bool(false)
    };

    ([]) => {
        $crate::Dynamic::Seq($crate::DynSeq::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {{
        let seq = $crate::DynSeq::new();
        $(
            seq.push($crate::scl!($elem));
        )*
        $crate::Dynamic::Seq(seq)
    }};

    ({}) => {
        $crate::Dynamic::Map($crate::DynMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let map = $crate::DynMap::new();
        $(
            map.insert($key, $crate::scl!($value));
        )*
        $crate::Dynamic::Map(map)
    }};

    ($other:expr) => {{
        $crate::to_dynamic(&$other).unwrap_or($crate::Dynamic::Null)
    }};
}
