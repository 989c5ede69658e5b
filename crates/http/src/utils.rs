//! Helper macros used by the codec implementation.

/// Returns early with `Err($error)` when `$predicate` does not hold.
///
/// ```text
/// ensure!(header_map.contains_key(HOST), ParseError::MissingHost);
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
