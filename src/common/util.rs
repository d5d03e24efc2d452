//! Generic Helpers
//!
//! Small sequence utilities shared by the compiler passes: a dual-result
//! map and a first-match association lookup.

use std::fmt;

/// Key missing from an association sequence or a fixed lookup table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupError {
    /// The missing key, rendered as text.
    pub key: String,
}

impl LookupError {
    pub fn new(key: impl fmt::Display) -> Self {
        LookupError {
            key: key.to_string(),
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lookup failed: no entry for key `{}`", self.key)
    }
}

impl std::error::Error for LookupError {}

/// Apply a function producing two values to each element of a sequence,
/// collecting the results into two vectors of the same length.
///
/// Input order is preserved in both outputs; an empty input yields two
/// empty vectors.
pub fn map2<T, A, B>(
    f: impl FnMut(T) -> (A, B),
    items: impl IntoIterator<Item = T>,
) -> (Vec<A>, Vec<B>) {
    items.into_iter().map(f).unzip()
}

/// Look up `key` in an ordered sequence of key-value pairs.
///
/// Returns the value of the first pair whose key matches, so duplicate
/// keys resolve to the earliest entry.
pub fn lookup<'a, K, V>(key: &K, pairs: &'a [(K, V)]) -> Result<&'a V, LookupError>
where
    K: PartialEq + fmt::Display,
{
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
        .ok_or_else(|| LookupError::new(key))
}
