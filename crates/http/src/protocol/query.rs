//! Query string handling.
//!
//! A query key may appear several times (`?tag=a&tag=b`), so every key maps to the
//! list of its values in the order they were sent.

use std::collections::HashMap;

use crate::protocol::ParseError;

/// Decoded query parameters of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: HashMap<String, Vec<String>>,
}

impl Query {
    /// Decodes a raw query string (without the leading `?`).
    ///
    /// Names and values are percent-decoded and `+` is read as a space. Pairs whose
    /// value is empty (`a=` or a bare `a`) are dropped.
    pub fn parse(query: &str) -> Result<Self, ParseError> {
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query).map_err(ParseError::invalid_query)?;
        Ok(pairs.into_iter().collect())
    }

    /// All values sent for `name`, in request order.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.params.get(name).map(Vec::as_slice)
    }

    /// The first value sent for `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(|values| values.first()).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl FromIterator<(String, String)> for Query {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut params: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in iter {
            if value.is_empty() {
                continue;
            }
            params.entry(name).or_default().push(value);
        }
        Self { params }
    }
}
