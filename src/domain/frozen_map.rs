use serde::Serialize;
use smallvec::SmallVec;

use crate::error::DomainError;

/// An immutable string-keyed map that preserves insertion order,
/// optimized for small collections (greeks, fit-quality metrics).
///
/// Backed by a `SmallVec`, so maps of up to `N` entries (default 8) live
/// on the stack.
///
/// # Ordering Guarantees
///
/// - Iteration order is exactly insertion order and is deterministic,
///   which the wire codec relies on for byte-identical re-encodings.
/// - Duplicate keys are rejected at construction, not deduplicated.
///
/// # Examples
///
/// ```rust
/// # use dealdesk::domain::FrozenMap;
/// # use rust_decimal::Decimal;
/// let greeks = FrozenMap::from_entries([
///     ("delta".to_string(), Decimal::new(55, 2)),
///     ("vega".to_string(), Decimal::new(12, 2)),
/// ])
/// .unwrap();
///
/// let keys: Vec<_> = greeks.keys().collect();
/// assert_eq!(keys, vec!["delta", "vega"]);
/// assert_eq!(greeks.get("vega"), Some(&Decimal::new(12, 2)));
/// ```
// No Deserialize on purpose: construction must pass `from_entries` so
// the duplicate-key invariant holds; the wire codec decodes through it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FrozenMap<V> {
    inner: SmallVec<[(String, V); 8]>,
}

impl<V> FrozenMap<V> {
    /// Creates an empty map.
    pub fn empty() -> Self {
        Self {
            inner: SmallVec::new(),
        }
    }

    /// Builds a map from `(key, value)` pairs, preserving their order.
    /// Fails on the first duplicate key.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, V)>,
    ) -> Result<Self, DomainError> {
        let mut inner: SmallVec<[(String, V); 8]> = SmallVec::new();
        for (key, value) in entries {
            if inner.iter().any(|(k, _)| *k == key) {
                return Err(DomainError::DuplicateKey(key));
            }
            inner.push((key, value));
        }
        Ok(Self { inner })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Linear-scan lookup; fine at the sizes this map is built for.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.inner
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.iter().any(|(k, _)| k == key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.inner.iter().map(|(_, v)| v)
    }
}
