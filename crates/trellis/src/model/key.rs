//! Identity resolution for rows.
//!
//! Every row is keyed by a [`RowKey`] derived once from its item. The key
//! is what survives reconciliation: as long as an item with the same key
//! keeps appearing in the input collection, the row (and its display
//! state) is reused instead of recreated.
//!
//! By default items are identified by the pointer of their `Arc` handle,
//! the closest Rust analog of reference identity. Callers whose items are
//! rebuilt on every update should inject a key function at construction
//! (the `track_by` analog) so logical identity survives reallocation.

use std::sync::Arc;

/// A stable identity key for a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// Pointer identity of the item handle (the default strategy).
    Ptr(usize),
    /// Integer key produced by a caller-provided key function.
    Int(i64),
    /// String key produced by a caller-provided key function.
    Str(String),
}

impl From<i64> for RowKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for RowKey {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Type alias for a key-extraction function.
///
/// The function maps an item to the key that identifies it across
/// reconciliations. Two distinct items resolving to the same key is a
/// caller error; the engine does not guard against it and the later item
/// wins.
pub type KeyFn<T> = Arc<dyn Fn(&T) -> RowKey + Send + Sync>;

/// Resolves items to stable identity keys.
///
/// Holds the injected key function, or falls back to `Arc` pointer
/// identity when none was provided.
pub struct IdentityResolver<T> {
    key_fn: Option<KeyFn<T>>,
}

impl<T> Clone for IdentityResolver<T> {
    fn clone(&self) -> Self {
        Self {
            key_fn: self.key_fn.clone(),
        }
    }
}

impl<T> Default for IdentityResolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IdentityResolver<T> {
    /// Creates a resolver using `Arc` pointer identity.
    pub fn new() -> Self {
        Self { key_fn: None }
    }

    /// Derives the identity key for an item.
    pub fn key_of(&self, item: &Arc<T>) -> RowKey {
        match &self.key_fn {
            Some(key_fn) => key_fn(item),
            None => RowKey::Ptr(Arc::as_ptr(item) as usize),
        }
    }
}

impl<T: Send + Sync + 'static> IdentityResolver<T> {
    /// Creates a resolver using the given key function.
    pub fn with_key_fn<F>(key_fn: F) -> Self
    where
        F: Fn(&T) -> RowKey + Send + Sync + 'static,
    {
        Self {
            key_fn: Some(Arc::new(key_fn)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_identity_default() {
        let resolver = IdentityResolver::<String>::new();

        let a = Arc::new("apple".to_string());
        let b = Arc::new("apple".to_string());

        // Equal values, distinct handles: different identities.
        assert_ne!(resolver.key_of(&a), resolver.key_of(&b));
        // The same handle keeps its identity.
        assert_eq!(resolver.key_of(&a), resolver.key_of(&a.clone()));
    }

    #[test]
    fn test_custom_key_fn() {
        let resolver = IdentityResolver::with_key_fn(|s: &String| RowKey::from(s.as_str()));

        let a = Arc::new("apple".to_string());
        let b = Arc::new("apple".to_string());

        // Value identity survives reallocation.
        assert_eq!(resolver.key_of(&a), resolver.key_of(&b));
        assert_eq!(resolver.key_of(&a), RowKey::Str("apple".to_string()));
    }

    #[test]
    fn test_default_resolver_needs_no_thread_bounds() {
        // Pointer identity works for item types that are not Send/Sync.
        let resolver = IdentityResolver::<std::rc::Rc<str>>::default();
        let item = Arc::new(std::rc::Rc::from("apple"));
        assert_eq!(resolver.key_of(&item), resolver.key_of(&item.clone()));
    }

    #[test]
    fn test_row_key_conversions() {
        assert_eq!(RowKey::from(7), RowKey::Int(7));
        assert_eq!(RowKey::from("x"), RowKey::Str("x".to_string()));
        assert_eq!(RowKey::from("x".to_string()), RowKey::Str("x".to_string()));
    }
}
