//! Feature schemas: named access to an engine's positional features.

use ahash::AHashMap;

use crate::error::{PolydictError, Result};

/// Mapping from feature name to the slot index holding that feature.
///
/// Names and indices are unique within one schema. Declaration order is kept
/// so listings come out the way the engine declared them.
///
/// # Examples
///
/// ```
/// use polydict::dictionary::schema::FeatureSchema;
///
/// let schema = FeatureSchema::from_fields(&[("POS", 0), ("READING", 7)]).unwrap();
/// assert_eq!(schema.get("READING"), Some(7));
/// assert_eq!(schema.get("LEMMA"), None);
/// assert_eq!(schema.names().collect::<Vec<_>>(), vec!["POS", "READING"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureSchema {
    slots: AHashMap<String, i32>,
    order: Vec<String>,
}

impl FeatureSchema {
    /// A schema without any feature slots.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a schema from declared `(name, index)` pairs.
    ///
    /// Fails if a name or an index is declared twice.
    pub fn from_fields<N: AsRef<str>>(fields: &[(N, i32)]) -> Result<Self> {
        let mut schema = FeatureSchema::empty();
        let mut seen_indices = AHashMap::with_capacity(fields.len());

        for (name, index) in fields {
            let name = name.as_ref();
            if schema.slots.contains_key(name) {
                return Err(PolydictError::invalid_config(format!(
                    "feature '{name}' is declared more than once"
                )));
            }
            if let Some(other) = seen_indices.insert(*index, name) {
                return Err(PolydictError::invalid_config(format!(
                    "features '{other}' and '{name}' share slot {index}"
                )));
            }
            schema.slots.insert(name.to_string(), *index);
            schema.order.push(name.to_string());
        }

        Ok(schema)
    }

    /// Slot index of a feature, if declared.
    pub fn get(&self, name: &str) -> Option<i32> {
        self.slots.get(name).copied()
    }

    /// Whether a feature is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Feature names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(name, index)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.order
            .iter()
            .map(move |name| (name.as_str(), self.slots[name]))
    }

    /// Number of declared features.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no feature is declared.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields() {
        let schema = FeatureSchema::from_fields(&[("B", 1), ("A", 0), ("Z", 25)]).unwrap();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.get("Z"), Some(25));
        assert!(schema.contains("A"));
        assert_eq!(
            schema.iter().collect::<Vec<_>>(),
            vec![("B", 1), ("A", 0), ("Z", 25)]
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = FeatureSchema::from_fields(&[("A", 0), ("A", 1)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let result = FeatureSchema::from_fields(&[("A", 0), ("B", 0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_schema() {
        let schema = FeatureSchema::empty();
        assert!(schema.is_empty());
        assert_eq!(schema.names().count(), 0);
    }
}
