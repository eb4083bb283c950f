//! Field catalog shared by every record of a run.

use crate::error::ConfigError;
use std::collections::HashSet;
use std::sync::Arc;

/// Fixed, ordered list of numeric field names.
///
/// The order drives both the text column order and the binary field-name
/// order. Cloning is cheap and the contents never change once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    names: Arc<[String]>,
}

impl FieldCatalog {
    /// Build a catalog, rejecting empty and duplicated names.
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ConfigError::EmptyFieldCatalog);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateField(name.clone()));
            }
        }
        Ok(Self {
            names: names.into(),
        })
    }

    /// Build a catalog without validation.
    ///
    /// Encoders still reject an empty catalog at encode time.
    pub fn new_unchecked<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        Self {
            names: names.into(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keeps_order() {
        let catalog = FieldCatalog::new(["voltage", "current", "power"]).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.iter().collect::<Vec<_>>(),
            vec!["voltage", "current", "power"]
        );
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = FieldCatalog::new(Vec::<String>::new());
        assert!(matches!(result, Err(ConfigError::EmptyFieldCatalog)));
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = FieldCatalog::new(["a", "b", "a"]);
        assert!(matches!(result, Err(ConfigError::DuplicateField(name)) if name == "a"));
    }

    #[test]
    fn test_clone_shares_names() {
        let catalog = FieldCatalog::new(["f1", "f2"]).unwrap();
        let other = catalog.clone();
        assert!(std::ptr::eq(catalog.names(), other.names()));
    }
}
