//! Ordered lookup of loaded source definitions.

use crate::{
    definition::SourceDefinition,
    error::{Result, SourceError},
    loader::SourceLoader,
};
use pricewatch_core::SourceId;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Source definitions keyed by ID.
///
/// Kept ordered by ID so that "all sources" always means the same sequence.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    definitions: BTreeMap<SourceId, SourceDefinition>,
}

impl SourceRegistry {
    /// Build a registry from already loaded definitions.
    ///
    /// When two files declare the same ID the later one wins.
    #[must_use]
    pub fn from_definitions(definitions: impl IntoIterator<Item = SourceDefinition>) -> Self {
        let mut map = BTreeMap::new();

        for definition in definitions {
            let id = definition.id().clone();
            if map.insert(id.clone(), definition).is_some() {
                warn!(source_id = %id, "duplicate source definition; keeping the last one");
            }
        }

        Self { definitions: map }
    }

    /// Load every definition the loader can find.
    ///
    /// # Errors
    /// Fails when the definitions directory cannot be read.
    pub fn load_from(loader: &SourceLoader) -> Result<Self> {
        let registry = Self::from_definitions(loader.load_all()?);
        info!(count = registry.len(), "source registry ready");
        Ok(registry)
    }

    /// Look up one definition.
    ///
    /// # Errors
    /// [`SourceError::NotFound`] for an unknown ID.
    pub fn get(&self, source_id: &SourceId) -> Result<&SourceDefinition> {
        self.definitions
            .get(source_id)
            .ok_or_else(|| SourceError::NotFound {
                source_id: source_id.to_string(),
            })
    }

    /// Every definition, ordered by ID.
    pub fn get_all(&self) -> impl Iterator<Item = &SourceDefinition> {
        self.definitions.values()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether no definitions were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Resolve the sources to scan.
    ///
    /// An empty list selects every source in ID order; otherwise the
    /// definitions come back in the order requested.
    ///
    /// # Errors
    /// Fails on a malformed or unknown ID.
    pub fn select(&self, ids: &[String]) -> Result<Vec<SourceDefinition>> {
        if ids.is_empty() {
            return Ok(self.get_all().cloned().collect());
        }

        ids.iter()
            .map(|id| {
                let source_id = SourceId::new(id.trim())?;
                self.get(&source_id).cloned()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ListingSelectors, SearchMethod, SourceMetadata};
    use pricewatch_core::LocaleSpec;

    fn create_test_definition(id: &str) -> SourceDefinition {
        SourceDefinition {
            source: SourceMetadata {
                id: SourceId::new(id).expect("valid source ID"),
                name: format!("Test {id}"),
                url: "https://test.com/".to_string(),
                locale: LocaleSpec::pt_br(),
                price_replacement: None,
            },
            search: SearchMethod::UrlTemplate {
                template: "https://test.com/busca?q={query}".to_string(),
            },
            listing: ListingSelectors {
                container: ".grid".to_string(),
                item: ".product".to_string(),
                description: ".title".to_string(),
                price: ".price".to_string(),
                seller: None,
                no_results: None,
            },
        }
    }

    fn registry(ids: &[&str]) -> SourceRegistry {
        SourceRegistry::from_definitions(ids.iter().map(|id| create_test_definition(id)))
    }

    #[test]
    fn test_empty_registry() {
        let registry = SourceRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.select(&[]).expect("select all").is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let registry = registry(&["test-shop"]);
        let source_id = SourceId::new("test-shop").expect("valid source ID");

        let retrieved = registry.get(&source_id).expect("get definition");
        assert_eq!(retrieved.name(), "Test test-shop");

        let missing = SourceId::new("nonexistent").expect("valid source ID");
        assert!(matches!(
            registry.get(&missing),
            Err(SourceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_id_keeps_last() {
        let mut renamed = create_test_definition("kabum");
        renamed.source.name = "KaBuM!".to_string();

        let registry =
            SourceRegistry::from_definitions([create_test_definition("kabum"), renamed]);

        assert_eq!(registry.len(), 1);
        let id = SourceId::new("kabum").expect("valid source ID");
        assert_eq!(registry.get(&id).expect("get definition").name(), "KaBuM!");
    }

    #[test]
    fn test_get_all_is_ordered_by_id() {
        let registry = registry(&["shoptime", "amazon-br", "kabum"]);

        let ids: Vec<&str> = registry.get_all().map(|d| d.id().as_str()).collect();
        assert_eq!(ids, vec!["amazon-br", "kabum", "shoptime"]);
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let registry = registry(&["shoptime", "amazon-br", "kabum"]);

        let selected = registry
            .select(&["shoptime".to_string(), "amazon-br".to_string()])
            .expect("select sources");
        let ids: Vec<&str> = selected.iter().map(|d| d.id().as_str()).collect();
        assert_eq!(ids, vec!["shoptime", "amazon-br"]);

        assert_eq!(registry.select(&[]).expect("select all").len(), 3);
    }

    #[test]
    fn test_select_unknown_or_malformed_id() {
        let registry = registry(&["kabum"]);

        let unknown = registry.select(&["submarino".to_string()]);
        assert!(matches!(unknown, Err(SourceError::NotFound { .. })));

        let malformed = registry.select(&["Not An Id".to_string()]);
        assert!(matches!(malformed, Err(SourceError::InvalidId(_))));
    }
}
