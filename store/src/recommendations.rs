//! Cleanup recommendation catalog

use sentinel_core::{Error, Recommendation, Result};
use tracing::info;

use crate::seed;

/// In-memory catalog of cleanup recommendations
#[derive(Debug, Clone)]
pub struct RecommendationBook {
    items: Vec<Recommendation>,
}

impl RecommendationBook {
    pub fn new(items: Vec<Recommendation>) -> Self {
        Self { items }
    }

    /// Catalog seeded with the static recommendations
    pub fn seeded() -> Self {
        Self::new(seed::default_recommendations())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Recommendation> {
        self.items.iter().find(|r| r.id == id)
    }

    /// Recommendations for the named servers, or all of them when the filter is empty
    pub fn list(&self, servers: &[String]) -> Vec<Recommendation> {
        self.items
            .iter()
            .filter(|r| servers.is_empty() || servers.contains(&r.server))
            .cloned()
            .collect()
    }

    /// Drop the selected recommendations, returning how many were removed
    pub fn remove(&mut self, ids: &[String]) -> Result<usize> {
        if ids.is_empty() {
            return Err(Error::InvalidInput("No items selected".into()));
        }

        let before = self.items.len();
        self.items.retain(|r| !ids.contains(&r.id));
        let removed = before - self.items.len();

        info!(requested = ids.len(), removed, "Removed recommendations");
        Ok(removed)
    }
}

impl Default for RecommendationBook {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_server() {
        let book = RecommendationBook::seeded();
        assert_eq!(book.list(&[]).len(), 5);

        let dev = book.list(&["DEV-APP-01".to_string()]);
        assert_eq!(dev.len(), 2);
        assert!(dev.iter().all(|r| r.server == "DEV-APP-01"));

        assert!(book.list(&["NOPE".to_string()]).is_empty());
    }

    #[test]
    fn test_remove_selected() {
        let mut book = RecommendationBook::seeded();
        let removed = book
            .remove(&["rec-001".to_string(), "rec-404".to_string()])
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(book.len(), 4);
        assert!(book.get("rec-001").is_none());
    }

    #[test]
    fn test_remove_requires_selection() {
        let mut book = RecommendationBook::seeded();
        let err = book.remove(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: No items selected");
        assert_eq!(book.len(), 5);
    }
}
