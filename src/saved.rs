//! Saved searches: a stored report plus its coordinates and a user label.
//!
//! Stored reports are replayed as they were saved; loading a saved search
//! never re-runs the aggregation.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{LocationQuery, WeatherReport};
use crate::{Result, SkycastError};

const MAX_LABEL_CHARS: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SavedSearch {
    pub id: u64,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub report: WeatherReport,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a saved search
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewSavedSearch {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub report: WeatherReport,
}

impl NewSavedSearch {
    pub fn validate(&self) -> Result<()> {
        validate_label(&self.label)?;
        LocationQuery::coordinates(self.latitude, self.longitude)?;
        Ok(())
    }
}

fn validate_label(label: &str) -> Result<()> {
    let label = label.trim();
    if label.is_empty() {
        return Err(SkycastError::validation("Label cannot be empty"));
    }
    if label.chars().count() > MAX_LABEL_CHARS {
        return Err(SkycastError::validation(format!(
            "Label must be at most {MAX_LABEL_CHARS} characters"
        )));
    }
    Ok(())
}

/// Persistence boundary for saved searches
#[async_trait]
pub trait SavedSearchStore: Send + Sync {
    /// All saved searches, newest first
    async fn list(&self) -> Result<Vec<SavedSearch>>;
    async fn get(&self, id: u64) -> Result<Option<SavedSearch>>;
    async fn create(&self, search: NewSavedSearch) -> Result<SavedSearch>;
    /// Change only the label; `None` when no such id exists
    async fn rename(&self, id: u64, label: String) -> Result<Option<SavedSearch>>;
    /// `true` when something was deleted
    async fn delete(&self, id: u64) -> Result<bool>;
}

/// Process-local store, lost on restart
#[derive(Debug, Default)]
pub struct InMemorySavedSearchStore {
    next_id: AtomicU64,
    searches: RwLock<Vec<SavedSearch>>,
}

impl InMemorySavedSearchStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedSearchStore for InMemorySavedSearchStore {
    async fn list(&self) -> Result<Vec<SavedSearch>> {
        let searches = self.searches.read().await;
        let mut list = searches.clone();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(list)
    }

    async fn get(&self, id: u64) -> Result<Option<SavedSearch>> {
        let searches = self.searches.read().await;
        Ok(searches.iter().find(|s| s.id == id).cloned())
    }

    async fn create(&self, search: NewSavedSearch) -> Result<SavedSearch> {
        search.validate()?;

        let now = Utc::now();
        let saved = SavedSearch {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            label: search.label.trim().to_string(),
            latitude: search.latitude,
            longitude: search.longitude,
            report: search.report,
            created_at: now,
            updated_at: now,
        };

        debug!("Saving search {} '{}'", saved.id, saved.label);
        self.searches.write().await.push(saved.clone());
        Ok(saved)
    }

    async fn rename(&self, id: u64, label: String) -> Result<Option<SavedSearch>> {
        validate_label(&label)?;

        let mut searches = self.searches.write().await;
        let Some(search) = searches.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        search.label = label.trim().to_string();
        search.updated_at = Utc::now();
        Ok(Some(search.clone()))
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut searches = self.searches.write().await;
        let before = searches.len();
        searches.retain(|s| s.id != id);
        Ok(searches.len() != before)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::NormalizedCurrent;
    use crate::tables::DisplayIcon;

    pub(crate) fn report() -> WeatherReport {
        WeatherReport {
            current: NormalizedCurrent {
                location_name: "Paris, FR".to_string(),
                temperature: 21,
                feels_like: 20,
                humidity: 50,
                wind_speed_kmh: 12,
                description: "clear sky".to_string(),
                icon: DisplayIcon::Sun,
                epoch_seconds: 1_721_649_600,
            },
            days: Vec::new(),
            aqi: None,
            hourly: None,
            resolved_lat: 48.85,
            resolved_lon: 2.35,
            time_zone: Some("UTC+02:00".to_string()),
            degraded: Vec::new(),
        }
    }

    fn new_search(label: &str) -> NewSavedSearch {
        NewSavedSearch {
            label: label.to_string(),
            latitude: 48.85,
            longitude: 2.35,
            report: report(),
        }
    }

    #[tokio::test]
    async fn test_create_and_replay_verbatim() {
        let store = InMemorySavedSearchStore::new();
        let saved = store.create(new_search("Home")).await.unwrap();
        let loaded = store.get(saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.report, report());
        assert_eq!(loaded.label, "Home");
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = InMemorySavedSearchStore::new();
        let first = store.create(new_search("First")).await.unwrap();
        let second = store.create(new_search("Second")).await.unwrap();
        let list = store.list().await.unwrap();
        assert_eq!(
            list.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
    }

    #[tokio::test]
    async fn test_rename_only_changes_label() {
        let store = InMemorySavedSearchStore::new();
        let saved = store.create(new_search("Home")).await.unwrap();
        let renamed = store
            .rename(saved.id, "Office".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.label, "Office");
        assert_eq!(renamed.report, saved.report);
        assert_eq!(renamed.created_at, saved.created_at);
        assert!(store.rename(999, "x".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemorySavedSearchStore::new();
        let saved = store.create(new_search("Home")).await.unwrap();
        assert!(store.delete(saved.id).await.unwrap());
        assert!(!store.delete(saved.id).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_invalid_input() {
        let store = InMemorySavedSearchStore::new();
        assert!(store.create(new_search("  ")).await.is_err());

        let mut bad = new_search("Nowhere");
        bad.latitude = 120.0;
        assert!(matches!(
            store.create(bad).await,
            Err(SkycastError::Validation { .. })
        ));
    }
}
