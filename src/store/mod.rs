pub mod migrations;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, warn};

use crate::catalog::{Catalog, Recipe};
use crate::store::migrations::{BASE_MIGRATION, RECENT_SEARCHES_KEY, SAVED_RECIPES_KEY};

pub const DEFAULT_RECENT_SEARCH_LIMIT: usize = 5;

/// Recent searches and saved recipe ids, one JSON array per key. Unreadable
/// values read back as empty lists.
pub struct UserStore {
    conn: Connection,
    recent_limit: usize,
}

impl UserStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open user store {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn,
            recent_limit: DEFAULT_RECENT_SEARCH_LIMIT,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit.max(1);
        self
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(BASE_MIGRATION)?;
        Ok(())
    }

    fn read_list(&self, key: &str) -> Vec<String> {
        let raw = self.conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );
        let json = match raw {
            Ok(json) => json,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Vec::new(),
            Err(err) => {
                warn!(key, error = %err, "user store read failed, using empty list");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&json) {
            Ok(list) => list,
            Err(err) => {
                warn!(key, error = %err, "user store value is corrupt, using empty list");
                Vec::new()
            }
        }
    }

    fn write_list(&self, key: &str, values: &[String]) -> Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO kv_store(key, value, updated_at)
VALUES (?1, ?2, ?3)
ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
"#,
                params![key, serde_json::to_string(values)?, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write {key}"))?;
        debug!(key, len = values.len(), "user store updated");
        Ok(())
    }

    /// Stores `value` verbatim, without JSON validation.
    pub fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store(key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.read_list(RECENT_SEARCHES_KEY)
    }

    /// Newest first, no duplicates, at most `recent_limit` entries.
    pub fn record_search(&self, text: &str) -> Result<Vec<String>> {
        let text = text.trim();
        let mut recent = self.recent_searches();
        if text.is_empty() {
            return Ok(recent);
        }
        recent.retain(|entry| entry != text);
        recent.insert(0, text.to_string());
        recent.truncate(self.recent_limit);
        self.write_list(RECENT_SEARCHES_KEY, &recent)?;
        Ok(recent)
    }

    pub fn clear_recent_searches(&self) -> Result<()> {
        self.write_list(RECENT_SEARCHES_KEY, &[])
    }

    pub fn favorites(&self) -> Vec<String> {
        self.read_list(SAVED_RECIPES_KEY)
    }

    pub fn is_favorite(&self, recipe_id: &str) -> bool {
        self.favorites().iter().any(|id| id == recipe_id)
    }

    /// Returns false when the id was already saved.
    pub fn add_favorite(&self, recipe_id: &str) -> Result<bool> {
        let mut saved = self.favorites();
        if saved.iter().any(|id| id == recipe_id) {
            return Ok(false);
        }
        saved.push(recipe_id.to_string());
        self.write_list(SAVED_RECIPES_KEY, &saved)?;
        Ok(true)
    }

    /// Returns false when the id was not saved.
    pub fn remove_favorite(&self, recipe_id: &str) -> Result<bool> {
        let mut saved = self.favorites();
        let before = saved.len();
        saved.retain(|id| id != recipe_id);
        if saved.len() == before {
            return Ok(false);
        }
        self.write_list(SAVED_RECIPES_KEY, &saved)?;
        Ok(true)
    }

    /// Returns whether the recipe is saved after the toggle.
    pub fn toggle_favorite(&self, recipe_id: &str) -> Result<bool> {
        if self.remove_favorite(recipe_id)? {
            return Ok(false);
        }
        self.add_favorite(recipe_id)
    }

    /// Saved recipes that still exist in the catalog, in save order.
    pub fn saved_recipes<'c>(&self, catalog: &'c Catalog) -> Vec<&'c Recipe> {
        self.favorites()
            .iter()
            .filter_map(|id| catalog.recipe_by_id(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_searches_are_newest_first_and_capped() {
        let store = UserStore::open_in_memory().unwrap();
        for query in ["eggs", "rice", "pasta", "tofu", "kale", "beans"] {
            store.record_search(query).unwrap();
        }
        assert_eq!(
            store.recent_searches(),
            vec!["beans", "kale", "tofu", "pasta", "rice"]
        );

        store.record_search(" tofu ").unwrap();
        assert_eq!(
            store.recent_searches(),
            vec!["tofu", "beans", "kale", "pasta", "rice"]
        );

        store.record_search("   ").unwrap();
        assert_eq!(store.recent_searches().len(), 5);

        store.clear_recent_searches().unwrap();
        assert!(store.recent_searches().is_empty());
    }

    #[test]
    fn favorites_toggle_and_dedupe() {
        let store = UserStore::open_in_memory().unwrap();
        assert!(store.add_favorite("2").unwrap());
        assert!(!store.add_favorite("2").unwrap());
        assert!(store.toggle_favorite("5").unwrap());
        assert_eq!(store.favorites(), vec!["2", "5"]);
        assert!(!store.toggle_favorite("2").unwrap());
        assert!(!store.is_favorite("2"));
        assert!(!store.remove_favorite("2").unwrap());
    }

    #[test]
    fn saved_recipes_skip_unknown_ids() {
        let store = UserStore::open_in_memory().unwrap();
        store.add_favorite("6").unwrap();
        store.add_favorite("missing").unwrap();
        store.add_favorite("1").unwrap();
        let saved = store.saved_recipes(Catalog::builtin());
        let ids: Vec<&str> = saved.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["6", "1"]);
    }

    #[test]
    fn corrupt_values_read_as_empty() {
        let store = UserStore::open_in_memory().unwrap();
        store.put_raw(SAVED_RECIPES_KEY, "{not json").unwrap();
        store.put_raw(RECENT_SEARCHES_KEY, "42").unwrap();
        assert!(store.favorites().is_empty());
        assert!(store.recent_searches().is_empty());
        assert!(store.add_favorite("3").unwrap());
        assert_eq!(store.favorites(), vec!["3"]);
    }

    #[test]
    fn state_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("user.db");
        {
            let store = UserStore::open(&path).unwrap();
            store.record_search("garlic").unwrap();
            store.add_favorite("4").unwrap();
        }
        let store = UserStore::open(&path).unwrap().with_recent_limit(2);
        assert_eq!(store.recent_searches(), vec!["garlic"]);
        assert!(store.is_favorite("4"));
        store.record_search("onion").unwrap();
        store.record_search("leek").unwrap();
        assert_eq!(store.recent_searches(), vec!["leek", "onion"]);
    }
}
