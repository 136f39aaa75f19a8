pub const BASE_MIGRATION: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

pub const RECENT_SEARCHES_KEY: &str = "recent_searches";
pub const SAVED_RECIPES_KEY: &str = "saved_recipes";
