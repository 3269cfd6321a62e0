//! SQL DDL for initializing the lead storage.

/// SQLite schema with:
/// - `leads`: `created_at` filled by the engine as RFC 3339 UTC text with milliseconds
/// - `admin_users`: `username` UNIQUE, bcrypt `password_hash`
/// - index on `leads.created_at` for the newest-first listing
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS leads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT,
    contact TEXT,
    message TEXT,
    budget TEXT,
    form_type TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads(created_at);

CREATE TABLE IF NOT EXISTS admin_users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL
);
"#;
