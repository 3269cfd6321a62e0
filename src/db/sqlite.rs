use crate::db::Storage;
use crate::db::models::{AdminUser, Lead, LeadId, NewLead};
use crate::db::schema::SQLITE_INIT;
use crate::error::StorageError;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database file. Every pooled connection
    /// waits up to `lock_timeout` on a held write lock before reporting busy.
    pub async fn open(path: &Path, lock_timeout: Duration) -> Result<Self, StorageError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(sqlx::Error::Io)?;
        }
        let connect_opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(lock_timeout);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        info!(path = %path.display(), lock_timeout_secs = lock_timeout.as_secs(), "database opened");
        Ok(Self::new(pool))
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        debug!("schema ready");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn insert_lead(&self, lead: &NewLead) -> Result<LeadId, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leads (name, email, contact, message, budget, form_type)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.contact)
        .bind(&lead.message)
        .bind(&lead.budget)
        .bind(&lead.form_type)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, StorageError> {
        let rows = sqlx::query_as::<_, Lead>(
            r#"SELECT id, name, email, contact, message, budget, form_type, created_at
               FROM leads ORDER BY created_at DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_lead(&self, id: LeadId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminUser>, StorageError> {
        let row = sqlx::query_as::<_, AdminUser>(
            "SELECT id, username, password_hash FROM admin_users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn count_admins(&self) -> Result<i64, StorageError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin_users")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    async fn insert_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO admin_users (username, password_hash) VALUES (?, ?)")
                .bind(username)
                .bind(password_hash)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
