use crate::models::{AnalyticsConfig, ContentRecord, NewSocialAccount, SocialAccount};
use crate::storage::Storage;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT id, brand_id, username, account_id, access_token, refresh_token,
           token_expires_at, account_kind, is_active, last_synced_at, last_error
    FROM social_accounts
"#;

#[async_trait]
impl Storage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analytics_configs (
                brand_id TEXT PRIMARY KEY,
                property_id TEXT NOT NULL,
                tracking_enabled INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS social_accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                brand_id TEXT NOT NULL,
                username TEXT NOT NULL,
                account_id TEXT NOT NULL,
                access_token TEXT NOT NULL,
                refresh_token TEXT,
                token_expires_at INTEGER NOT NULL,
                account_kind TEXT NOT NULL DEFAULT 'business',
                is_active INTEGER NOT NULL DEFAULT 1,
                last_synced_at INTEGER,
                last_error TEXT
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_accounts_brand ON social_accounts(brand_id, is_active)",
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS content_records (
                account_id INTEGER NOT NULL,
                media_id TEXT NOT NULL,
                media_type TEXT NOT NULL,
                caption TEXT,
                permalink TEXT NOT NULL,
                thumbnail_url TEXT,
                posted_at INTEGER NOT NULL,
                like_count INTEGER NOT NULL DEFAULT 0,
                comment_count INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (account_id, media_id)
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn upsert_config(&self, config: &AnalyticsConfig) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO analytics_configs (brand_id, property_id, tracking_enabled)
            VALUES (?, ?, ?)
            ON CONFLICT (brand_id) DO UPDATE SET
                property_id = excluded.property_id,
                tracking_enabled = excluded.tracking_enabled
            "#,
        )
        .bind(&config.brand_id)
        .bind(&config.property_id)
        .bind(config.tracking_enabled)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn get_config(&self, brand_id: &str) -> Result<Option<AnalyticsConfig>> {
        let config = sqlx::query_as::<_, AnalyticsConfig>(
            "SELECT brand_id, property_id, tracking_enabled FROM analytics_configs WHERE brand_id = ?",
        )
        .bind(brand_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(config)
    }

    async fn insert_account(&self, account: &NewSocialAccount) -> Result<SocialAccount> {
        let result = sqlx::query(
            r#"
            INSERT INTO social_accounts
                (brand_id, username, account_id, access_token, refresh_token,
                 token_expires_at, account_kind, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?, 1)
            "#,
        )
        .bind(&account.brand_id)
        .bind(&account.username)
        .bind(&account.account_id)
        .bind(&account.access_token)
        .bind(&account.refresh_token)
        .bind(account.token_expires_at)
        .bind(&account.account_kind)
        .execute(self.pool.as_ref())
        .await?;

        let id = result.last_insert_rowid();
        let row = sqlx::query_as::<_, SocialAccount>(&format!("{SELECT_ACCOUNT} WHERE id = ?"))
            .bind(id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row)
    }

    async fn get_account(&self, account_id: i64) -> Result<Option<SocialAccount>> {
        let account = sqlx::query_as::<_, SocialAccount>(&format!("{SELECT_ACCOUNT} WHERE id = ?"))
            .bind(account_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(account)
    }

    async fn list_active_accounts(&self, brand_id: &str) -> Result<Vec<SocialAccount>> {
        let accounts = sqlx::query_as::<_, SocialAccount>(&format!(
            "{SELECT_ACCOUNT} WHERE brand_id = ? AND is_active = 1 ORDER BY id ASC"
        ))
        .bind(brand_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(accounts)
    }

    async fn deactivate_account(&self, account_id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE social_accounts SET is_active = 0 WHERE id = ?")
            .bind(account_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_tokens(
        &self,
        account_id: i64,
        access_token: &str,
        refresh_token: Option<&str>,
        token_expires_at: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE social_accounts
            SET access_token = ?,
                refresh_token = COALESCE(?, refresh_token),
                token_expires_at = ?,
                last_error = NULL
            WHERE id = ?
            "#,
        )
        .bind(access_token)
        .bind(refresh_token)
        .bind(token_expires_at)
        .bind(account_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn record_sync_success(&self, account_id: i64, synced_at: i64) -> Result<()> {
        sqlx::query(
            "UPDATE social_accounts SET last_synced_at = ?, last_error = NULL WHERE id = ?",
        )
        .bind(synced_at)
        .bind(account_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn record_account_error(&self, account_id: i64, error: &str) -> Result<()> {
        sqlx::query("UPDATE social_accounts SET last_error = ? WHERE id = ?")
            .bind(error)
            .bind(account_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn upsert_content(&self, account_id: i64, items: &[ContentRecord]) -> Result<u64> {
        let mut written = 0u64;
        for item in items {
            let result = sqlx::query(
                r#"
                INSERT INTO content_records
                    (account_id, media_id, media_type, caption, permalink,
                     thumbnail_url, posted_at, like_count, comment_count)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT (account_id, media_id) DO UPDATE SET
                    media_type = excluded.media_type,
                    caption = excluded.caption,
                    permalink = excluded.permalink,
                    thumbnail_url = excluded.thumbnail_url,
                    posted_at = excluded.posted_at,
                    like_count = excluded.like_count,
                    comment_count = excluded.comment_count
                "#,
            )
            .bind(account_id)
            .bind(&item.media_id)
            .bind(&item.media_type)
            .bind(&item.caption)
            .bind(&item.permalink)
            .bind(&item.thumbnail_url)
            .bind(item.posted_at)
            .bind(item.like_count)
            .bind(item.comment_count)
            .execute(self.pool.as_ref())
            .await?;

            written += result.rows_affected();
        }

        Ok(written)
    }

    async fn count_content(&self, account_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM content_records WHERE account_id = ?",
        )
        .bind(account_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }
}
