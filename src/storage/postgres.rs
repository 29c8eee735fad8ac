use crate::models::{AnalyticsConfig, ContentRecord, NewSocialAccount, SocialAccount};
use crate::storage::Storage;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
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
impl Storage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analytics_configs (
                brand_id TEXT PRIMARY KEY,
                property_id TEXT NOT NULL,
                tracking_enabled BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS social_accounts (
                id BIGSERIAL PRIMARY KEY,
                brand_id TEXT NOT NULL,
                username TEXT NOT NULL,
                account_id TEXT NOT NULL,
                access_token TEXT NOT NULL,
                refresh_token TEXT,
                token_expires_at BIGINT NOT NULL,
                account_kind TEXT NOT NULL DEFAULT 'business',
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                last_synced_at BIGINT,
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
                account_id BIGINT NOT NULL,
                media_id TEXT NOT NULL,
                media_type TEXT NOT NULL,
                caption TEXT,
                permalink TEXT NOT NULL,
                thumbnail_url TEXT,
                posted_at BIGINT NOT NULL,
                like_count BIGINT NOT NULL DEFAULT 0,
                comment_count BIGINT NOT NULL DEFAULT 0,
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
            VALUES ($1, $2, $3)
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
            "SELECT brand_id, property_id, tracking_enabled FROM analytics_configs WHERE brand_id = $1",
        )
        .bind(brand_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(config)
    }

    async fn insert_account(&self, account: &NewSocialAccount) -> Result<SocialAccount> {
        let row = sqlx::query_as::<_, SocialAccount>(
            r#"
            INSERT INTO social_accounts
                (brand_id, username, account_id, access_token, refresh_token,
                 token_expires_at, account_kind, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
            RETURNING id, brand_id, username, account_id, access_token, refresh_token,
                      token_expires_at, account_kind, is_active, last_synced_at, last_error
            "#,
        )
        .bind(&account.brand_id)
        .bind(&account.username)
        .bind(&account.account_id)
        .bind(&account.access_token)
        .bind(&account.refresh_token)
        .bind(account.token_expires_at)
        .bind(&account.account_kind)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn get_account(&self, account_id: i64) -> Result<Option<SocialAccount>> {
        let account =
            sqlx::query_as::<_, SocialAccount>(&format!("{SELECT_ACCOUNT} WHERE id = $1"))
                .bind(account_id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(account)
    }

    async fn list_active_accounts(&self, brand_id: &str) -> Result<Vec<SocialAccount>> {
        let accounts = sqlx::query_as::<_, SocialAccount>(&format!(
            "{SELECT_ACCOUNT} WHERE brand_id = $1 AND is_active ORDER BY id ASC"
        ))
        .bind(brand_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(accounts)
    }

    async fn deactivate_account(&self, account_id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE social_accounts SET is_active = FALSE WHERE id = $1")
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
            SET access_token = $1,
                refresh_token = COALESCE($2, refresh_token),
                token_expires_at = $3,
                last_error = NULL
            WHERE id = $4
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
            "UPDATE social_accounts SET last_synced_at = $1, last_error = NULL WHERE id = $2",
        )
        .bind(synced_at)
        .bind(account_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn record_account_error(&self, account_id: i64, error: &str) -> Result<()> {
        sqlx::query("UPDATE social_accounts SET last_error = $1 WHERE id = $2")
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
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
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
            "SELECT COUNT(*) FROM content_records WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }
}
