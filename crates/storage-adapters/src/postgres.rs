//! # Postgres store
//!
//! Maps the relational model in `migrations/` onto the domain models.
//! Queries are runtime-checked so the crate builds without a live database.

use async_trait::async_trait;
use chrono::Utc;
use domains::{
    AccountRegistrar, FeedScope, Message, MessageRepository, NewAccount, PreferenceRecord,
    PreferenceRepository, Registration, User, UserDirectory,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

const SCHEMA: &str = include_str!("../migrations/0001_init.sql");

const MESSAGE_COLUMNS: &str = "id, author_id, body, created_at, parent_id";
const USER_COLUMNS: &str =
    "id, username, display_username, name, email, email_verified, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the schema. Every statement is idempotent.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("database schema is up to date");
        Ok(())
    }

    /// Writes an identity row as-is. Used by seeding and tests.
    pub async fn insert_user(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, display_username, name, email, email_verified, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.display_username)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.email_verified)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_message(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn scope_author(scope: FeedScope) -> Option<Uuid> {
    match scope {
        FeedScope::All => None,
        FeedScope::Author(id) => Some(id),
    }
}

fn message_from_row(row: &PgRow) -> anyhow::Result<Message> {
    Ok(Message {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        body: row.try_get("body")?,
        created_at: row.try_get("created_at")?,
        parent_id: row.try_get("parent_id")?,
    })
}

fn user_from_row(row: &PgRow) -> anyhow::Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        display_username: row.try_get("display_username")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        email_verified: row.try_get("email_verified")?,
        created_at: row.try_get("created_at")?,
    })
}

fn preferences_from_row(row: &PgRow) -> anyhow::Result<PreferenceRecord> {
    Ok(PreferenceRecord {
        user_id: row.try_get("user_id")?,
        ignored_user_ids: row.try_get("ignored_user_ids")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl MessageRepository for PgStore {
    async fn insert_message(&self, message: Message) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO messages (id, author_id, body, created_at, parent_id)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(message.id)
        .bind(message.author_id)
        .bind(&message.body)
        .bind(message.created_at)
        .bind(message.parent_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_message(&self, id: Uuid) -> anyhow::Result<Option<Message>> {
        let row = sqlx::query(&format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(message_from_row).transpose()
    }

    async fn get_messages(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Message>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ANY($1)"
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(message_from_row).collect()
    }

    async fn list_messages(
        &self,
        scope: FeedScope,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE ($1::uuid IS NULL OR author_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(scope_author(scope))
        .bind(i64::try_from(limit)?)
        .bind(i64::try_from(offset)?)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(message_from_row).collect()
    }

    async fn count_messages(&self, scope: FeedScope) -> anyhow::Result<u64> {
        let total: i64 = sqlx::query(
            "SELECT COUNT(*) AS total FROM messages WHERE ($1::uuid IS NULL OR author_id = $1)",
        )
        .bind(scope_author(scope))
        .fetch_one(&self.pool)
        .await?
        .try_get("total")?;
        Ok(u64::try_from(total)?)
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(username) = lower($1)"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"))
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn find_by_usernames(&self, usernames: &[String]) -> anyhow::Result<Vec<User>> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }
        let folded: Vec<String> = usernames.iter().map(|name| name.to_lowercase()).collect();
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(username) = ANY($1)"
        ))
        .bind(folded)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(user_from_row).collect()
    }
}

#[async_trait]
impl PreferenceRepository for PgStore {
    async fn get_preferences(&self, user_id: Uuid) -> anyhow::Result<Option<PreferenceRecord>> {
        let row = sqlx::query(
            "SELECT user_id, ignored_user_ids, updated_at FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(preferences_from_row).transpose()
    }

    async fn create_if_absent(&self, record: PreferenceRecord) -> anyhow::Result<PreferenceRecord> {
        sqlx::query(
            "INSERT INTO user_preferences (user_id, ignored_user_ids, updated_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(record.user_id)
        .bind(&record.ignored_user_ids)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        // Another request may have won the insert; return whatever is stored.
        match self.get_preferences(record.user_id).await? {
            Some(stored) => Ok(stored),
            None => anyhow::bail!("preferences for {} vanished after insert", record.user_id),
        }
    }

    async fn upsert_preferences(&self, record: PreferenceRecord) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO user_preferences (user_id, ignored_user_ids, updated_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id)
             DO UPDATE SET ignored_user_ids = EXCLUDED.ignored_user_ids,
                           updated_at = EXCLUDED.updated_at",
        )
        .bind(record.user_id)
        .bind(&record.ignored_user_ids)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AccountRegistrar for PgStore {
    async fn register_account(&self, account: NewAccount) -> anyhow::Result<Registration> {
        let inserted = sqlx::query(&format!(
            "INSERT INTO users (id, username, name, email, email_verified, created_at)
             VALUES ($1, $2, $2, $3, FALSE, $4)
             ON CONFLICT DO NOTHING
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(&account.username)
        .bind(&account.email)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok(Registration::Created(user_from_row(&row)?));
        }
        // A unique index refused the row; find out which one.
        if self.find_by_username(&account.username).await?.is_some() {
            Ok(Registration::UsernameTaken)
        } else {
            Ok(Registration::EmailTaken)
        }
    }
}
