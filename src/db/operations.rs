use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::db::models::{Code, Store, StoreAttributes, User};
use crate::db::repository::{CodeRepo, StoreRepo, UserRepo};
use crate::error::{AppError, DatabaseError};
use crate::Result;

const USER_COLUMNS: &str = "id, username, password_hash, is_store_owner, is_vaccinated, created_at";
const STORE_COLUMNS: &str = "id, name, phone, safety_policy, location, store_hours, owner_id, created_at";
const CODE_COLUMNS: &str = "token, user_id, store_id, in_store, created_at";

/// PostgreSQL-backed repository.
pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| AppError::DatabaseError(DatabaseError::ConnectionError(e.to_string())))?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserRepo for DbOperations {
    async fn insert_user(&self, user: &User) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, password_hash, is_store_owner, is_vaccinated, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_store_owner)
        .bind(user.is_vaccinated)
        .bind(user.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
            .bind(username)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(user)
    }

    async fn add_favorite(&self, user_id: Uuid, store_id: Uuid) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_favorites (user_id, store_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(store_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn remove_favorite(&self, user_id: Uuid, store_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND store_id = $2")
            .bind(user_id)
            .bind(store_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(
            r#"
            SELECT s.id, s.name, s.phone, s.safety_policy, s.location, s.store_hours, s.owner_id, s.created_at
            FROM stores s
            JOIN user_favorites f ON f.store_id = s.id
            WHERE f.user_id = $1
            ORDER BY s.name, s.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(stores)
    }
}

#[async_trait]
impl StoreRepo for DbOperations {
    async fn insert_store(&self, store: &Store) -> Result<Store> {
        let store = sqlx::query_as::<_, Store>(&format!(
            r#"
            INSERT INTO stores (id, name, phone, safety_policy, location, store_hours, owner_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(store.id)
        .bind(&store.name)
        .bind(&store.phone)
        .bind(&store.safety_policy)
        .bind(&store.location)
        .bind(&store.store_hours)
        .bind(store.owner_id)
        .bind(store.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(store)
    }

    async fn find_store(&self, id: Uuid) -> Result<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(&format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(store)
    }

    async fn list_stores(&self) -> Result<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores ORDER BY created_at, id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(stores)
    }

    async fn update_store(&self, id: Uuid, attributes: &StoreAttributes) -> Result<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(&format!(
            r#"
            UPDATE stores
            SET name = $2, phone = $3, safety_policy = $4, location = $5, store_hours = $6
            WHERE id = $1
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&attributes.name)
        .bind(&attributes.phone)
        .bind(&attributes.safety_policy)
        .bind(&attributes.location)
        .bind(&attributes.store_hours)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(store)
    }

    async fn delete_store(&self, id: Uuid) -> Result<bool> {
        // codes and user_favorites cascade
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CodeRepo for DbOperations {
    async fn insert_code(&self, code: &Code) -> Result<Code> {
        let code = sqlx::query_as::<_, Code>(&format!(
            r#"
            INSERT INTO codes (token, user_id, store_id, in_store, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CODE_COLUMNS}
            "#
        ))
        .bind(code.token)
        .bind(code.user_id)
        .bind(code.store_id)
        .bind(code.in_store)
        .bind(code.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(code)
    }

    async fn find_code(&self, token: Uuid) -> Result<Option<Code>> {
        let code = sqlx::query_as::<_, Code>(&format!("SELECT {CODE_COLUMNS} FROM codes WHERE token = $1"))
            .bind(token)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(code)
    }

    async fn list_codes_for_user(&self, user_id: Uuid) -> Result<Vec<Code>> {
        let codes = sqlx::query_as::<_, Code>(&format!(
            "SELECT {CODE_COLUMNS} FROM codes WHERE user_id = $1 ORDER BY created_at, token"
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(codes)
    }

    async fn mark_checked_in(&self, token: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE codes SET in_store = TRUE WHERE token = $1 AND in_store = FALSE")
            .bind(token)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_checked_in(&self, token: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM codes WHERE token = $1 AND in_store = TRUE")
            .bind(token)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_checked_in(&self, store_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM codes WHERE store_id = $1 AND in_store = TRUE")
            .bind(store_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
