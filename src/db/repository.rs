//! Typed persistence interface, one trait per entity.
//!
//! Services depend on the narrowest trait they need so each can be mocked on
//! its own. `DbOperations` and `MemoryRepository` implement all three.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{Code, Store, StoreAttributes, User};
use crate::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `DatabaseError::Duplicate` when the username is taken.
    async fn insert_user(&self, user: &User) -> Result<User>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Adds the store to the user's favorites. Adding an existing favorite is a no-op.
    async fn add_favorite(&self, user_id: Uuid, store_id: Uuid) -> Result<()>;

    /// Returns whether a favorite was actually removed.
    async fn remove_favorite(&self, user_id: Uuid, store_id: Uuid) -> Result<bool>;

    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<Store>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreRepo: Send + Sync {
    async fn insert_store(&self, store: &Store) -> Result<Store>;

    async fn find_store(&self, id: Uuid) -> Result<Option<Store>>;

    async fn list_stores(&self) -> Result<Vec<Store>>;

    /// Returns `None` when no store has this id.
    async fn update_store(&self, id: Uuid, attributes: &StoreAttributes) -> Result<Option<Store>>;

    /// Removes the store together with its codes and favorite memberships.
    async fn delete_store(&self, id: Uuid) -> Result<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeRepo: Send + Sync {
    async fn insert_code(&self, code: &Code) -> Result<Code>;

    async fn find_code(&self, token: Uuid) -> Result<Option<Code>>;

    async fn list_codes_for_user(&self, user_id: Uuid) -> Result<Vec<Code>>;

    /// Sets `in_store` only if it is currently false. Returns whether the row changed.
    async fn mark_checked_in(&self, token: Uuid) -> Result<bool>;

    /// Deletes the code only if it is currently checked in. Returns whether a row was deleted.
    async fn delete_checked_in(&self, token: Uuid) -> Result<bool>;

    async fn count_checked_in(&self, store_id: Uuid) -> Result<i64>;
}
