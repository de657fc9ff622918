use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{Code, Store, StoreAttributes, User};
use crate::db::repository::{CodeRepo, StoreRepo, UserRepo};
use crate::error::DatabaseError;
use crate::Result;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    stores: HashMap<Uuid, Store>,
    favorites: HashSet<(Uuid, Uuid)>,
    codes: HashMap<Uuid, Code>,
}

/// In-process repository for development runs and tests.
///
/// All tables sit behind one lock, so every conditional update is atomic with
/// respect to other requests.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_stores<'a>(stores: impl Iterator<Item = &'a Store>, by_name: bool) -> Vec<Store> {
    let mut stores: Vec<Store> = stores.cloned().collect();
    if by_name {
        stores.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    } else {
        stores.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    }
    stores
}

#[async_trait]
impl UserRepo for MemoryRepository {
    async fn insert_user(&self, user: &User) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) || tables.users.contains_key(&user.id) {
            return Err(DatabaseError::Duplicate.into());
        }
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn add_favorite(&self, user_id: Uuid, store_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) || !tables.stores.contains_key(&store_id) {
            return Err(DatabaseError::QueryError("favorite references a missing user or store".into()).into());
        }
        tables.favorites.insert((user_id, store_id));
        Ok(())
    }

    async fn remove_favorite(&self, user_id: Uuid, store_id: Uuid) -> Result<bool> {
        Ok(self.tables.write().await.favorites.remove(&(user_id, store_id)))
    }

    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<Store>> {
        let tables = self.tables.read().await;
        let favorites = tables
            .favorites
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, store)| tables.stores.get(store));
        Ok(sorted_stores(favorites, true))
    }
}

#[async_trait]
impl StoreRepo for MemoryRepository {
    async fn insert_store(&self, store: &Store) -> Result<Store> {
        let mut tables = self.tables.write().await;
        if tables.stores.contains_key(&store.id) {
            return Err(DatabaseError::Duplicate.into());
        }
        if !tables.users.contains_key(&store.owner_id) {
            return Err(DatabaseError::QueryError("store owner does not exist".into()).into());
        }
        tables.stores.insert(store.id, store.clone());
        Ok(store.clone())
    }

    async fn find_store(&self, id: Uuid) -> Result<Option<Store>> {
        Ok(self.tables.read().await.stores.get(&id).cloned())
    }

    async fn list_stores(&self) -> Result<Vec<Store>> {
        let tables = self.tables.read().await;
        Ok(sorted_stores(tables.stores.values(), false))
    }

    async fn update_store(&self, id: Uuid, attributes: &StoreAttributes) -> Result<Option<Store>> {
        let mut tables = self.tables.write().await;
        Ok(tables.stores.get_mut(&id).map(|store| {
            store.apply(attributes.clone());
            store.clone()
        }))
    }

    async fn delete_store(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.stores.remove(&id).is_none() {
            return Ok(false);
        }
        tables.codes.retain(|_, code| code.store_id != id);
        tables.favorites.retain(|(_, store)| *store != id);
        Ok(true)
    }
}

#[async_trait]
impl CodeRepo for MemoryRepository {
    async fn insert_code(&self, code: &Code) -> Result<Code> {
        let mut tables = self.tables.write().await;
        if tables.codes.contains_key(&code.token) {
            return Err(DatabaseError::Duplicate.into());
        }
        if !tables.users.contains_key(&code.user_id) || !tables.stores.contains_key(&code.store_id) {
            return Err(DatabaseError::QueryError("code references a missing user or store".into()).into());
        }
        tables.codes.insert(code.token, code.clone());
        Ok(code.clone())
    }

    async fn find_code(&self, token: Uuid) -> Result<Option<Code>> {
        Ok(self.tables.read().await.codes.get(&token).cloned())
    }

    async fn list_codes_for_user(&self, user_id: Uuid) -> Result<Vec<Code>> {
        let tables = self.tables.read().await;
        let mut codes: Vec<Code> = tables
            .codes
            .values()
            .filter(|code| code.user_id == user_id)
            .cloned()
            .collect();
        codes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.token.cmp(&b.token)));
        Ok(codes)
    }

    async fn mark_checked_in(&self, token: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.codes.get_mut(&token) {
            Some(code) if !code.in_store => {
                code.in_store = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_checked_in(&self, token: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.codes.get(&token).is_some_and(|code| code.in_store) {
            tables.codes.remove(&token);
            return Ok(true);
        }
        Ok(false)
    }

    async fn count_checked_in(&self, store_id: Uuid) -> Result<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .codes
            .values()
            .filter(|code| code.store_id == store_id && code.in_store)
            .count();
        Ok(count as i64)
    }
}
