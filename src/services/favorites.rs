use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::db::models::{Store, User};
use crate::db::repository::UserRepo;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteChange {
    Add,
    Remove,
}

pub struct FavoritesService {
    users: Arc<dyn UserRepo>,
}

impl FavoritesService {
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        Self { users }
    }

    /// Flips membership of `store` in the user's favorites.
    pub async fn toggle(&self, user: &User, store: &Store) -> Result<FavoriteChange> {
        let change = if self.users.remove_favorite(user.id, store.id).await? {
            FavoriteChange::Remove
        } else {
            self.users.add_favorite(user.id, store.id).await?;
            FavoriteChange::Add
        };

        info!(user_id = %user.id, store_id = %store.id, ?change, "Toggled favorite");
        Ok(change)
    }

    pub async fn list(&self, user: &User) -> Result<Vec<Store>> {
        self.users.list_favorites(user.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::StoreAttributes;
    use crate::db::repository::StoreRepo;
    use crate::db::MemoryRepository;

    async fn fixture() -> (Arc<MemoryRepository>, User, Store, Store) {
        let repo = Arc::new(MemoryRepository::new());
        let user = repo
            .insert_user(&User::new("shopper".into(), "hash".into(), true, false))
            .await
            .unwrap();
        let mut stores = Vec::new();
        for name in ["Grocer", "Bookshop"] {
            stores.push(
                repo.insert_store(&Store::new(user.id, StoreAttributes { name: name.into(), ..Default::default() }))
                    .await
                    .unwrap(),
            );
        }
        let second = stores.pop().unwrap();
        let first = stores.pop().unwrap();
        (repo, user, first, second)
    }

    #[test_log::test(tokio::test)]
    async fn test_toggle_twice_restores_set() {
        let (repo, user, grocer, _) = fixture().await;
        let favorites = FavoritesService::new(repo);

        let before = favorites.list(&user).await.unwrap();
        assert_eq!(favorites.toggle(&user, &grocer).await.unwrap(), FavoriteChange::Add);
        assert_eq!(favorites.list(&user).await.unwrap(), vec![grocer.clone()]);
        assert_eq!(favorites.toggle(&user, &grocer).await.unwrap(), FavoriteChange::Remove);
        assert_eq!(favorites.list(&user).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_favorites_are_independent_per_store() {
        let (repo, user, grocer, bookshop) = fixture().await;
        let favorites = FavoritesService::new(repo);

        favorites.toggle(&user, &grocer).await.unwrap();
        favorites.toggle(&user, &bookshop).await.unwrap();
        favorites.toggle(&user, &grocer).await.unwrap();

        assert_eq!(favorites.list(&user).await.unwrap(), vec![bookshop]);
    }

    #[test]
    fn test_change_serialization() {
        assert_eq!(serde_json::to_value(FavoriteChange::Add).unwrap(), "add");
        assert_eq!(serde_json::to_value(FavoriteChange::Remove).unwrap(), "remove");
    }
}
