//! Store registration and maintenance.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::models::{Store, StoreAttributes, User};
use crate::db::repository::StoreRepo;
use crate::error::AppError;
use crate::Result;

pub struct StoreService {
    stores: Arc<dyn StoreRepo>,
}

fn validate(attributes: &StoreAttributes) -> Result<()> {
    if attributes.name.trim().is_empty() {
        return Err(AppError::ValidationError("store name must not be empty".into()));
    }
    Ok(())
}

impl StoreService {
    pub fn new(stores: Arc<dyn StoreRepo>) -> Self {
        Self { stores }
    }

    /// Only store owners may register a store; anyone else gets `Unauthorized`.
    pub fn authorize_create(&self, user: &User) -> Result<()> {
        if !user.is_store_owner {
            warn!(user_id = %user.id, "Non-owner attempted to create a store");
            return Err(AppError::Unauthorized("Unauthorized".into()));
        }
        Ok(())
    }

    pub async fn create(&self, owner: &User, attributes: StoreAttributes) -> Result<Store> {
        self.authorize_create(owner)?;
        validate(&attributes)?;

        let store = self.stores.insert_store(&Store::new(owner.id, attributes)).await?;
        info!(store_id = %store.id, owner_id = %owner.id, "Created store {}", store.name);
        Ok(store)
    }

    pub async fn get(&self, id: Uuid) -> Result<Store> {
        self.stores
            .find_store(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("store {}", id)))
    }

    pub async fn list(&self) -> Result<Vec<Store>> {
        self.stores.list_stores().await
    }

    pub async fn update(&self, caller: &User, id: Uuid, attributes: StoreAttributes) -> Result<Store> {
        let store = self.get(id).await?;
        if store.owner_id != caller.id {
            return Err(AppError::Forbidden(format!("store {} belongs to another owner", id)));
        }
        validate(&attributes)?;

        self.stores
            .update_store(id, &attributes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("store {}", id)))
    }

    pub async fn delete(&self, caller: &User, id: Uuid) -> Result<()> {
        let store = self.get(id).await?;
        if store.owner_id != caller.id {
            return Err(AppError::Forbidden(format!("store {} belongs to another owner", id)));
        }

        if !self.stores.delete_store(id).await? {
            return Err(AppError::NotFound(format!("store {}", id)));
        }
        info!(store_id = %id, "Deleted store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{MockStoreRepo, UserRepo};
    use crate::db::MemoryRepository;

    fn attributes(name: &str) -> StoreAttributes {
        StoreAttributes {
            name: name.into(),
            phone: "555-0199".into(),
            safety_policy: "Masks required".into(),
            location: "12 High St".into(),
            store_hours: "9-5".into(),
        }
    }

    #[tokio::test]
    async fn test_non_owner_never_writes() {
        let mut mock = MockStoreRepo::new();
        mock.expect_insert_store().never();

        let service = StoreService::new(Arc::new(mock));
        let visitor = User::new("visitor".into(), "hash".into(), false, true);

        let err = service.create(&visitor, attributes("Cafe")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_authorize_create() {
        let service = StoreService::new(Arc::new(MockStoreRepo::new()));
        let visitor = User::new("visitor".into(), "hash".into(), false, true);
        let owner = User::new("owner".into(), "hash".into(), true, true);

        assert!(matches!(
            service.authorize_create(&visitor),
            Err(AppError::Unauthorized(msg)) if msg == "Unauthorized"
        ));
        assert!(service.authorize_create(&owner).is_ok());
    }

    #[tokio::test]
    async fn test_owner_creates_store() {
        let repo = Arc::new(MemoryRepository::new());
        let owner = repo
            .insert_user(&User::new("owner".into(), "hash".into(), true, true))
            .await
            .unwrap();
        let service = StoreService::new(repo);

        let store = service.create(&owner, attributes("Cafe")).await.unwrap();
        assert_eq!(store.owner_id, owner.id);
        assert_eq!(store.safety_policy, "Masks required");
        assert_eq!(service.get(store.id).await.unwrap(), store);
        assert_eq!(service.list().await.unwrap(), vec![store]);
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let repo = Arc::new(MemoryRepository::new());
        let owner = repo
            .insert_user(&User::new("owner".into(), "hash".into(), true, true))
            .await
            .unwrap();
        let service = StoreService::new(repo);

        let err = service.create(&owner, attributes("  ")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_owner_updates_and_deletes() {
        let repo = Arc::new(MemoryRepository::new());
        let owner = repo
            .insert_user(&User::new("owner".into(), "hash".into(), true, true))
            .await
            .unwrap();
        let rival = repo
            .insert_user(&User::new("rival".into(), "hash".into(), true, true))
            .await
            .unwrap();
        let service = StoreService::new(repo);
        let store = service.create(&owner, attributes("Cafe")).await.unwrap();

        let err = service.update(&rival, store.id, attributes("Taken")).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let err = service.delete(&rival, store.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let updated = service.update(&owner, store.id, attributes("Bistro")).await.unwrap();
        assert_eq!(updated.name, "Bistro");
        assert_eq!(updated.owner_id, owner.id);

        service.delete(&owner, store.id).await.unwrap();
        let err = service.get(store.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
