use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_store_owner: bool,
    pub is_vaccinated: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password_hash: String, is_store_owner: bool, is_vaccinated: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            is_store_owner,
            is_vaccinated,
            created_at: Utc::now(),
        }
    }
}

/// Editable store attributes, as submitted on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreAttributes {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub safety_policy: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub store_hours: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub safety_policy: String,
    pub location: String,
    pub store_hours: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn new(owner_id: Uuid, attributes: StoreAttributes) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: attributes.name,
            phone: attributes.phone,
            safety_policy: attributes.safety_policy,
            location: attributes.location,
            store_hours: attributes.store_hours,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Overwrites the editable attributes; id, owner and creation time stay fixed.
    pub fn apply(&mut self, attributes: StoreAttributes) {
        self.name = attributes.name;
        self.phone = attributes.phone;
        self.safety_policy = attributes.safety_policy;
        self.location = attributes.location;
        self.store_hours = attributes.store_hours;
    }
}

/// A single-use check-in token linking a user to a store visit.
///
/// `in_store` starts out false, flips to true on entry, and the record is
/// deleted on exit. A token is never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Code {
    pub token: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub in_store: bool,
    pub created_at: DateTime<Utc>,
}

impl Code {
    pub fn issue(user_id: Uuid, store_id: Uuid) -> Self {
        Self {
            token: Uuid::new_v4(),
            user_id,
            store_id,
            in_store: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("alice".into(), "secret-hash".into(), false, true);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["is_vaccinated"], true);
    }

    #[test]
    fn test_issued_code_starts_outside() {
        let code = Code::issue(Uuid::new_v4(), Uuid::new_v4());
        assert!(!code.in_store);
        assert_eq!(code.token.get_version_num(), 4);
    }

    #[test]
    fn test_apply_keeps_owner() {
        let owner = Uuid::new_v4();
        let mut store = Store::new(owner, StoreAttributes { name: "Corner Shop".into(), ..Default::default() });
        let id = store.id;
        store.apply(StoreAttributes { name: "Renamed".into(), phone: "555-0100".into(), ..Default::default() });
        assert_eq!(store.id, id);
        assert_eq!(store.owner_id, owner);
        assert_eq!(store.name, "Renamed");
        assert_eq!(store.phone, "555-0100");
    }
}
