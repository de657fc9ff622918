use std::sync::Arc;

use crate::db::models::Store;
use crate::db::repository::CodeRepo;
use crate::Result;

/// Live count of visitors currently inside a store. Never cached.
pub struct OccupancyService {
    codes: Arc<dyn CodeRepo>,
}

impl OccupancyService {
    pub fn new(codes: Arc<dyn CodeRepo>) -> Self {
        Self { codes }
    }

    pub async fn count_checked_in(&self, store: &Store) -> Result<i64> {
        self.codes.count_checked_in(store.id).await
    }
}
