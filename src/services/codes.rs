//! Check-in code lifecycle.
//!
//! A code moves ISSUED -> CHECKED_IN -> deleted, one step per [`CodeService::toggle`].
//! Each step is a conditional write in the repository, so two requests racing
//! on the same token cannot both apply the same transition.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::models::{Code, Store, User};
use crate::db::repository::CodeRepo;
use crate::error::AppError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckinStatus {
    Enter,
    Exit,
}

/// Parses a token from a URL segment. Anything that is not a UUID cannot name
/// an existing code, so it is reported as not found.
pub fn parse_token(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("code {}", raw)))
}

pub struct CodeService {
    codes: Arc<dyn CodeRepo>,
}

impl CodeService {
    pub fn new(codes: Arc<dyn CodeRepo>) -> Self {
        Self { codes }
    }

    pub async fn issue(&self, user: &User, store: &Store) -> Result<Uuid> {
        let code = self.codes.insert_code(&Code::issue(user.id, store.id)).await?;
        info!(store_id = %store.id, user_id = %user.id, "Issued check-in code");
        Ok(code.token)
    }

    pub async fn toggle(&self, token: Uuid) -> Result<CheckinStatus> {
        let code = self
            .codes
            .find_code(token)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("code {}", token)))?;

        if !code.in_store {
            if self.codes.mark_checked_in(token).await? {
                info!(store_id = %code.store_id, "Code {} entered", token);
                return Ok(CheckinStatus::Enter);
            }
        } else if self.codes.delete_checked_in(token).await? {
            info!(store_id = %code.store_id, "Code {} exited", token);
            return Ok(CheckinStatus::Exit);
        }

        warn!("Concurrent toggle on code {}", token);
        Err(AppError::Conflict(format!("code {} was toggled concurrently", token)))
    }

    pub async fn list_for_user(&self, user: &User) -> Result<Vec<Code>> {
        self.codes.list_codes_for_user(user.id).await
    }
}
