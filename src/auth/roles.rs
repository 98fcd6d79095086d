// auth/roles.rs - Role Classifier
//
// Moderation is scoped to a board's moderator list. Administrator membership
// is persisted in its own collection and keyed by user id, so profile edits
// never affect it.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::database::models::{AdminGrant, Board};
use crate::database::{Repository, StoreError};

pub fn is_moderator(board: &Board, user_id: Uuid) -> bool {
    board.moderators.contains(&user_id)
}

#[derive(Clone)]
pub struct AdminRegistry {
    grants: Repository<AdminGrant>,
}

impl AdminRegistry {
    pub fn new(grants: Repository<AdminGrant>) -> Self {
        Self { grants }
    }

    pub async fn is_administrator(&self, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.grants.find(user_id).await?.is_some())
    }

    /// Returns false when the user already held the role
    pub async fn grant(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let grant = AdminGrant {
            user_id,
            granted_at: Utc::now(),
        };
        match self.grants.insert(&grant).await {
            Ok(_) => {
                info!(%user_id, "administrator granted");
                Ok(true)
            }
            Err(StoreError::DuplicateKey { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Returns false when the user was not an administrator
    pub async fn revoke(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let Some(grant) = self.grants.find(user_id).await? else {
            return Ok(false);
        };
        match self.grants.delete(&grant).await {
            Ok(()) => {
                info!(%user_id, "administrator revoked");
                Ok(true)
            }
            // Revoked concurrently by someone else
            Err(StoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn list(&self) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .grants
            .list()
            .await?
            .into_iter()
            .map(|grant| grant.user_id)
            .collect())
    }
}
