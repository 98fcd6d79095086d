use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{require_non_empty, Patch, ServiceResult};
use crate::auth::{ensure_can_mutate, Authorizer, Credentials, MutationRule};
use crate::database::models::Board;
use crate::database::{Repository, Versioned};
use crate::search;

#[derive(Debug, Clone, Deserialize)]
pub struct NewBoard {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub rules: String,
    #[serde(default)]
    pub moderators: Vec<Uuid>,
}

/// Ownership is not transferable through a patch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardPatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub rules: Option<String>,
    pub moderators: Option<Vec<Uuid>>,
}

#[derive(Clone)]
pub struct BoardService {
    boards: Repository<Board>,
    authorizer: Authorizer,
    max_search_terms: usize,
}

impl BoardService {
    pub fn new(boards: Repository<Board>, authorizer: Authorizer, max_search_terms: usize) -> Self {
        Self {
            boards,
            authorizer,
            max_search_terms,
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Board>> {
        Ok(self.boards.list().await?.into_iter().map(Versioned::into_inner).collect())
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Board> {
        Ok(self.boards.get_404(id).await?.into_inner())
    }

    pub async fn search(&self, terms: &[(String, String)]) -> ServiceResult<Vec<Board>> {
        let found = search::search(&self.boards, terms, self.max_search_terms).await?;
        Ok(found.into_iter().map(Versioned::into_inner).collect())
    }

    /// Any authenticated user may open a board and becomes its owner
    pub async fn create(&self, new_board: NewBoard, requester: &Credentials) -> ServiceResult<Board> {
        let actor = self.authorizer.authenticate(requester).await?;
        require_non_empty("name", &new_board.name)?;

        let board = Board {
            id: Uuid::new_v4(),
            name: new_board.name,
            bio: new_board.bio,
            rules: new_board.rules,
            moderators: new_board.moderators,
            owner: actor.id(),
        };
        let created = self.boards.insert(&board).await?;
        info!(board_id = %created.id, owner = %actor.id(), "board created");
        Ok(created.into_inner())
    }

    pub async fn update(&self, id: Uuid, changes: BoardPatch, requester: &Credentials) -> ServiceResult<Board> {
        let actor = self.authorizer.authenticate(requester).await?;
        let board = self.boards.get_404(id).await?;
        ensure_can_mutate(&*board, Some(&*board), &actor, MutationRule::OwnerOrBoardRoleOrAdmin)?;

        if let Some(name) = &changes.name {
            require_non_empty("name", name)?;
        }

        let mut patch = Patch::default();
        patch.set("name", changes.name)?;
        patch.set("bio", changes.bio)?;
        patch.set("rules", changes.rules)?;
        patch.set("moderators", changes.moderators)?;
        if patch.is_empty() {
            return Ok(board.into_inner());
        }

        let updated = self.boards.update(&board, patch.into_inner()).await?;
        info!(board_id = %id, by = %actor.id(), "board updated");
        Ok(updated.into_inner())
    }

    pub async fn delete(&self, id: Uuid, requester: &Credentials) -> ServiceResult<()> {
        let actor = self.authorizer.authenticate(requester).await?;
        let board = self.boards.get_404(id).await?;
        ensure_can_mutate(&*board, Some(&*board), &actor, MutationRule::OwnerOrBoardRoleOrAdmin)?;

        self.boards.delete(&board).await?;
        info!(board_id = %id, by = %actor.id(), "board deleted");
        Ok(())
    }
}
