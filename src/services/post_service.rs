use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{require_non_empty, Patch, ServiceError, ServiceResult};
use crate::auth::{ensure_can_mutate, Authorizer, Credentials, MutationRule};
use crate::database::models::{Board, ContentType, Post};
use crate::database::{Repository, Versioned};
use crate::search::{self, SearchError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    #[serde(default)]
    pub body_type: ContentType,
    #[serde(default)]
    pub body_content: String,
}

/// Author and parent board are fixed at creation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub title: Option<String>,
    pub body_type: Option<ContentType>,
    pub body_content: Option<String>,
    pub votes: Option<i64>,
}

#[derive(Clone)]
pub struct PostService {
    posts: Repository<Post>,
    boards: Repository<Board>,
    authorizer: Authorizer,
    max_search_terms: usize,
}

impl PostService {
    pub fn new(
        posts: Repository<Post>,
        boards: Repository<Board>,
        authorizer: Authorizer,
        max_search_terms: usize,
    ) -> Self {
        Self {
            posts,
            boards,
            authorizer,
            max_search_terms,
        }
    }

    /// Fetches a post through its board, treating a board mismatch as absence
    pub(crate) async fn fetch(&self, board_id: Uuid, post_id: Uuid) -> ServiceResult<Versioned<Post>> {
        let post = self.posts.get_404(post_id).await?;
        if post.board != board_id {
            return Err(ServiceError::NotFound(format!("post {} not found on board {}", post_id, board_id)));
        }
        Ok(post)
    }

    pub async fn list(&self, board_id: Uuid) -> ServiceResult<Vec<Post>> {
        self.boards.get_404(board_id).await?;
        Ok(self
            .posts
            .find_by("board", board_id)
            .await?
            .into_iter()
            .map(Versioned::into_inner)
            .collect())
    }

    pub async fn get(&self, board_id: Uuid, post_id: Uuid) -> ServiceResult<Post> {
        Ok(self.fetch(board_id, post_id).await?.into_inner())
    }

    /// Searches posts, keeping only those on `board_id`
    pub async fn search(&self, board_id: Uuid, terms: &[(String, String)]) -> ServiceResult<Vec<Post>> {
        let found: Vec<Post> = search::search(&self.posts, terms, self.max_search_terms)
            .await?
            .into_iter()
            .map(Versioned::into_inner)
            .filter(|post| post.board == board_id)
            .collect();
        if found.is_empty() {
            return Err(SearchError::NoMatches("posts").into());
        }
        Ok(found)
    }

    /// The author is always the authenticated requester
    pub async fn create(&self, board_id: Uuid, new_post: NewPost, requester: &Credentials) -> ServiceResult<Post> {
        let actor = self.authorizer.authenticate(requester).await?;
        require_non_empty("title", &new_post.title)?;
        self.boards.get_404(board_id).await?;

        let post = Post {
            id: Uuid::new_v4(),
            title: new_post.title,
            body_type: new_post.body_type,
            body_content: new_post.body_content,
            votes: 0,
            author: actor.id(),
            board: board_id,
        };
        let created = self.posts.insert(&post).await?;
        info!(post_id = %created.id, %board_id, author = %actor.id(), "post created");
        Ok(created.into_inner())
    }

    pub async fn update(
        &self,
        board_id: Uuid,
        post_id: Uuid,
        changes: PostPatch,
        requester: &Credentials,
    ) -> ServiceResult<Post> {
        let actor = self.authorizer.authenticate(requester).await?;
        let board = self.boards.get_404(board_id).await?;
        let post = self.fetch(board_id, post_id).await?;
        ensure_can_mutate(&*post, Some(&*board), &actor, MutationRule::OwnerOrBoardRoleOrAdmin)?;

        if let Some(title) = &changes.title {
            require_non_empty("title", title)?;
        }

        let mut patch = Patch::default();
        patch.set("title", changes.title)?;
        patch.set("bodyType", changes.body_type)?;
        patch.set("bodyContent", changes.body_content)?;
        patch.set("votes", changes.votes)?;
        if patch.is_empty() {
            return Ok(post.into_inner());
        }

        let updated = self.posts.update(&post, patch.into_inner()).await?;
        info!(%post_id, by = %actor.id(), "post updated");
        Ok(updated.into_inner())
    }

    pub async fn delete(&self, board_id: Uuid, post_id: Uuid, requester: &Credentials) -> ServiceResult<()> {
        let actor = self.authorizer.authenticate(requester).await?;
        let board = self.boards.get_404(board_id).await?;
        let post = self.fetch(board_id, post_id).await?;
        ensure_can_mutate(&*post, Some(&*board), &actor, MutationRule::OwnerOrBoardRoleOrAdmin)?;

        self.posts.delete(&post).await?;
        info!(%post_id, by = %actor.id(), "post deleted");
        Ok(())
    }
}
