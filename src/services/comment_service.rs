use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{require_non_empty, Patch, PostService, ServiceError, ServiceResult};
use crate::auth::{ensure_can_mutate, Authorizer, Credentials, MutationRule};
use crate::database::models::{Board, Comment};
use crate::database::{Repository, Versioned};

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPatch {
    pub body: Option<String>,
    pub votes: Option<i64>,
}

/// Comments are moderated by the board their post lives on
#[derive(Clone)]
pub struct CommentService {
    comments: Repository<Comment>,
    boards: Repository<Board>,
    posts: PostService,
    authorizer: Authorizer,
}

impl CommentService {
    pub fn new(
        comments: Repository<Comment>,
        boards: Repository<Board>,
        posts: PostService,
        authorizer: Authorizer,
    ) -> Self {
        Self {
            comments,
            boards,
            posts,
            authorizer,
        }
    }

    async fn fetch(&self, board_id: Uuid, post_id: Uuid, comment_id: Uuid) -> ServiceResult<Versioned<Comment>> {
        self.posts.fetch(board_id, post_id).await?;
        let comment = self.comments.get_404(comment_id).await?;
        if comment.post != post_id {
            return Err(ServiceError::NotFound(format!(
                "comment {} not found on post {}",
                comment_id, post_id
            )));
        }
        Ok(comment)
    }

    pub async fn list(&self, board_id: Uuid, post_id: Uuid) -> ServiceResult<Vec<Comment>> {
        self.posts.fetch(board_id, post_id).await?;
        Ok(self
            .comments
            .find_by("post", post_id)
            .await?
            .into_iter()
            .map(Versioned::into_inner)
            .collect())
    }

    pub async fn get(&self, board_id: Uuid, post_id: Uuid, comment_id: Uuid) -> ServiceResult<Comment> {
        Ok(self.fetch(board_id, post_id, comment_id).await?.into_inner())
    }

    pub async fn create(
        &self,
        board_id: Uuid,
        post_id: Uuid,
        new_comment: NewComment,
        requester: &Credentials,
    ) -> ServiceResult<Comment> {
        let actor = self.authorizer.authenticate(requester).await?;
        require_non_empty("body", &new_comment.body)?;
        self.posts.fetch(board_id, post_id).await?;

        let comment = Comment {
            id: Uuid::new_v4(),
            author: actor.id(),
            post: post_id,
            body: new_comment.body,
            votes: 0,
        };
        let created = self.comments.insert(&comment).await?;
        info!(comment_id = %created.id, %post_id, author = %actor.id(), "comment created");
        Ok(created.into_inner())
    }

    pub async fn update(
        &self,
        board_id: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
        changes: CommentPatch,
        requester: &Credentials,
    ) -> ServiceResult<Comment> {
        let actor = self.authorizer.authenticate(requester).await?;
        let board = self.boards.get_404(board_id).await?;
        let comment = self.fetch(board_id, post_id, comment_id).await?;
        ensure_can_mutate(&*comment, Some(&*board), &actor, MutationRule::OwnerOrBoardRoleOrAdmin)?;

        if let Some(body) = &changes.body {
            require_non_empty("body", body)?;
        }

        let mut patch = Patch::default();
        patch.set("body", changes.body)?;
        patch.set("votes", changes.votes)?;
        if patch.is_empty() {
            return Ok(comment.into_inner());
        }

        let updated = self.comments.update(&comment, patch.into_inner()).await?;
        info!(%comment_id, by = %actor.id(), "comment updated");
        Ok(updated.into_inner())
    }

    pub async fn delete(
        &self,
        board_id: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
        requester: &Credentials,
    ) -> ServiceResult<()> {
        let actor = self.authorizer.authenticate(requester).await?;
        let board = self.boards.get_404(board_id).await?;
        let comment = self.fetch(board_id, post_id, comment_id).await?;
        ensure_can_mutate(&*comment, Some(&*board), &actor, MutationRule::OwnerOrBoardRoleOrAdmin)?;

        self.comments.delete(&comment).await?;
        info!(%comment_id, by = %actor.id(), "comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use crate::database::models::{ContentType, Post};
    use crate::services::test_support::Fixture;

    fn service(fx: &Fixture) -> CommentService {
        let posts = PostService::new(fx.repo(), fx.repo(), fx.authorizer.clone(), 16);
        CommentService::new(fx.repo(), fx.repo(), posts, fx.authorizer.clone())
    }

    /// Board with one moderator, holding a single post
    async fn thread(fx: &Fixture, moderator: Uuid) -> (Board, Post) {
        let board = Board {
            id: Uuid::new_v4(),
            name: "rust".to_string(),
            bio: String::new(),
            rules: String::new(),
            moderators: vec![moderator],
            owner: Uuid::new_v4(),
        };
        fx.repo::<Board>().insert(&board).await.unwrap();
        let post = Post {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            body_type: ContentType::Text,
            body_content: String::new(),
            votes: 0,
            author: Uuid::new_v4(),
            board: board.id,
        };
        fx.repo::<Post>().insert(&post).await.unwrap();
        (board, post)
    }

    fn edit(body: &str) -> CommentPatch {
        CommentPatch {
            body: Some(body.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn comment_author_is_the_requester() {
        let fx = Fixture::new();
        let (moderator, _) = fx.user("moderator").await;
        let (writer, creds) = fx.user("writer").await;
        let (board, post) = thread(&fx, moderator).await;

        let comment = service(&fx)
            .create(board.id, post.id, NewComment { body: "first".into() }, &creds)
            .await
            .unwrap();
        assert_eq!(comment.author, writer);
        assert_eq!(comment.post, post.id);
    }

    #[tokio::test]
    async fn parent_board_moderators_may_edit_comments() {
        let fx = Fixture::new();
        let comments = service(&fx);
        let (moderator, moderator_creds) = fx.user("moderator").await;
        let (_, author_creds) = fx.user("author").await;
        let (_, stranger_creds) = fx.user("stranger").await;
        let (board, post) = thread(&fx, moderator).await;
        let comment = comments
            .create(board.id, post.id, NewComment { body: "first".into() }, &author_creds)
            .await
            .unwrap();

        let err = comments
            .update(board.id, post.id, comment.id, edit("spam"), &stranger_creds)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Auth(AuthError::Forbidden(_))));

        let edited = comments
            .update(board.id, post.id, comment.id, edit("cleaned"), &moderator_creds)
            .await
            .unwrap();
        assert_eq!(edited.body, "cleaned");

        comments.delete(board.id, post.id, comment.id, &author_creds).await.unwrap();
        assert!(comments.list(board.id, post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn moderation_uses_the_post_board_not_the_path() {
        let fx = Fixture::new();
        let comments = service(&fx);
        let (_, author_creds) = fx.user("author").await;
        let (outsider, outsider_creds) = fx.user("outsider").await;
        let (board, post) = thread(&fx, Uuid::new_v4()).await;
        // A board the outsider moderates, unrelated to the post
        let (other_board, _) = thread(&fx, outsider).await;
        let comment = comments
            .create(board.id, post.id, NewComment { body: "first".into() }, &author_creds)
            .await
            .unwrap();

        let err = comments
            .update(other_board.id, post.id, comment.id, edit("x"), &outsider_creds)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
