use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::ServiceResult;
use crate::database::models::{Board, Comment, ContentType, Post, Profile, User};
use crate::database::Repository;

/// Placeholder shown when a referenced user or board no longer exists
const DELETED: &str = "[deleted]";

/// A post with author and board ids resolved to names
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularPost {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub body_type: ContentType,
    pub body_content: String,
    pub votes: i64,
    pub author: String,
    pub board: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularUser {
    #[serde(flatten)]
    pub profile: Profile,
    /// Sum of votes across the user's posts and comments
    pub votes: i64,
}

#[derive(Clone)]
pub struct PopularService {
    users: Repository<User>,
    boards: Repository<Board>,
    posts: Repository<Post>,
    comments: Repository<Comment>,
}

impl PopularService {
    pub fn new(
        users: Repository<User>,
        boards: Repository<Board>,
        posts: Repository<Post>,
        comments: Repository<Comment>,
    ) -> Self {
        Self {
            users,
            boards,
            posts,
            comments,
        }
    }

    /// Posts ordered by votes, highest first
    pub async fn posts(&self, limit: Option<usize>) -> ServiceResult<Vec<PopularPost>> {
        let (posts, users, boards) = tokio::try_join!(self.posts.list(), self.users.list(), self.boards.list())?;

        let user_names: HashMap<Uuid, String> = users.into_iter().map(|u| (u.id, u.into_inner().name)).collect();
        let board_names: HashMap<Uuid, String> = boards.into_iter().map(|b| (b.id, b.into_inner().name)).collect();
        let name_of = |names: &HashMap<Uuid, String>, id: Uuid| names.get(&id).cloned().unwrap_or_else(|| DELETED.to_string());

        let mut ranked: Vec<PopularPost> = posts
            .into_iter()
            .map(|versioned| {
                let post = versioned.into_inner();
                PopularPost {
                    id: post.id,
                    board_id: post.board,
                    author: name_of(&user_names, post.author),
                    board: name_of(&board_names, post.board),
                    title: post.title,
                    body_type: post.body_type,
                    body_content: post.body_content,
                    votes: post.votes,
                }
            })
            .collect();

        // Stable sort keeps store order among equal vote counts
        ranked.sort_by(|a, b| b.votes.cmp(&a.votes));
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        Ok(ranked)
    }

    /// Users ordered by the votes their posts and comments collected
    pub async fn users(&self, limit: Option<usize>) -> ServiceResult<Vec<PopularUser>> {
        let (users, posts, comments) = tokio::try_join!(self.users.list(), self.posts.list(), self.comments.list())?;

        // Votes are author-editable, so totals saturate instead of overflowing
        let mut totals: HashMap<Uuid, i64> = HashMap::new();
        let authored = posts
            .iter()
            .map(|post| (post.author, post.votes))
            .chain(comments.iter().map(|comment| (comment.author, comment.votes)));
        for (author, votes) in authored {
            let total = totals.entry(author).or_default();
            *total = total.saturating_add(votes);
        }

        let mut ranked: Vec<PopularUser> = users
            .iter()
            .map(|user| PopularUser {
                profile: Profile::from(&**user),
                votes: totals.get(&user.id).copied().unwrap_or_default(),
            })
            .collect();

        ranked.sort_by(|a, b| b.votes.cmp(&a.votes));
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        Ok(ranked)
    }
}
