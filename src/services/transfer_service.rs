// services/transfer_service.rs - Admin bulk export/import
//
// Import is best effort: the four collections are inserted concurrently and
// each one is all-or-nothing on its own, but a failure in one collection does
// not roll back the others.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{ServiceError, ServiceResult};
use crate::auth::{Authorizer, Credentials};
use crate::database::models::{Board, Comment, Post, User};
use crate::database::{Document, Repository, StoreError, Versioned};

/// Full contents of the forum collections. User records include password hashes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dump {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Documents inserted per collection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub users: usize,
    pub boards: usize,
    pub posts: usize,
    pub comments: usize,
}

#[derive(Clone)]
pub struct TransferService {
    users: Repository<User>,
    boards: Repository<Board>,
    posts: Repository<Post>,
    comments: Repository<Comment>,
    authorizer: Authorizer,
}

async fn import_collection<T: Document>(repo: &Repository<T>, docs: &[T]) -> Result<usize, StoreError> {
    if docs.is_empty() {
        return Ok(0);
    }
    repo.insert_many(docs).await
}

impl TransferService {
    pub fn new(
        users: Repository<User>,
        boards: Repository<Board>,
        posts: Repository<Post>,
        comments: Repository<Comment>,
        authorizer: Authorizer,
    ) -> Self {
        Self {
            users,
            boards,
            posts,
            comments,
            authorizer,
        }
    }

    pub async fn export(&self, requester: &Credentials) -> ServiceResult<Dump> {
        let actor = self.authorizer.authenticate_admin(requester).await?;
        let (users, boards, posts, comments) = tokio::try_join!(
            self.users.list(),
            self.boards.list(),
            self.posts.list(),
            self.comments.list(),
        )?;

        let dump = Dump {
            users: users.into_iter().map(Versioned::into_inner).collect(),
            boards: boards.into_iter().map(Versioned::into_inner).collect(),
            posts: posts.into_iter().map(Versioned::into_inner).collect(),
            comments: comments.into_iter().map(Versioned::into_inner).collect(),
        };
        info!(
            by = %actor.id(),
            users = dump.users.len(),
            boards = dump.boards.len(),
            posts = dump.posts.len(),
            comments = dump.comments.len(),
            "export complete"
        );
        Ok(dump)
    }

    pub async fn import(&self, dump: Dump, requester: &Credentials) -> ServiceResult<ImportReport> {
        let actor = self.authorizer.authenticate_admin(requester).await?;
        self.import_unchecked(&dump).await.map(|report| {
            info!(by = %actor.id(), ?report, "import complete");
            report
        })
    }

    /// Imports without an authorization check; used by the admin endpoint and startup seeding
    pub(crate) async fn import_unchecked(&self, dump: &Dump) -> ServiceResult<ImportReport> {
        let (users, boards, posts, comments) = tokio::join!(
            import_collection(&self.users, &dump.users),
            import_collection(&self.boards, &dump.boards),
            import_collection(&self.posts, &dump.posts),
            import_collection(&self.comments, &dump.comments),
        );

        let mut report = ImportReport::default();
        let mut failures = Vec::new();
        let outcomes = [
            ("users", users, &mut report.users),
            ("boards", boards, &mut report.boards),
            ("posts", posts, &mut report.posts),
            ("comments", comments, &mut report.comments),
        ];
        let mut imported = 0;
        for (collection, outcome, slot) in outcomes {
            match outcome {
                Ok(count) => {
                    *slot = count;
                    imported += 1;
                }
                Err(e) => {
                    error!(collection, error = %e, "import failed");
                    failures.push((collection.to_string(), e.to_string()));
                }
            }
        }

        if failures.is_empty() {
            Ok(report)
        } else {
            Err(ServiceError::ImportFailed { imported, failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use crate::database::models::ContentType;
    use crate::services::test_support::Fixture;
    use uuid::Uuid;

    fn service(fx: &Fixture) -> TransferService {
        TransferService::new(fx.users.clone(), fx.repo(), fx.repo(), fx.repo(), fx.authorizer.clone())
    }

    fn sample(author: Uuid) -> Dump {
        let board = Board {
            id: Uuid::new_v4(),
            name: "imported".to_string(),
            bio: String::new(),
            rules: String::new(),
            moderators: vec![],
            owner: author,
        };
        let post = Post {
            id: Uuid::new_v4(),
            title: "imported post".to_string(),
            body_type: ContentType::Text,
            body_content: String::new(),
            votes: 0,
            author,
            board: board.id,
        };
        let comment = Comment {
            id: Uuid::new_v4(),
            author,
            post: post.id,
            body: "imported comment".to_string(),
            votes: 0,
        };
        let user = User {
            id: Uuid::new_v4(),
            name: format!("imported-{}", Uuid::new_v4().simple()),
            bio: String::new(),
            avatar: String::new(),
            pronouns: String::new(),
            email: "imported@example.com".to_string(),
            password: "$argon2id$v=19$imported".to_string(),
        };
        Dump {
            users: vec![user],
            boards: vec![board],
            posts: vec![post],
            comments: vec![comment],
        }
    }

    #[tokio::test]
    async fn only_administrators_may_transfer() {
        let fx = Fixture::new();
        let (_, creds) = fx.user("regular").await;
        let transfer = service(&fx);

        let err = transfer.export(&creds).await.unwrap_err();
        assert!(matches!(err, ServiceError::Auth(AuthError::Forbidden(_))));
        let err = transfer.import(Dump::default(), &creds).await.unwrap_err();
        assert!(matches!(err, ServiceError::Auth(AuthError::Forbidden(_))));
    }

    #[tokio::test]
    async fn export_then_import_elsewhere_reproduces_content() {
        let source = Fixture::new();
        let (admin, creds) = source.admin("root").await;
        service(&source).import(sample(admin), &creds).await.unwrap();
        let dump = service(&source).export(&creds).await.unwrap();
        assert_eq!(dump.users.len(), 2);

        let target = Fixture::new();
        let (_, target_creds) = target.admin("other-root").await;
        let report = service(&target).import(dump.clone(), &target_creds).await.unwrap();
        assert_eq!(
            report,
            ImportReport {
                users: 2,
                boards: 1,
                posts: 1,
                comments: 1
            }
        );
    }

    #[tokio::test]
    async fn failed_collection_does_not_roll_back_the_others() {
        let fx = Fixture::new();
        let (admin, creds) = fx.admin("root").await;
        let transfer = service(&fx);
        let dump = sample(admin);

        // Pre-existing post with the same id makes the posts batch fail
        fx.repo::<Post>().insert(&dump.posts[0]).await.unwrap();
        let mut extra = dump.posts[0].clone();
        extra.id = Uuid::new_v4();
        let mut dump = dump;
        dump.posts.insert(0, extra.clone());

        let err = transfer.import(dump.clone(), &creds).await.unwrap_err();
        match err {
            ServiceError::ImportFailed { imported, failures } => {
                assert_eq!(imported, 3);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].0, "posts");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(fx.users.find(dump.users[0].id).await.unwrap().is_some());
        assert!(fx.repo::<Board>().find(dump.boards[0].id).await.unwrap().is_some());
        assert!(fx.repo::<Comment>().find(dump.comments[0].id).await.unwrap().is_some());
        // The posts batch is atomic: the fresh post in the failing batch was not kept
        assert!(fx.repo::<Post>().find(extra.id).await.unwrap().is_none());
    }
}
