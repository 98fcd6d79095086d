// state.rs - Shared application state handed to every handler

use std::sync::Arc;

use crate::auth::{AdminRegistry, AuthError, Authorizer, CredentialVerifier, PasswordHashing};
use crate::config::AppConfig;
use crate::database::models::User;
use crate::database::{DocumentStore, Repository};
use crate::services::{BoardService, CommentService, PopularService, PostService, TransferService, UserService};

pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub authorizer: Authorizer,
    pub admins: AdminRegistry,
    pub hashing: PasswordHashing,
    pub users: UserService,
    pub boards: BoardService,
    pub posts: PostService,
    pub comments: CommentService,
    pub popular: PopularService,
    pub transfer: TransferService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: &AppConfig) -> Result<Self, AuthError> {
        let timeout = config.database.operation_timeout();
        let max_terms = config.api.max_search_terms;
        let hashing = PasswordHashing::from_config(&config.security)?;

        let users: Repository<User> = Repository::new(store.clone(), timeout);
        let boards = Repository::new(store.clone(), timeout);
        let posts = Repository::new(store.clone(), timeout);
        let comments = Repository::new(store.clone(), timeout);

        let admins = AdminRegistry::new(Repository::new(store.clone(), timeout));
        let authorizer = Authorizer::new(CredentialVerifier::new(users.clone(), hashing.clone()), admins.clone());

        let post_service = PostService::new(posts.clone(), boards.clone(), authorizer.clone(), max_terms);

        Ok(Self {
            users: UserService::new(users.clone(), admins.clone(), authorizer.clone(), hashing.clone(), max_terms),
            boards: BoardService::new(boards.clone(), authorizer.clone(), max_terms),
            comments: CommentService::new(comments.clone(), boards.clone(), post_service.clone(), authorizer.clone()),
            posts: post_service,
            popular: PopularService::new(users.clone(), boards.clone(), posts.clone(), comments.clone()),
            transfer: TransferService::new(users, boards, posts, comments, authorizer.clone()),
            store,
            authorizer,
            admins,
            hashing,
        })
    }
}
