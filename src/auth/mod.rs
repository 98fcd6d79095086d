// auth/mod.rs - Authentication and authorization
//
// credentials: name/password verification, single-use AuthorizedIdentity
// roles:       moderator membership and the persisted administrator registry
// gate:        allow/deny decision for mutating operations
// password:    Argon2id hashing

pub mod credentials;
pub mod gate;
pub mod password;
pub mod roles;

pub use credentials::{AuthorizedIdentity, CredentialVerifier, Credentials};
pub use gate::{can_mutate, ensure_can_mutate, Actor, MutationRule, Owned};
pub use password::PasswordHashing;
pub use roles::{is_moderator, AdminRegistry};

use thiserror::Error;

use crate::database::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown name or wrong password; deliberately indistinguishable
    #[error("invalid name or password")]
    AuthenticationFailed,

    #[error("credentials not authorized")]
    NotAuthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Turns request credentials into an [`Actor`]: verify, resolve, then look up admin standing
#[derive(Clone)]
pub struct Authorizer {
    verifier: CredentialVerifier,
    admins: AdminRegistry,
}

impl Authorizer {
    pub fn new(verifier: CredentialVerifier, admins: AdminRegistry) -> Self {
        Self { verifier, admins }
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Actor, AuthError> {
        let identity = self.verifier.authorize(credentials).await?;
        let profile = self.verifier.resolve(identity).await?;
        let is_admin = self.admins.is_administrator(profile.id).await?;
        Ok(Actor { profile, is_admin })
    }

    pub async fn authenticate_admin(&self, credentials: &Credentials) -> Result<Actor, AuthError> {
        let actor = self.authenticate(credentials).await?;
        actor.ensure_admin()?;
        Ok(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::User;
    use crate::database::{MemoryStore, Repository};
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    async fn setup() -> (Authorizer, AdminRegistry, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let timeout = Duration::from_millis(200);
        let users: Repository<User> = Repository::new(store.clone(), timeout);
        let admins = AdminRegistry::new(Repository::new(store, timeout));
        let hashing = PasswordHashing::new(1024, 1, 1).unwrap();

        let id = Uuid::new_v4();
        users
            .insert(&User {
                id,
                name: "root".to_string(),
                bio: String::new(),
                avatar: String::new(),
                pronouns: String::new(),
                email: "root@example.com".to_string(),
                password: hashing.hash("toor").unwrap(),
            })
            .await
            .unwrap();

        let authorizer = Authorizer::new(CredentialVerifier::new(users, hashing), admins.clone());
        (authorizer, admins, id)
    }

    #[tokio::test]
    async fn authenticate_reflects_current_admin_standing() {
        let (authorizer, admins, id) = setup().await;
        let creds = Credentials::new("root", "toor");

        let actor = authorizer.authenticate(&creds).await.unwrap();
        assert_eq!(actor.id(), id);
        assert!(!actor.is_admin);
        assert!(matches!(
            authorizer.authenticate_admin(&creds).await,
            Err(AuthError::Forbidden(_))
        ));

        admins.grant(id).await.unwrap();
        assert!(authorizer.authenticate_admin(&creds).await.unwrap().is_admin);
    }

    #[tokio::test]
    async fn bad_credentials_never_produce_an_actor() {
        let (authorizer, _, _) = setup().await;
        let err = authorizer
            .authenticate(&Credentials::new("root", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AuthenticationFailed));
    }
}
