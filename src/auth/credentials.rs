// auth/credentials.rs - Credential Verifier
//
// Stateless: every mutating request carries a name/password pair which is
// verified against the stored hash, yielding a single-use AuthorizedIdentity.

use serde::Deserialize;
use tracing::{debug, warn};

use super::password::PasswordHashing;
use super::AuthError;
use crate::database::models::{Profile, User};
use crate::database::Repository;

/// Claimed name + plaintext password as sent by a client
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Proof that a name was checked against the identity store.
///
/// Carries only the name; resolving consumes it, so each proof backs exactly one lookup.
#[derive(Debug)]
pub struct AuthorizedIdentity {
    name: String,
    verified: bool,
}

impl AuthorizedIdentity {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Claims that never went through verification cannot be resolved
impl From<Credentials> for AuthorizedIdentity {
    fn from(credentials: Credentials) -> Self {
        Self {
            name: credentials.name,
            verified: false,
        }
    }
}

#[derive(Clone)]
pub struct CredentialVerifier {
    users: Repository<User>,
    hashing: PasswordHashing,
}

impl CredentialVerifier {
    pub fn new(users: Repository<User>, hashing: PasswordHashing) -> Self {
        Self { users, hashing }
    }

    pub async fn authorize(&self, credentials: &Credentials) -> Result<AuthorizedIdentity, AuthError> {
        let user = self.users.find_one_by("name", &credentials.name).await?;
        let stored_hash = user.as_ref().map(|u| u.password.clone());
        let known = stored_hash.is_some();

        let matches = self
            .hashing
            .verify_blocking(credentials.password.clone(), stored_hash)
            .await?;

        if !matches {
            // Callers only ever see AuthenticationFailed; the precise reason stays in the logs
            if known {
                warn!(name = %credentials.name, "authentication failed: password mismatch");
            } else {
                debug!(name = %credentials.name, "authentication failed: unknown user");
            }
            return Err(AuthError::AuthenticationFailed);
        }

        Ok(AuthorizedIdentity {
            name: credentials.name.clone(),
            verified: true,
        })
    }

    /// Re-reads the user by name so edits made since verification are visible
    pub async fn resolve(&self, identity: AuthorizedIdentity) -> Result<Profile, AuthError> {
        if !identity.verified {
            return Err(AuthError::NotAuthorized);
        }

        let user = self
            .users
            .find_one_by("name", &identity.name)
            .await?
            .ok_or(AuthError::AuthenticationFailed)?;
        Ok(Profile::from(&*user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    async fn verifier_with(name: &str, password: &str) -> CredentialVerifier {
        let users: Repository<User> = Repository::new(Arc::new(MemoryStore::new()), Duration::from_millis(200));
        let hashing = PasswordHashing::new(1024, 1, 1).unwrap();
        users
            .insert(&User {
                id: Uuid::new_v4(),
                name: name.to_string(),
                bio: String::new(),
                avatar: String::new(),
                pronouns: String::new(),
                email: format!("{}@example.com", name),
                password: hashing.hash(password).unwrap(),
            })
            .await
            .unwrap();
        CredentialVerifier::new(users, hashing)
    }

    #[tokio::test]
    async fn correct_password_resolves_to_the_named_user() {
        let verifier = verifier_with("alice", "s3cret").await;
        let identity = verifier.authorize(&Credentials::new("alice", "s3cret")).await.unwrap();
        assert_eq!(identity.name(), "alice");

        let profile = verifier.resolve(identity).await.unwrap();
        assert_eq!(profile.name, "alice");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_name_fail_identically() {
        let verifier = verifier_with("alice", "s3cret").await;

        let wrong = verifier.authorize(&Credentials::new("alice", "guess")).await.unwrap_err();
        let unknown = verifier.authorize(&Credentials::new("mallory", "s3cret")).await.unwrap_err();

        assert!(matches!(wrong, AuthError::AuthenticationFailed));
        assert!(matches!(unknown, AuthError::AuthenticationFailed));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn unverified_identity_cannot_be_resolved() {
        let verifier = verifier_with("alice", "s3cret").await;
        let claim = AuthorizedIdentity::from(Credentials::new("alice", "s3cret"));

        let err = verifier.resolve(claim).await.unwrap_err();
        assert!(matches!(err, AuthError::NotAuthorized));
    }

    #[test]
    fn debug_output_hides_the_password() {
        let rendered = format!("{:?}", Credentials::new("alice", "hunter2"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
