use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{require_non_empty, Patch, ServiceError, ServiceResult};
use crate::auth::{ensure_can_mutate, AdminRegistry, Authorizer, Credentials, MutationRule, PasswordHashing};
use crate::database::models::{Profile, User};
use crate::database::{Repository, StoreError};
use crate::search;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap_or_else(|e| panic!("email pattern: {}", e))
});

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub pronouns: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub pronouns: Option<String>,
}

fn validate_email(email: &str) -> ServiceResult<()> {
    if !EMAIL.is_match(email) {
        return Err(ServiceError::validation("email", "email not formatted properly"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    users: Repository<User>,
    admins: AdminRegistry,
    authorizer: Authorizer,
    hashing: PasswordHashing,
    max_search_terms: usize,
}

impl UserService {
    pub fn new(
        users: Repository<User>,
        admins: AdminRegistry,
        authorizer: Authorizer,
        hashing: PasswordHashing,
        max_search_terms: usize,
    ) -> Self {
        Self {
            users,
            admins,
            authorizer,
            hashing,
            max_search_terms,
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Profile>> {
        Ok(self.users.list().await?.iter().map(|u| Profile::from(&**u)).collect())
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Profile> {
        Ok(Profile::from(&*self.users.get_404(id).await?))
    }

    pub async fn find_by_name(&self, name: &str) -> ServiceResult<Option<Profile>> {
        Ok(self.users.find_one_by("name", name).await?.map(|u| Profile::from(&*u)))
    }

    pub async fn search(&self, terms: &[(String, String)]) -> ServiceResult<Vec<Profile>> {
        let found = search::search(&self.users, terms, self.max_search_terms).await?;
        Ok(found.iter().map(|u| Profile::from(&**u)).collect())
    }

    async fn ensure_name_free(&self, name: &str) -> ServiceResult<()> {
        if self.users.find_one_by("name", name).await?.is_some() {
            return Err(ServiceError::NameTaken(name.to_string()));
        }
        Ok(())
    }

    pub async fn register(&self, new_user: NewUser) -> ServiceResult<Profile> {
        require_non_empty("name", &new_user.name)?;
        require_non_empty("password", &new_user.password)?;
        validate_email(&new_user.email)?;
        self.ensure_name_free(&new_user.name).await?;

        let password = self.hashing.hash_blocking(new_user.password).await?;
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            bio: new_user.bio,
            avatar: new_user.avatar,
            pronouns: new_user.pronouns,
            email: new_user.email,
            password,
        };

        // The store's unique index still catches a registration racing this one
        let created = self.users.insert(&user).await.map_err(|e| match e {
            StoreError::DuplicateKey { .. } => ServiceError::NameTaken(user.name.clone()),
            other => other.into(),
        })?;
        info!(user_id = %created.id, name = %created.name, "user registered");
        Ok(Profile::from(&*created))
    }

    /// Users edit themselves; administrators may edit anyone for moderation
    pub async fn update(&self, id: Uuid, changes: UserPatch, requester: &Credentials) -> ServiceResult<Profile> {
        let actor = self.authorizer.authenticate(requester).await?;
        let target = self.users.get_404(id).await?;
        ensure_can_mutate(&*target, None, &actor, MutationRule::OwnerOrAdmin)?;

        if let Some(name) = &changes.name {
            require_non_empty("name", name)?;
            if *name != target.name {
                self.ensure_name_free(name).await?;
            }
        }
        if let Some(email) = &changes.email {
            validate_email(email)?;
        }
        let password = match changes.password {
            Some(plaintext) => {
                require_non_empty("password", &plaintext)?;
                Some(self.hashing.hash_blocking(plaintext).await?)
            }
            None => None,
        };

        let mut patch = Patch::default();
        patch.set("name", changes.name)?;
        patch.set("password", password)?;
        patch.set("email", changes.email)?;
        patch.set("bio", changes.bio)?;
        patch.set("avatar", changes.avatar)?;
        patch.set("pronouns", changes.pronouns)?;
        if patch.is_empty() {
            return Ok(Profile::from(&*target));
        }

        let updated = self.users.update(&target, patch.into_inner()).await?;
        info!(user_id = %id, by = %actor.id(), "user updated");
        Ok(Profile::from(&*updated))
    }

    /// Only the account holder may delete an account
    pub async fn delete(&self, id: Uuid, requester: &Credentials) -> ServiceResult<()> {
        let actor = self.authorizer.authenticate(requester).await?;
        let target = self.users.get_404(id).await?;
        ensure_can_mutate(&*target, None, &actor, MutationRule::OwnerOnly)?;

        // A failed revoke must leave the account in place
        self.admins.revoke(id).await?;
        self.users.delete(&target).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Grants administrator rights to an existing user; returns false if already held
    pub async fn grant_admin(&self, id: Uuid, requester: &Credentials) -> ServiceResult<bool> {
        let actor = self.authorizer.authenticate_admin(requester).await?;
        self.users.get_404(id).await?;
        let granted = self.admins.grant(id).await?;
        info!(user_id = %id, by = %actor.id(), granted, "administrator grant requested");
        Ok(granted)
    }

    /// Revokes administrator rights; returns false if the user held none
    pub async fn revoke_admin(&self, id: Uuid, requester: &Credentials) -> ServiceResult<bool> {
        let actor = self.authorizer.authenticate_admin(requester).await?;
        let revoked = self.admins.revoke(id).await?;
        info!(user_id = %id, by = %actor.id(), revoked, "administrator revoke requested");
        Ok(revoked)
    }
}
