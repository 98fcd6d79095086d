// auth/gate.rs - Authorization Gate
//
// Pure allow/deny decision over snapshots the caller has already fetched.
// Nothing here touches the store.

use uuid::Uuid;

use super::roles::is_moderator;
use super::AuthError;
use crate::database::models::{Board, Comment, Post, Profile, User};

/// Which standings are sufficient for a given mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationRule {
    /// Only the resource's owner (user self-edit and self-delete)
    OwnerOnly,
    OwnerOrAdmin,
    /// Owner/author, a moderator of the parent board, or any administrator
    OwnerOrBoardRoleOrAdmin,
}

/// Anything with a single owning user
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for User {
    fn owner_id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Board {
    fn owner_id(&self) -> Uuid {
        self.owner
    }
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.author
    }
}

/// An authenticated requester with its administrator standing resolved
#[derive(Debug, Clone)]
pub struct Actor {
    pub profile: Profile,
    pub is_admin: bool,
}

impl Actor {
    pub fn id(&self) -> Uuid {
        self.profile.id
    }

    pub fn ensure_admin(&self) -> Result<(), AuthError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AuthError::Forbidden("administrator rights required".to_string()))
        }
    }
}

/// `board` is the board that scopes moderation for `resource`; for a board it is the board itself
pub fn can_mutate<R: Owned + ?Sized>(resource: &R, board: Option<&Board>, actor: &Actor, rule: MutationRule) -> bool {
    let is_owner = resource.owner_id() == actor.id();
    match rule {
        MutationRule::OwnerOnly => is_owner,
        MutationRule::OwnerOrAdmin => actor.is_admin || is_owner,
        MutationRule::OwnerOrBoardRoleOrAdmin => {
            actor.is_admin || board.is_some_and(|b| is_moderator(b, actor.id())) || is_owner
        }
    }
}

pub fn ensure_can_mutate<R: Owned + ?Sized>(
    resource: &R,
    board: Option<&Board>,
    actor: &Actor,
    rule: MutationRule,
) -> Result<(), AuthError> {
    if can_mutate(resource, board, actor, rule) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(format!(
            "{} may not modify this resource",
            actor.profile.name
        )))
    }
}
