use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::repository::Document;
use crate::database::store::Collection;

/// Stored user record. `password` holds the Argon2 PHC string, never plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub pronouns: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

/// Public view of a user, free of credential material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub avatar: String,
    pub pronouns: String,
    pub email: String,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
            pronouns: user.pronouns.clone(),
            email: user.email.clone(),
        }
    }
}

impl Document for User {
    const COLLECTION: Collection = Collection::Users;
    const SEARCHABLE: &'static [&'static str] = &["name", "bio", "pronouns", "email"];

    fn id(&self) -> Uuid {
        self.id
    }
}
