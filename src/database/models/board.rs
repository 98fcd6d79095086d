use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::repository::Document;
use crate::database::store::Collection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub rules: String,
    /// Users allowed to moderate this board; the owner need not be listed
    #[serde(default)]
    pub moderators: Vec<Uuid>,
    pub owner: Uuid,
}

impl Document for Board {
    const COLLECTION: Collection = Collection::Boards;
    const SEARCHABLE: &'static [&'static str] = &["name", "bio", "rules"];

    fn id(&self) -> Uuid {
        self.id
    }
}
