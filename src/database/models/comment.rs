use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::repository::Document;
use crate::database::store::Collection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author: Uuid,
    pub post: Uuid,
    pub body: String,
    #[serde(default)]
    pub votes: i64,
}

impl Document for Comment {
    const COLLECTION: Collection = Collection::Comments;
    const SEARCHABLE: &'static [&'static str] = &["body"];

    fn id(&self) -> Uuid {
        self.id
    }
}
