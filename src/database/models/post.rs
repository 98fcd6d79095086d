use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::repository::Document;
use crate::database::store::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Text,
    Image,
    Link,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub body_type: ContentType,
    #[serde(default)]
    pub body_content: String,
    #[serde(default)]
    pub votes: i64,
    pub author: Uuid,
    pub board: Uuid,
}

impl Document for Post {
    const COLLECTION: Collection = Collection::Posts;
    const SEARCHABLE: &'static [&'static str] = &["title", "bodyContent", "bodyType"];

    fn id(&self) -> Uuid {
        self.id
    }
}
