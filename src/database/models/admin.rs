use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::repository::Document;
use crate::database::store::Collection;

/// Administrator membership, keyed by the granted user's id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminGrant {
    pub user_id: Uuid,
    pub granted_at: DateTime<Utc>,
}

impl Document for AdminGrant {
    const COLLECTION: Collection = Collection::Administrators;
    const SEARCHABLE: &'static [&'static str] = &[];

    fn id(&self) -> Uuid {
        self.user_id
    }
}
