use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Server-side record of an issued refresh token, stored by hash so a raw
/// token never touches the database. Rotation revokes the old record.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RefreshToken {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}

impl RefreshToken {
    pub fn new(username: &str, token_hash: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            username: username.to_string(),
            token_hash: token_hash.to_string(),
            expires_at,
            created_at: Utc::now(),
            revoked: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.revoked && self.expires_at > Utc::now()
    }
}
