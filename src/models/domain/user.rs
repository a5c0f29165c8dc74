use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// An administrator account. Students are not users; they register per test
/// without credentials.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        first_name: &str,
        last_name: &str,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Self {
        User {
            id: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Some(Utc::now()),
        }
    }

    /// Claims subject: ObjectId hex when persisted, username otherwise.
    pub fn subject(&self) -> String {
        self.id
            .as_ref()
            .map(|oid| oid.to_hex())
            .unwrap_or_else(|| self.username.clone())
    }
}

#[cfg(test)]
impl User {
    pub fn test_user(username: &str) -> Self {
        User::new(
            "Test",
            "User",
            username,
            &format!("{}@example.com", username),
            "salt$hash",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("John", "Doe", "johndoe", "john@example.com", "s$h");
        assert_eq!(user.username, "johndoe");
        assert_eq!(user.email, "john@example.com");
        assert!(user.id.is_none());
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_subject_falls_back_to_username() {
        let user = User::test_user("johndoe");
        assert_eq!(user.subject(), "johndoe");

        let mut persisted = user.clone();
        let oid = ObjectId::new();
        persisted.id = Some(oid);
        assert_eq!(persisted.subject(), oid.to_hex());
    }
}
