use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;

/// Database model for users table
#[derive(Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub email: String, // unique
    pub name: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
}

// Keeps the password hash out of logs and spans
impl fmt::Debug for UserModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserModel")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("hashed_password", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// A user row that has not been stored yet
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub hashed_password: String,
}

impl NewUser {
    /// Assigns the store-generated id and creation time
    pub fn into_model(self, id: i64, created_at: DateTime<Utc>) -> UserModel {
        UserModel {
            id,
            email: self.email,
            name: self.name,
            hashed_password: self.hashed_password,
            created_at,
        }
    }
}
