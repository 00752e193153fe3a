use serde::{Deserialize, Serialize};

/// Login account. Passwords are stored and compared as plain text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
}

impl User {
    /// Account written into an empty `users` table on first run.
    pub fn seed_admin() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}
