use serde::{Deserialize, Serialize};

/// A registered account. The password hash stays inside the credential store and is
/// never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Registration input after validation, before hashing.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}
