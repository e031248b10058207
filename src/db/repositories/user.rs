use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::now_timestamp;
use crate::entities::users;
use crate::models::{NewUser, User};

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            username: model.username,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Hashes the password and inserts the user. A duplicate username or email
    /// surfaces as a unique-constraint `DbErr` (see [`crate::db::is_unique_violation`]).
    pub async fn create(&self, user: NewUser, security: &SecurityConfig) -> Result<User> {
        let password = user.password;
        let config = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let now = now_timestamp();
        let active = users::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(user.name),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(password_hash),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(User::from(model))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// True if any account already uses this username or this email.
    pub async fn exists_with_username_or_email(&self, username: &str, email: &str) -> Result<bool> {
        let user = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(username))
                    .add(users::Column::Email.eq(email)),
            )
            .one(&self.conn)
            .await
            .context("Failed to query user by username or email")?;

        Ok(user.is_some())
    }

    /// Looks the account up by username or email and checks the password.
    /// Returns `None` for an unknown login or a wrong password alike.
    /// Verification runs on the blocking pool.
    pub async fn verify_password(&self, login: &str, password: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(login))
                    .add(users::Column::Email.eq(login)),
            )
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| User::from(user)))
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None, // output length (use default)
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_salted_and_verifiable() {
        let config = SecurityConfig::default();
        let first = hash_password("pw12345", &config).unwrap();
        let second = hash_password("pw12345", &config).unwrap();

        assert_ne!(first, second);
        assert!(!first.contains("pw12345"));
        assert!(first.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&first).unwrap();
        assert!(Argon2::default().verify_password(b"pw12345", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }

    #[test]
    fn test_hash_password_rejects_bad_params() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1,
            argon2_time_cost: 0,
            argon2_parallelism: 0,
        };
        assert!(hash_password("pw", &config).is_err());
    }
}
