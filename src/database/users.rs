use crate::error::{ServiceError, ServiceResult};
use crate::models::User;
use crate::password::{
    password_hash_create, password_hash_dummy_verify, password_hash_verify,
    PLACEHOLDER_CREDENTIAL,
};

use super::DatabaseConnection;

#[derive(sqlx::FromRow)]
struct UserCredential {
    id: i64,
    username: String,
    password_hash: String,
}

impl DatabaseConnection {
    pub async fn register_user(&mut self, username: &str, password: &str) -> ServiceResult<User> {
        let password_hash = password_hash_create(password)?;

        let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&mut *self.connection)
            .await
            .map_err(|e| match ServiceError::from(e) {
                ServiceError::DuplicateEntry(_) => {
                    ServiceError::DuplicateEntry("Username already exists.")
                }
                e => e,
            })?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_owned(),
        })
    }

    /// Unknown usernames and wrong passwords are reported identically.
    pub async fn authenticate_user(&mut self, username: &str, password: &str) -> ServiceResult<User> {
        let credential = sqlx::query_as::<_, UserCredential>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&mut *self.connection)
        .await?;

        match credential {
            Some(credential) if password_hash_verify(&credential.password_hash, password) => {
                Ok(User {
                    id: credential.id,
                    username: credential.username,
                })
            }
            Some(_) => Err(ServiceError::Unauthorized("Invalid username or password.")),
            None => {
                password_hash_dummy_verify(password);
                Err(ServiceError::Unauthorized("Invalid username or password."))
            }
        }
    }

    /// Find or create a user that stands for an external login.
    ///
    /// Returns the user and whether it was created by this call.
    pub async fn login_or_register_fixed_identity(
        &mut self,
        username: &str,
    ) -> ServiceResult<(User, bool)> {
        let existing = sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&mut *self.connection)
            .await?;

        if let Some(user) = existing {
            return Ok((user, false));
        }

        let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(PLACEHOLDER_CREDENTIAL)
            .execute(&mut *self.connection)
            .await?;

        Ok((
            User {
                id: result.last_insert_rowid(),
                username: username.to_owned(),
            },
            true,
        ))
    }
}
