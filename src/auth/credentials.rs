use tracing::{error, info, warn};

use super::{AuthError, Argon2Hasher};
use crate::database::{Database, DatabaseError, User};

/// Create an account. A taken username is `DuplicateUsername`, never a store error.
pub async fn register(
    db: &Database,
    hasher: &Argon2Hasher,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let username = username.trim();
    let hash = hasher.hash_blocking(password).await?;

    match db.users().create(username, &hash).await {
        Ok(user) => {
            info!(user_id = user.id, "registered user {}", user.username);
            Ok(user)
        }
        Err(DatabaseError::UniqueViolation(_)) => {
            warn!("registration rejected, username {} already exists", username);
            Err(AuthError::DuplicateUsername)
        }
        Err(other) => Err(other.into()),
    }
}

/// Check a username/password pair.
pub async fn login(
    db: &Database,
    hasher: &Argon2Hasher,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let username = username.trim();

    let Some(user) = db.users().find_by_username(username).await? else {
        hasher.verify_dummy(password).await;
        warn!("login failed for {}", username);
        return Err(AuthError::InvalidCredentials);
    };

    match hasher.verify_blocking(password, &user.password_hash).await {
        Ok(true) => {
            info!(user_id = user.id, "login succeeded for {}", user.username);
            Ok(user)
        }
        Ok(false) => {
            warn!("login failed for {}", username);
            Err(AuthError::InvalidCredentials)
        }
        Err(_) => {
            error!(user_id = user.id, "stored password hash is unreadable");
            Err(AuthError::InvalidCredentials)
        }
    }
}
