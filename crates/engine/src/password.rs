//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings, so the parameters used at hash time
//! travel with the hash and verification does not depend on the current
//! cost settings.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{EngineError, ResultEngine};

pub(crate) fn hash_password(params: &Params, password: &str) -> ResultEngine<String> {
    if password.is_empty() {
        return Err(EngineError::InvalidInput(
            "password must not be empty".to_string(),
        ));
    }
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone());
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::InvalidInput(format!("password hashing failed: {err}")))
}

/// Returns `Ok(false)` on a mismatch; `Err(Decode)` if the stored hash is
/// not a valid PHC string.
pub(crate) fn verify_password(password: &str, stored_hash: &str) -> ResultEngine<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| EngineError::Decode(format!("stored password hash: {err}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// [`hash_password`] on the blocking pool, off the async workers.
pub(crate) async fn hash_password_blocking(params: &Params, password: &str) -> ResultEngine<String> {
    let params = params.clone();
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&params, &password))
        .await
        .map_err(|err| EngineError::InvalidInput(format!("password hashing failed: {err}")))?
}

/// [`verify_password`] on the blocking pool, off the async workers.
pub(crate) async fn verify_password_blocking(password: &str, stored_hash: &str) -> ResultEngine<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|err| EngineError::Decode(format!("password verification failed: {err}")))?
}
