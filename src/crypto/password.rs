use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::error::AuthError;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 2;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 1;
/// The salt length in bytes.
const SALT_LEN: usize = 16;

fn argon2() -> Result<Argon2<'static>, AuthError> {
    let params = ParamsBuilder::new()
        .m_cost(ARGON2_MEMORY_MB * 1024)
        .t_cost(ARGON2_ITERATIONS)
        .p_cost(ARGON2_PARALLELISM)
        .build()
        .map_err(|e| AuthError::HashingFailure(format!("Argon2 params: {}", e)))?;

    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

/// Hashes a password using Argon2id with a fresh random salt.
///
/// The result is a PHC string (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`)
/// that carries everything [`verify_password`] needs.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the credential string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let password_bytes = Zeroizing::new(password.as_bytes().to_vec());

    let mut salt_bytes = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt_bytes)
        .map_err(|e| AuthError::HashingFailure(format!("Failed to generate salt: {}", e)))?;

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AuthError::HashingFailure(format!("Salt encoding error: {}", e)))?;

    let credential = argon2()?
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AuthError::HashingFailure(format!("Argon2 hash error: {}", e)))?
        .to_string();

    tracing::debug!("Password hashed successfully with Argon2");
    Ok(credential)
}

/// Verifies a password against a stored credential.
///
/// The cost parameters and salt are read from the credential itself, so hashes
/// made with older parameters keep verifying. Digest comparison is constant-time.
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `credential` - The credential produced by [`hash_password`].
///
/// # Returns
///
/// `Ok(false)` for a wrong password, `Err(HashingFailure)` for a corrupt credential.
pub fn verify_password(password: &str, credential: &str) -> Result<bool, AuthError> {
    let password_bytes = Zeroizing::new(password.as_bytes().to_vec());

    let parsed = PasswordHash::new(credential)
        .map_err(|e| AuthError::HashingFailure(format!("Hash parse error: {}", e)))?;

    let matched = match Argon2::default().verify_password(&password_bytes, &parsed) {
        Ok(()) => true,
        Err(password_hash::Error::Password) => false,
        Err(e) => {
            return Err(AuthError::HashingFailure(format!(
                "Argon2 verify error: {}",
                e
            )));
        }
    };

    tracing::debug!("Password verification completed");
    Ok(matched)
}
