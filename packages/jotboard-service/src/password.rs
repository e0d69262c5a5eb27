//! Argon2id password hashes stored as PHC strings (`$argon2id$v=19$...`).

use argon2::{
	Argon2,
	password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{Error, Result};

pub fn hash_password(password: &str) -> Result<String> {
	let salt = SaltString::generate(&mut OsRng);
	let hash = Argon2::default()
		.hash_password(password.as_bytes(), &salt)
		.map_err(|err| Error::Internal { message: format!("Failed to hash password: {err}.") })?;

	Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
	let parsed = PasswordHash::new(hash)
		.map_err(|err| Error::Internal { message: format!("Invalid password hash: {err}.") })?;

	Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}
