use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::task;
use uuid::Uuid;

use crate::{Caller, Error, JotService, Result, password};
use jotboard_storage::{models::User, queries};

const MIN_USERNAME_CHARS: usize = 3;
const MAX_USERNAME_CHARS: usize = 150;
const INVALID_CREDENTIALS: &str = "Invalid username or password.";

#[derive(Clone, Deserialize, Serialize)]
pub struct SignupRequest {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub password: String,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct LoginRequest {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub password: String,
}

impl JotService {
	pub async fn signup(&self, req: SignupRequest) -> Result<Caller> {
		let username = normalize_username(&req.username);
		let mut fields = Vec::new();

		if !username_is_valid(&username) {
			fields.push("username".to_string());
		}
		if req.password.chars().count() < self.cfg.security.min_password_chars as usize {
			fields.push("password".to_string());
		}
		if !fields.is_empty() {
			return Err(crate::validation_error(
				&format!(
					"Usernames are {MIN_USERNAME_CHARS}-{MAX_USERNAME_CHARS} characters of letters, digits, and @.+-_; passwords need at least {} characters.",
					self.cfg.security.min_password_chars
				),
				fields,
			));
		}
		if queries::find_user_by_username(&self.db.pool, &username).await?.is_some() {
			return Err(username_taken());
		}

		let password_hash = run_blocking(move || password::hash_password(&req.password)).await?;
		let user = User {
			user_id: Uuid::new_v4(),
			username,
			password_hash,
			created_at: OffsetDateTime::now_utc(),
		};

		// A concurrent signup can still win the race; the unique index turns that into a conflict.
		queries::insert_user(&self.db.pool, &user).await.map_err(|err| match err {
			jotboard_storage::Error::Conflict(_) => username_taken(),
			other => other.into(),
		})?;

		tracing::info!(user_id = %user.user_id, username = %user.username, "Account created.");

		Ok(Caller { user_id: user.user_id })
	}

	pub async fn login(&self, req: LoginRequest) -> Result<Caller> {
		let username = normalize_username(&req.username);
		let Some(user) = queries::find_user_by_username(&self.db.pool, &username).await? else {
			tracing::warn!(%username, "Login rejected for unknown username.");

			return Err(invalid_credentials());
		};
		let hash = user.password_hash.clone();
		let verified = run_blocking(move || password::verify_password(&req.password, &hash)).await?;

		if !verified {
			tracing::warn!(user_id = %user.user_id, "Login rejected for wrong password.");

			return Err(invalid_credentials());
		}

		tracing::info!(user_id = %user.user_id, "Login succeeded.");

		Ok(Caller { user_id: user.user_id })
	}
}

fn normalize_username(raw: &str) -> String {
	raw.trim().to_lowercase()
}

fn username_is_valid(username: &str) -> bool {
	let len = username.chars().count();

	(MIN_USERNAME_CHARS..=MAX_USERNAME_CHARS).contains(&len)
		&& username
			.chars()
			.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '@' | '+' | '-'))
}

fn username_taken() -> Error {
	Error::Conflict { message: "Username is already taken.".to_string() }
}

fn invalid_credentials() -> Error {
	Error::Unauthenticated { message: INVALID_CREDENTIALS.to_string() }
}

/// Runs CPU-bound password hashing off the async worker threads.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
	F: FnOnce() -> Result<T> + Send + 'static,
	T: Send + 'static,
{
	task::spawn_blocking(f)
		.await
		.map_err(|err| Error::Internal { message: format!("Blocking task failed: {err}.") })?
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn usernames_are_trimmed_and_lowercased() {
		assert_eq!(normalize_username("  Alice@Example.com "), "alice@example.com");
	}

	#[test]
	fn username_charset_and_length_are_enforced() {
		assert!(username_is_valid("alice"));
		assert!(username_is_valid("a.b+c-d_e@f"));
		assert!(!username_is_valid("al"));
		assert!(!username_is_valid("has space"));
		assert!(!username_is_valid("émile"));
		assert!(!username_is_valid(&"a".repeat(MAX_USERNAME_CHARS + 1)));
	}
}
