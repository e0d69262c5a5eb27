pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Unauthenticated: {message}")]
	Unauthenticated { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Validation failed: {message}")]
	Validation { message: String, fields: Vec<String> },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}
impl From<jotboard_storage::Error> for Error {
	fn from(err: jotboard_storage::Error) -> Self {
		match err {
			jotboard_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			jotboard_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}
