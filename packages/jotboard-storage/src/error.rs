#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(sqlx::Error),
	#[error("Conflict: {0}")]
	Conflict(String),
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		if let sqlx::Error::Database(db_err) = &err
			&& db_err.is_unique_violation()
		{
			let constraint = db_err.constraint().unwrap_or("unique constraint");

			return Self::Conflict(format!("{constraint} violated."));
		}

		Self::Sqlx(err)
	}
}
