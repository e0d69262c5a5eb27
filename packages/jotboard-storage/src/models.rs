use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct User {
	pub user_id: Uuid,
	pub username: String,
	pub password_hash: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Note {
	pub note_id: Uuid,
	pub owner_id: Uuid,
	pub title: String,
	pub text: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Project {
	pub project_id: Uuid,
	pub title: String,
	pub text: String,
	pub status: String,
	pub created: Date,
	pub progress: Decimal,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Task {
	pub task_id: Uuid,
	pub title: String,
	pub text: String,
	pub created_at: OffsetDateTime,
}
