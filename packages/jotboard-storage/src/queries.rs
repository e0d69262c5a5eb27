use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
	Result,
	models::{Note, Project, Task, User},
};

pub async fn insert_user<'e, E>(executor: E, user: &User) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO users (user_id, username, password_hash, created_at)
VALUES ($1, $2, $3, $4)",
	)
	.bind(user.user_id)
	.bind(user.username.as_str())
	.bind(user.password_hash.as_str())
	.bind(user.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn find_user_by_username<'e, E>(executor: E, username: &str) -> Result<Option<User>>
where
	E: PgExecutor<'e>,
{
	let user = sqlx::query_as::<_, User>(
		"\
SELECT user_id, username, password_hash, created_at
FROM users
WHERE username = $1",
	)
	.bind(username)
	.fetch_optional(executor)
	.await?;

	Ok(user)
}

pub async fn insert_note<'e, E>(executor: E, note: &Note) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO notes (note_id, owner_id, title, text, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(note.note_id)
	.bind(note.owner_id)
	.bind(note.title.as_str())
	.bind(note.text.as_str())
	.bind(note.created_at)
	.bind(note.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn list_notes_for_owner<'e, E>(executor: E, owner_id: Uuid) -> Result<Vec<Note>>
where
	E: PgExecutor<'e>,
{
	let notes = sqlx::query_as::<_, Note>(
		"\
SELECT note_id, owner_id, title, text, created_at, updated_at
FROM notes
WHERE owner_id = $1
ORDER BY created_at, note_id",
	)
	.bind(owner_id)
	.fetch_all(executor)
	.await?;

	Ok(notes)
}

pub async fn find_note_for_owner<'e, E>(
	executor: E,
	note_id: Uuid,
	owner_id: Uuid,
) -> Result<Option<Note>>
where
	E: PgExecutor<'e>,
{
	let note = sqlx::query_as::<_, Note>(
		"\
SELECT note_id, owner_id, title, text, created_at, updated_at
FROM notes
WHERE note_id = $1 AND owner_id = $2",
	)
	.bind(note_id)
	.bind(owner_id)
	.fetch_optional(executor)
	.await?;

	Ok(note)
}

/// Returns the updated row, or `None` when no note with that id belongs to `note.owner_id`.
pub async fn update_note_for_owner<'e, E>(executor: E, note: &Note) -> Result<Option<Note>>
where
	E: PgExecutor<'e>,
{
	let updated = sqlx::query_as::<_, Note>(
		"\
UPDATE notes
SET
	title = $1,
	text = $2,
	updated_at = $3
WHERE note_id = $4 AND owner_id = $5
RETURNING note_id, owner_id, title, text, created_at, updated_at",
	)
	.bind(note.title.as_str())
	.bind(note.text.as_str())
	.bind(note.updated_at)
	.bind(note.note_id)
	.bind(note.owner_id)
	.fetch_optional(executor)
	.await?;

	Ok(updated)
}

/// Returns `true` when a row was removed.
pub async fn delete_note_for_owner<'e, E>(
	executor: E,
	note_id: Uuid,
	owner_id: Uuid,
) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM notes WHERE note_id = $1 AND owner_id = $2")
		.bind(note_id)
		.bind(owner_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn insert_project<'e, E>(executor: E, project: &Project) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO projects (project_id, title, text, status, created, progress)
VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(project.project_id)
	.bind(project.title.as_str())
	.bind(project.text.as_str())
	.bind(project.status.as_str())
	.bind(project.created)
	.bind(project.progress)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn update_project<'e, E>(executor: E, project: &Project) -> Result<Option<Project>>
where
	E: PgExecutor<'e>,
{
	let updated = sqlx::query_as::<_, Project>(
		"\
UPDATE projects
SET
	title = $1,
	text = $2,
	status = $3,
	created = $4,
	progress = $5
WHERE project_id = $6
RETURNING project_id, title, text, status, created, progress",
	)
	.bind(project.title.as_str())
	.bind(project.text.as_str())
	.bind(project.status.as_str())
	.bind(project.created)
	.bind(project.progress)
	.bind(project.project_id)
	.fetch_optional(executor)
	.await?;

	Ok(updated)
}

pub async fn find_project<'e, E>(executor: E, project_id: Uuid) -> Result<Option<Project>>
where
	E: PgExecutor<'e>,
{
	let project = sqlx::query_as::<_, Project>(
		"\
SELECT project_id, title, text, status, created, progress
FROM projects
WHERE project_id = $1",
	)
	.bind(project_id)
	.fetch_optional(executor)
	.await?;

	Ok(project)
}

pub async fn list_projects<'e, E>(executor: E) -> Result<Vec<Project>>
where
	E: PgExecutor<'e>,
{
	let projects = sqlx::query_as::<_, Project>(
		"\
SELECT project_id, title, text, status, created, progress
FROM projects
ORDER BY inserted_at, project_id",
	)
	.fetch_all(executor)
	.await?;

	Ok(projects)
}

pub async fn insert_task<'e, E>(executor: E, task: &Task) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO tasks (task_id, title, text, created_at)
VALUES ($1, $2, $3, $4)",
	)
	.bind(task.task_id)
	.bind(task.title.as_str())
	.bind(task.text.as_str())
	.bind(task.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn list_tasks<'e, E>(executor: E) -> Result<Vec<Task>>
where
	E: PgExecutor<'e>,
{
	let tasks = sqlx::query_as::<_, Task>(
		"\
SELECT task_id, title, text, created_at
FROM tasks
ORDER BY created_at, task_id",
	)
	.fetch_all(executor)
	.await?;

	Ok(tasks)
}
