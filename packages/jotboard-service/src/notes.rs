//! Owner-scoped note access.
//!
//! Every read and write filters on `owner_id`. A note owned by someone else is reported as
//! [`Error::NotFound`], the same as an id that does not exist, so callers cannot probe for
//! other users' notes.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Caller, Error, JotService, Result};
use jotboard_storage::{models::Note, queries};

/// Form fields shared by create and update.
///
/// Missing fields deserialize as empty so validation reports them alongside the others.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NoteInput {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteCreateResponse {
	pub note_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteItem {
	pub note_id: Uuid,
	pub owner_id: Uuid,
	pub title: String,
	pub text: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Note> for NoteItem {
	fn from(note: Note) -> Self {
		Self {
			note_id: note.note_id,
			owner_id: note.owner_id,
			title: note.title,
			text: note.text,
			created_at: note.created_at,
			updated_at: note.updated_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteListResponse {
	pub items: Vec<NoteItem>,
}

impl JotService {
	pub async fn list_notes(&self, caller: Option<&Caller>) -> Result<NoteListResponse> {
		let caller = crate::require_caller(caller)?;
		let notes = queries::list_notes_for_owner(&self.db.pool, caller.user_id).await?;

		Ok(NoteListResponse { items: notes.into_iter().map(NoteItem::from).collect() })
	}

	pub async fn get_note(&self, caller: Option<&Caller>, note_id: Uuid) -> Result<NoteItem> {
		let caller = crate::require_caller(caller)?;
		let note = queries::find_note_for_owner(&self.db.pool, note_id, caller.user_id)
			.await?
			.ok_or_else(note_not_found)?;

		Ok(note.into())
	}

	pub async fn create_note(
		&self,
		caller: Option<&Caller>,
		input: NoteInput,
	) -> Result<NoteCreateResponse> {
		let caller = crate::require_caller(caller)?;
		let input = self.validate_note_input(&input)?;
		let now = OffsetDateTime::now_utc();
		let note = Note {
			note_id: Uuid::new_v4(),
			owner_id: caller.user_id,
			title: input.title,
			text: input.text,
			created_at: now,
			updated_at: now,
		};

		queries::insert_note(&self.db.pool, &note).await?;

		tracing::info!(note_id = %note.note_id, owner_id = %note.owner_id, "Note created.");

		Ok(NoteCreateResponse { note_id: note.note_id })
	}

	pub async fn update_note(
		&self,
		caller: Option<&Caller>,
		note_id: Uuid,
		input: NoteInput,
	) -> Result<NoteItem> {
		let caller = crate::require_caller(caller)?;
		let input = self.validate_note_input(&input)?;
		let now = OffsetDateTime::now_utc();
		let note = Note {
			note_id,
			owner_id: caller.user_id,
			title: input.title,
			text: input.text,
			created_at: now,
			updated_at: now,
		};
		let updated = queries::update_note_for_owner(&self.db.pool, &note)
			.await?
			.ok_or_else(note_not_found)?;

		tracing::info!(%note_id, owner_id = %caller.user_id, "Note updated.");

		Ok(updated.into())
	}

	pub async fn delete_note(&self, caller: Option<&Caller>, note_id: Uuid) -> Result<()> {
		let caller = crate::require_caller(caller)?;

		if !queries::delete_note_for_owner(&self.db.pool, note_id, caller.user_id).await? {
			return Err(note_not_found());
		}

		tracing::info!(%note_id, owner_id = %caller.user_id, "Note deleted.");

		Ok(())
	}

	fn validate_note_input(&self, input: &NoteInput) -> Result<NoteInput> {
		let mut fields = Vec::new();
		let title =
			crate::check_text_field("title", &input.title, self.cfg.notes.max_title_chars, &mut fields);
		let text =
			crate::check_text_field("text", &input.text, self.cfg.notes.max_text_chars, &mut fields);

		if !fields.is_empty() {
			return Err(crate::validation_error(
				"Notes need a non-empty title and text within the length limits.",
				fields,
			));
		}

		Ok(NoteInput { title, text })
	}
}

fn note_not_found() -> Error {
	Error::NotFound { message: "Note not found.".to_string() }
}
