pub mod accounts;
pub mod board;
pub mod notes;
pub mod password;
pub mod projects;
pub mod time_serde;

mod error;

pub use accounts::{LoginRequest, SignupRequest};
pub use board::{HomeResponse, TaskCreateRequest, TaskItem, TaskListResponse};
pub use error::{Error, Result};
pub use notes::{NoteCreateResponse, NoteInput, NoteItem, NoteListResponse};
pub use projects::{
	ProjectCreateRequest, ProjectItem, ProjectListResponse, ProjectStatus, ProjectUpdateRequest,
};

use uuid::Uuid;

use jotboard_config::Config;
use jotboard_storage::db::Db;

/// Identity of the authenticated user a request runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Caller {
	pub user_id: Uuid,
}

pub struct JotService {
	pub cfg: Config,
	pub db: Db,
}
impl JotService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db }
	}
}

pub(crate) fn require_caller(caller: Option<&Caller>) -> Result<&Caller> {
	caller.ok_or_else(|| Error::Unauthenticated { message: "Login required.".to_string() })
}

/// Trims `value` and checks it is non-empty and at most `max_chars` characters long.
///
/// Failures are appended to `fields` so a form can report every bad field at once.
pub(crate) fn check_text_field(
	field: &str,
	value: &str,
	max_chars: u32,
	fields: &mut Vec<String>,
) -> String {
	let trimmed = value.trim();

	if trimmed.is_empty() || trimmed.chars().count() > max_chars as usize {
		fields.push(field.to_string());
	}

	trimmed.to_string()
}

pub(crate) fn validation_error(message: &str, fields: Vec<String>) -> Error {
	Error::Validation { message: format!("{message} Check: {}.", fields.join(", ")), fields }
}
