use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{Caller, JotService, Result};
use jotboard_storage::{models::Task, queries};

const MAX_TASK_TITLE_CHARS: u32 = 200;
const MAX_TASK_TEXT_CHARS: u32 = 20_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HomeResponse {
	#[serde(with = "crate::time_serde::date")]
	pub today: Date,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskItem {
	pub task_id: Uuid,
	pub title: String,
	pub text: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<Task> for TaskItem {
	fn from(task: Task) -> Self {
		Self { task_id: task.task_id, title: task.title, text: task.text, created_at: task.created_at }
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
	pub items: Vec<TaskItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskCreateRequest {
	pub title: String,
	#[serde(default)]
	pub text: String,
}

impl JotService {
	/// Landing data, computed per call.
	pub fn home(&self) -> HomeResponse {
		HomeResponse { today: OffsetDateTime::now_utc().date() }
	}

	/// Every task on the board. Only authenticated callers may look.
	pub async fn list_tasks(&self, caller: Option<&Caller>) -> Result<TaskListResponse> {
		crate::require_caller(caller)?;

		let tasks = queries::list_tasks(&self.db.pool).await?;

		Ok(TaskListResponse { items: tasks.into_iter().map(TaskItem::from).collect() })
	}

	pub async fn create_task(&self, req: TaskCreateRequest) -> Result<TaskItem> {
		let mut fields = Vec::new();
		let title = crate::check_text_field("title", &req.title, MAX_TASK_TITLE_CHARS, &mut fields);
		let text = req.text.trim().to_string();

		if text.chars().count() > MAX_TASK_TEXT_CHARS as usize {
			fields.push("text".to_string());
		}
		if !fields.is_empty() {
			return Err(crate::validation_error(
				"Tasks need a non-empty title within the length limits.",
				fields,
			));
		}

		let task =
			Task { task_id: Uuid::new_v4(), title, text, created_at: OffsetDateTime::now_utc() };

		queries::insert_task(&self.db.pool, &task).await?;

		tracing::info!(task_id = %task.task_id, "Task created.");

		Ok(task.into())
	}
}
