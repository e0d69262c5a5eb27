use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{Error, JotService, Result};
use jotboard_storage::{models::Project, queries};

const MAX_PROJECT_TITLE_CHARS: u32 = 200;
const MAX_PROJECT_TEXT_CHARS: u32 = 20_000;
const MAX_PROGRESS_SCALE: u32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
	#[default]
	Draft,
	Prototypes,
	Development,
	Review,
}
impl ProjectStatus {
	pub const ALL: [Self; 4] = [Self::Draft, Self::Prototypes, Self::Development, Self::Review];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Draft => "draft",
			Self::Prototypes => "prototypes",
			Self::Development => "development",
			Self::Review => "review",
		}
	}
}
impl fmt::Display for ProjectStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for ProjectStatus {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self> {
		Self::ALL.into_iter().find(|status| status.as_str() == value).ok_or_else(|| {
			Error::InvalidRequest { message: format!("Unknown project status {value:?}.") }
		})
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectItem {
	pub project_id: Uuid,
	pub title: String,
	pub text: String,
	pub status: ProjectStatus,
	#[serde(with = "crate::time_serde::date")]
	pub created: Date,
	pub progress: Decimal,
}
impl TryFrom<Project> for ProjectItem {
	type Error = Error;

	fn try_from(project: Project) -> Result<Self> {
		let status: ProjectStatus = project.status.parse().map_err(|_| Error::Storage {
			message: format!("Project {} has unknown status {:?}.", project.project_id, project.status),
		})?;

		Ok(Self {
			project_id: project.project_id,
			title: project.title,
			text: project.text,
			status,
			created: project.created,
			progress: project.progress,
		})
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectListResponse {
	pub items: Vec<ProjectItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectCreateRequest {
	pub title: String,
	#[serde(default)]
	pub text: String,
	#[serde(default)]
	pub status: Option<ProjectStatus>,
	#[serde(default, with = "crate::time_serde::date::option")]
	pub created: Option<Date>,
	#[serde(default)]
	pub progress: Option<Decimal>,
}

/// Partial update: absent fields keep their stored value.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectUpdateRequest {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub text: Option<String>,
	#[serde(default)]
	pub status: Option<ProjectStatus>,
	#[serde(default, with = "crate::time_serde::date::option")]
	pub created: Option<Date>,
	#[serde(default)]
	pub progress: Option<Decimal>,
}

impl JotService {
	/// Lists every project regardless of who asks.
	pub async fn list_projects(&self) -> Result<ProjectListResponse> {
		let projects = queries::list_projects(&self.db.pool).await?;
		let items = projects.into_iter().map(ProjectItem::try_from).collect::<Result<Vec<_>>>()?;

		Ok(ProjectListResponse { items })
	}

	pub async fn create_project(&self, req: ProjectCreateRequest) -> Result<ProjectItem> {
		let project = Project {
			project_id: Uuid::new_v4(),
			title: req.title,
			text: req.text,
			status: req.status.unwrap_or_default().as_str().to_string(),
			created: req.created.unwrap_or_else(|| OffsetDateTime::now_utc().date()),
			progress: req.progress.unwrap_or(Decimal::ZERO),
		};
		let project = validate_project(project)?;

		queries::insert_project(&self.db.pool, &project).await?;

		tracing::info!(project_id = %project.project_id, status = %project.status, "Project created.");

		project.try_into()
	}

	pub async fn update_project(
		&self,
		project_id: Uuid,
		req: ProjectUpdateRequest,
	) -> Result<ProjectItem> {
		let mut project = queries::find_project(&self.db.pool, project_id)
			.await?
			.ok_or_else(project_not_found)?;

		if let Some(title) = req.title {
			project.title = title;
		}
		if let Some(text) = req.text {
			project.text = text;
		}
		if let Some(status) = req.status {
			project.status = status.as_str().to_string();
		}
		if let Some(created) = req.created {
			project.created = created;
		}
		if let Some(progress) = req.progress {
			project.progress = progress;
		}

		let project = validate_project(project)?;
		let updated = queries::update_project(&self.db.pool, &project)
			.await?
			.ok_or_else(project_not_found)?;

		tracing::info!(%project_id, status = %updated.status, "Project updated.");

		updated.try_into()
	}
}

fn validate_project(mut project: Project) -> Result<Project> {
	let mut fields = Vec::new();

	project.title =
		crate::check_text_field("title", &project.title, MAX_PROJECT_TITLE_CHARS, &mut fields);
	project.text = project.text.trim().to_string();

	if project.text.chars().count() > MAX_PROJECT_TEXT_CHARS as usize {
		fields.push("text".to_string());
	}
	if !progress_is_valid(project.progress) {
		fields.push("progress".to_string());
	}
	if !fields.is_empty() {
		return Err(crate::validation_error(
			"Projects need a title of at most 200 characters and a progress between 0 and 100 with two decimals.",
			fields,
		));
	}

	Ok(project)
}

fn progress_is_valid(progress: Decimal) -> bool {
	progress >= Decimal::ZERO
		&& progress <= Decimal::ONE_HUNDRED
		&& progress.normalize().scale() <= MAX_PROGRESS_SCALE
}

fn project_not_found() -> Error {
	Error::NotFound { message: "Project not found.".to_string() }
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use super::*;

	fn project(title: &str, progress: Decimal) -> Project {
		Project {
			project_id: Uuid::nil(),
			title: title.to_string(),
			text: " body ".to_string(),
			status: ProjectStatus::Draft.as_str().to_string(),
			created: date!(2020 - 12 - 10),
			progress,
		}
	}

	#[test]
	fn status_round_trips_through_storage_strings() {
		for status in ProjectStatus::ALL {
			assert_eq!(status.as_str().parse::<ProjectStatus>().expect("known status"), status);
		}

		assert!("shipped".parse::<ProjectStatus>().is_err());
		assert_eq!(ProjectStatus::default(), ProjectStatus::Draft);
	}

	#[test]
	fn status_serializes_lowercase() {
		let raw = serde_json::to_string(&ProjectStatus::Development).expect("serialize status");

		assert_eq!(raw, "\"development\"");
	}

	#[test]
	fn progress_bounds_and_scale_are_enforced() {
		assert!(progress_is_valid(Decimal::ZERO));
		assert!(progress_is_valid(Decimal::new(6_000, 2)));
		assert!(progress_is_valid(Decimal::ONE_HUNDRED));
		assert!(progress_is_valid(Decimal::new(12_500, 3)));
		assert!(!progress_is_valid(Decimal::new(-1, 2)));
		assert!(!progress_is_valid(Decimal::new(10_001, 2)));
		assert!(!progress_is_valid(Decimal::new(12_345, 3)));
	}

	#[test]
	fn validation_trims_and_reports_fields() {
		let ok = validate_project(project("  Web Designing ", Decimal::new(60, 0)))
			.expect("Expected valid project.");

		assert_eq!(ok.title, "Web Designing");
		assert_eq!(ok.text, "body");

		let err = validate_project(project(" ", Decimal::new(101, 0)))
			.expect_err("Expected invalid project.");

		match err {
			Error::Validation { fields, .. } =>
				assert_eq!(fields, vec!["title".to_string(), "progress".to_string()]),
			other => panic!("Unexpected error: {other:?}"),
		}
	}

	#[test]
	fn unknown_stored_status_is_a_storage_error() {
		let mut row = project("Web Designing", Decimal::ZERO);

		row.status = "archived".to_string();

		let err = ProjectItem::try_from(row).expect_err("Expected unknown status to fail.");

		assert!(matches!(err, Error::Storage { .. }));
	}

	#[test]
	fn create_request_defaults_optional_fields() {
		let req: ProjectCreateRequest =
			serde_json::from_str(r#"{"title":"Web Designing"}"#).expect("parse request");

		assert!(req.status.is_none());
		assert!(req.created.is_none());
		assert!(req.progress.is_none());
		assert_eq!(req.text, "");

		let req: ProjectCreateRequest = serde_json::from_str(
			r#"{"title":"Web","status":"review","created":"2020-12-10","progress":"60.5"}"#,
		)
		.expect("parse request");

		assert_eq!(req.status, Some(ProjectStatus::Review));
		assert_eq!(req.created, Some(date!(2020 - 12 - 10)));
		assert_eq!(req.progress, Some(Decimal::new(605, 1)));
	}
}
