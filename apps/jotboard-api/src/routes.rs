use axum::{
	Extension, Form, Json, Router,
	extract::{
		Path, Request, State,
		rejection::{FormRejection, PathRejection},
	},
	http::{HeaderMap, StatusCode, header::AUTHORIZATION},
	middleware::{self, Next},
	response::{IntoResponse, Redirect, Response},
	routing::{get, post},
};
use serde::Serialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
	guard::{self, AuthPolicy, LOGIN_PATH, NOTES_PATH},
	state::AppState,
};
use jotboard_service::{
	Caller, Error as ServiceError, HomeResponse, LoginRequest, NoteInput, NoteItem,
	NoteListResponse, ProjectCreateRequest, ProjectItem, ProjectListResponse,
	ProjectUpdateRequest, SignupRequest, TaskCreateRequest, TaskItem, TaskListResponse,
};

const HOME_PATH: &str = "/";

pub fn router(state: AppState) -> Router {
	let sessions = guard::session_layer(state.sessions.clone(), &state.service.cfg.security);

	app(state).layer(sessions)
}

/// Public routes without the session layer. [`router`] backs them with the Postgres store.
pub fn app(state: AppState) -> Router {
	let public = Router::new()
		.route("/health", get(health))
		.route(HOME_PATH, get(home))
		.route("/projects", get(list_projects))
		.route("/login", post(login))
		.route("/logout", post(logout))
		.route_layer(middleware::from_fn_with_state(AuthPolicy::Public, guard::guard));
	let anonymous = Router::new()
		.route("/signup", post(signup))
		.route_layer(middleware::from_fn_with_state(AuthPolicy::AnonymousOnly, guard::guard));
	let authenticated = Router::new()
		.route("/board/authorized", get(authorized_board))
		.route(NOTES_PATH, get(list_notes).post(create_note))
		.route("/notes/{note_id}", get(get_note).post(update_note))
		.route("/notes/{note_id}/delete", post(delete_note))
		.route_layer(middleware::from_fn_with_state(AuthPolicy::Authenticated, guard::guard));

	public.merge(anonymous).merge(authenticated).with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/projects", post(create_project))
		.route("/v1/admin/projects/{project_id}", post(update_project))
		.route("/v1/admin/tasks", post(create_task))
		.route_layer(middleware::from_fn_with_state(state.clone(), admin_auth))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
	Json(state.service.home())
}

async fn authorized_board(
	State(state): State<AppState>,
	Extension(caller): Extension<Caller>,
) -> Result<Json<TaskListResponse>, ApiError> {
	let response = state.service.list_tasks(Some(&caller)).await?;

	Ok(Json(response))
}

async fn list_notes(
	State(state): State<AppState>,
	Extension(caller): Extension<Caller>,
) -> Result<Json<NoteListResponse>, ApiError> {
	let response = state.service.list_notes(Some(&caller)).await?;

	Ok(Json(response))
}

async fn create_note(
	State(state): State<AppState>,
	Extension(caller): Extension<Caller>,
	input: Result<Form<NoteInput>, FormRejection>,
) -> Result<Redirect, ApiError> {
	state.service.create_note(Some(&caller), form_body(input)?).await?;

	Ok(Redirect::to(NOTES_PATH))
}

async fn get_note(
	State(state): State<AppState>,
	Extension(caller): Extension<Caller>,
	note_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<NoteItem>, ApiError> {
	let response = state.service.get_note(Some(&caller), path_id(note_id, "Note")?).await?;

	Ok(Json(response))
}

async fn update_note(
	State(state): State<AppState>,
	Extension(caller): Extension<Caller>,
	note_id: Result<Path<Uuid>, PathRejection>,
	input: Result<Form<NoteInput>, FormRejection>,
) -> Result<Redirect, ApiError> {
	let note_id = path_id(note_id, "Note")?;

	state.service.update_note(Some(&caller), note_id, form_body(input)?).await?;

	Ok(Redirect::to(NOTES_PATH))
}

async fn delete_note(
	State(state): State<AppState>,
	Extension(caller): Extension<Caller>,
	note_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Redirect, ApiError> {
	state.service.delete_note(Some(&caller), path_id(note_id, "Note")?).await?;

	Ok(Redirect::to(NOTES_PATH))
}

async fn list_projects(
	State(state): State<AppState>,
) -> Result<Json<ProjectListResponse>, ApiError> {
	let response = state.service.list_projects().await?;

	Ok(Json(response))
}

async fn signup(
	State(state): State<AppState>,
	session: Session,
	req: Result<Form<SignupRequest>, FormRejection>,
) -> Result<Redirect, ApiError> {
	let caller = state.service.signup(form_body(req)?).await?;

	guard::establish(&session, caller).await?;

	Ok(Redirect::to(NOTES_PATH))
}

async fn login(
	State(state): State<AppState>,
	session: Session,
	req: Result<Form<LoginRequest>, FormRejection>,
) -> Result<Redirect, ApiError> {
	let caller = state.service.login(form_body(req)?).await?;

	guard::establish(&session, caller).await?;

	Ok(Redirect::to(NOTES_PATH))
}

async fn logout(session: Session, caller: Option<Extension<Caller>>) -> Result<Redirect, ApiError> {
	guard::clear(&session).await?;

	if let Some(Extension(caller)) = caller {
		tracing::info!(user_id = %caller.user_id, "Logged out.");
	}

	Ok(Redirect::to(HOME_PATH))
}

async fn create_project(
	State(state): State<AppState>,
	Json(payload): Json<ProjectCreateRequest>,
) -> Result<Json<ProjectItem>, ApiError> {
	let response = state.service.create_project(payload).await?;

	Ok(Json(response))
}

async fn update_project(
	State(state): State<AppState>,
	project_id: Result<Path<Uuid>, PathRejection>,
	Json(payload): Json<ProjectUpdateRequest>,
) -> Result<Json<ProjectItem>, ApiError> {
	let project_id = path_id(project_id, "Project")?;
	let response = state.service.update_project(project_id, payload).await?;

	Ok(Json(response))
}

async fn create_task(
	State(state): State<AppState>,
	Json(payload): Json<TaskCreateRequest>,
) -> Result<Json<TaskItem>, ApiError> {
	let response = state.service.create_task(payload).await?;

	Ok(Json(response))
}

async fn admin_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
	let Some(expected) = state.service.cfg.security.admin_auth_token.as_deref() else {
		return next.run(request).await;
	};
	if read_bearer_token(request.headers()) != Some(expected) {
		return json_error(
			StatusCode::UNAUTHORIZED,
			"UNAUTHORIZED",
			"Missing or invalid admin token.",
			None,
		)
		.into_response();
	}

	next.run(request).await
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}

/// Ids that do not parse cannot name a stored row.
fn path_id(path: Result<Path<Uuid>, PathRejection>, entity: &str) -> Result<Uuid, ApiError> {
	path.map(|Path(id)| id).map_err(|err| {
		tracing::debug!(error = %err, "Rejected path id.");

		json_error(StatusCode::NOT_FOUND, "NOT_FOUND", format!("{entity} not found."), None)
	})
}

fn form_body<T>(form: Result<Form<T>, FormRejection>) -> Result<T, ApiError> {
	form.map(|Form(value)| value).map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
	})
}

#[derive(Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
	/// Browser-facing failures answer with a redirect instead of a JSON body.
	location: Option<&'static str>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self {
			status,
			error_code: error_code.into(),
			message: message.into(),
			fields,
			location: None,
		}
	}

	fn redirect(location: &'static str, message: impl Into<String>) -> Self {
		Self {
			status: StatusCode::SEE_OTHER,
			error_code: "REDIRECT".to_string(),
			message: message.into(),
			fields: None,
			location: Some(location),
		}
	}

	fn internal() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal error.", None)
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Unauthenticated { message } => ApiError::redirect(LOGIN_PATH, message),
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			ServiceError::Validation { message, fields } => json_error(
				StatusCode::UNPROCESSABLE_ENTITY,
				"VALIDATION_FAILED",
				message,
				Some(fields),
			),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			ServiceError::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "CONFLICT", message, None),
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Storage failure.");

				ApiError::internal()
			},
			ServiceError::Internal { message } => {
				tracing::error!(error = %message, "Internal failure.");

				ApiError::internal()
			},
		}
	}
}

impl From<tower_sessions::session::Error> for ApiError {
	fn from(err: tower_sessions::session::Error) -> Self {
		tracing::error!(error = %err, "Session store failure.");

		ApiError::internal()
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		if let Some(location) = self.location {
			tracing::debug!(location, message = %self.message, "Redirecting request.");

			return Redirect::to(location).into_response();
		}

		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
