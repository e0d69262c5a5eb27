//! Session-backed access policies for route groups.
//!
//! The session stores only the user id under [`USER_ID_KEY`]. [`guard`] resolves it into a
//! [`Caller`] request extension before the handler runs.

use axum::{
	extract::{Request, State},
	middleware::Next,
	response::{IntoResponse, Redirect, Response},
};
use time::Duration;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore, cookie::SameSite};
use uuid::Uuid;

use crate::routes::ApiError;
use jotboard_service::Caller;

pub const USER_ID_KEY: &str = "user_id";
pub const LOGIN_PATH: &str = "/login";
pub const NOTES_PATH: &str = "/notes";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthPolicy {
	/// Anyone; the caller is attached when a session exists.
	Public,
	/// Requires a logged-in caller; anonymous requests go to the login page.
	Authenticated,
	/// Only for anonymous visitors; logged-in callers go to their notes.
	AnonymousOnly,
}

pub fn session_layer<S>(store: S, security: &jotboard_config::Security) -> SessionManagerLayer<S>
where
	S: SessionStore + Clone,
{
	SessionManagerLayer::new(store)
		.with_secure(security.session_secure_cookie)
		.with_same_site(SameSite::Lax)
		.with_expiry(Expiry::OnInactivity(Duration::days(security.session_inactivity_days)))
}

pub async fn guard(
	State(policy): State<AuthPolicy>,
	session: Session,
	mut request: Request,
	next: Next,
) -> Response {
	let caller = match current_caller(&session).await {
		Ok(caller) => caller,
		Err(err) => return err.into_response(),
	};

	match (policy, caller) {
		(AuthPolicy::Authenticated, None) => return Redirect::to(LOGIN_PATH).into_response(),
		(AuthPolicy::AnonymousOnly, Some(_)) => return Redirect::to(NOTES_PATH).into_response(),
		_ => {},
	}

	if let Some(caller) = caller {
		request.extensions_mut().insert(caller);
	}

	next.run(request).await
}

pub async fn current_caller(session: &Session) -> Result<Option<Caller>, ApiError> {
	let user_id = session.get::<Uuid>(USER_ID_KEY).await?;

	Ok(user_id.map(|user_id| Caller { user_id }))
}

/// Binds the caller to a fresh session id.
pub async fn establish(session: &Session, caller: Caller) -> Result<(), ApiError> {
	session.cycle_id().await?;
	session.insert(USER_ID_KEY, caller.user_id).await?;

	Ok(())
}

pub async fn clear(session: &Session) -> Result<(), ApiError> {
	session.flush().await?;

	Ok(())
}
