use aide::transform::TransformOperation;
use argon2::Argon2;
use axum::{
	body::Body,
	extract::State,
	http::{header, Response},
	response::IntoResponse,
};
use uuid::Uuid;

use crate::{
	extract::{Json, Session},
	model, openapi::tag, session, AppState,
};

use super::{model as input, Error, RouteError};

pub const KEY_LENGTH: usize = 32;

/// Response that sets or clears the session cookie.
pub struct SessionCookie(cookie::Cookie<'static>);

impl IntoResponse for SessionCookie {
	fn into_response(self) -> Response<Body> {
		[(header::SET_COOKIE, self.0.to_string())].into_response()
	}
}

impl aide::OperationOutput for SessionCookie {
	type Inner = ();
}

/// Hashes a password with Argon2, using the user's id as a salt.
/// Since this is only used for logging in and creating a new password,
/// the scope of this function can remain in here with no issues.
fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

pub fn register_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Register")
		.description("Creates an account and returns a session cookie.")
		.tag(tag::AUTH)
}

/// Registers a new account, returning an associated session cookie.
pub async fn register(
	State(state): State<AppState>,
	Json(input): Json<input::RegisterInput>,
) -> Result<SessionCookie, RouteError> {
	let user_id = Uuid::new_v4();
	let hashed = hash_password(&state.hasher, &input.password, &user_id).map_err(Error::Argon)?;

	let user = state
		.store
		.create_user(user_id, input.email, input.username, hashed.to_vec())?;

	let session_id = state.store.create_session(user.id);

	tracing::info!(username = %user.username, "registered user");

	Ok(SessionCookie(session::create_cookie(session_id)))
}

pub fn login_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Log in")
		.description("Returns a session cookie, assuming the credentials are valid.")
		.tag(tag::AUTH)
}

/// Returns a session cookie, assuming the credentials are valid.
pub async fn login(
	State(state): State<AppState>,
	Json(input): Json<input::LoginInput>,
) -> Result<SessionCookie, RouteError> {
	let Some(user) = state.store.user_by_email(&input.email) else {
		return Err(Error::InvalidCredentials.into());
	};

	let hashed = hash_password(&state.hasher, &input.password, &user.id).map_err(Error::Argon)?;

	if user.password != hashed {
		return Err(Error::InvalidCredentials.into());
	}

	let session_id = state.store.create_session(user.id);

	Ok(SessionCookie(session::create_cookie(session_id)))
}

pub fn logout_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Log out")
		.description("Invalidates the current session and clears its cookie.")
		.tag(tag::AUTH)
}

/// Logs out of the authenticated account.
pub async fn logout(State(state): State<AppState>, session: Session) -> SessionCookie {
	state.store.delete_session(session.id);

	SessionCookie(session::clear_cookie())
}

pub fn me_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Current user")
		.description("Returns the authenticated user.")
		.tag(tag::AUTH)
}

/// Returns the authenticated user.
pub async fn me(session: Session) -> Json<model::User> {
	Json(session.user)
}

pub fn delete_me_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Delete account")
		.description(
			"Deletes the authenticated account along with its posts, comments and follow edges.",
		)
		.tag(tag::AUTH)
}

/// Deletes the authenticated account. The store cascades to everything the
/// user owns.
pub async fn delete_me(
	State(state): State<AppState>,
	session: Session,
) -> Result<SessionCookie, RouteError> {
	state.store.delete_user(session.user.id)?;

	tracing::info!(username = %session.user.username, "deleted account");

	Ok(SessionCookie(session::clear_cookie()))
}
