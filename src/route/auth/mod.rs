use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the message codes are presented to the client, so they should
/// not contain sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid email or password")]
	InvalidCredentials,
	#[error("password validation error")]
	Argon(#[from] argon2::Error),
	#[error("no session cookie")]
	NoSessionCookie,
	#[error("invalid session cookie")]
	InvalidSessionCookie,
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidCredentials | Self::NoSessionCookie | Self::InvalidSessionCookie => {
				StatusCode::UNAUTHORIZED
			}
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		let content = match self {
			Self::InvalidCredentials => "invalid_credentials",
			Self::NoSessionCookie => "no_session_cookie",
			Self::InvalidSessionCookie => "invalid_session_cookie",
			Self::Argon(..) => "internal_error",
		};

		vec![error::Message {
			content: content.into(),
			field: None,
			details: None,
		}]
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::{
		delete_me, delete_me_docs, login, login_docs, logout, logout_docs, me, me_docs, register,
		register_docs,
	};

	ApiRouter::new()
		.api_route("/register", post_with(register, register_docs))
		.api_route("/login", post_with(login, login_docs))
		.api_route("/logout", get_with(logout, logout_docs))
		.api_route("/me", get_with(me, me_docs).delete_with(delete_me, delete_me_docs))
}
