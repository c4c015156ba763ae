use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::store;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error presented to the client.
///
/// `content` is a stable machine-readable code; anything extra goes into
/// `details`. Display output of the underlying error is not sent to the
/// client, so it may contain sensitive information.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'e> {
	pub content: Cow<'e, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'e, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'e, Map>>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'e> {
	pub success: bool,
	pub errors: Vec<Message<'e>>,
}

fn respond(status: StatusCode, errors: Vec<Message<'_>>) -> Response<Body> {
	(
		status,
		Json(ErrorResponse {
			success: false,
			errors,
		}),
	)
		.into_response()
}

/// How a route error maps onto an HTTP response.
pub trait ErrorShape {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;

	fn response(&self) -> Response<Body> {
		respond(self.status(), self.errors())
	}
}

/// Errors produced by the framework before a handler runs: body or query
/// rejections and input validation failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
}

impl AppError {
	fn status(&self) -> StatusCode {
		StatusCode::BAD_REQUEST
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| Message {
						content: error.code.clone(),
						field: Some(Cow::Borrowed(field)),
						details: None,
					})
				})
				.collect(),
			Self::Json(..) => vec![Message {
				content: "invalid_json".into(),
				field: None,
				details: None,
			}],
			Self::Query(..) => vec![Message {
				content: "invalid_query".into(),
				field: None,
				details: None,
			}],
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		respond(self.status(), self.errors())
	}
}

impl ErrorShape for store::Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownGroup | Self::UnknownPost | Self::UnknownUser => StatusCode::NOT_FOUND,
			Self::EmailTaken
			| Self::UsernameTaken
			| Self::SlugTaken
			| Self::AlreadyFollowing
			| Self::NotFollowing => StatusCode::CONFLICT,
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		let content = match self {
			Self::EmailTaken => "email_taken",
			Self::UsernameTaken => "username_taken",
			Self::SlugTaken => "slug_taken",
			Self::UnknownGroup => "unknown_group",
			Self::UnknownPost => "unknown_post",
			Self::UnknownUser => "unknown_user",
			Self::AlreadyFollowing => "already_following",
			Self::NotFollowing => "not_following",
		};

		vec![Message {
			content: content.into(),
			field: None,
			details: None,
		}]
	}
}

/// Error type for a single route: either a shared application failure, a
/// store constraint violation, or the route's own domain error.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<E> {
	#[error(transparent)]
	App(AppError),
	#[error(transparent)]
	Store(store::Error),
	#[error(transparent)]
	Route(E),
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<store::Error> for RouteError<E> {
	fn from(error: store::Error) -> Self {
		Self::Store(error)
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Store(error) => error.response(),
			Self::Route(error) => error.response(),
		}
	}
}

impl<E> aide::OperationOutput for RouteError<E> {
	type Inner = Self;
}
