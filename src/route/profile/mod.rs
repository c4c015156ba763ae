use std::borrow::Cow;

use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use serde_json::json;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown user {0}")]
	UnknownUser(String),
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
			Self::UnknownUser(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownUser(username) => vec![error::Message {
				content: "unknown_user".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("username".into(), json!(username));
					map
				})),
			}],
		}
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::{
		follow, follow_docs, get_profile, get_profile_docs, get_profile_posts,
		get_profile_posts_docs, unfollow, unfollow_docs,
	};

	ApiRouter::new()
		.api_route("/:username", get_with(get_profile, get_profile_docs))
		.api_route(
			"/:username/posts",
			get_with(get_profile_posts, get_profile_posts_docs),
		)
		.api_route(
			"/:username/follow",
			post_with(follow, follow_docs).delete_with(unfollow, unfollow_docs),
		)
}
