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
	#[error("unknown group {0}")]
	UnknownGroup(String),
	#[error("slug contains characters that are not URL-safe")]
	InvalidSlug,
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
			Self::UnknownGroup(..) => StatusCode::NOT_FOUND,
			Self::InvalidSlug => StatusCode::BAD_REQUEST,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownGroup(slug) => vec![error::Message {
				content: "unknown_group".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("slug".into(), json!(slug));
					map
				})),
			}],
			Self::InvalidSlug => vec![error::Message {
				content: "invalid_slug".into(),
				field: Some("slug".into()),
				details: None,
			}],
		}
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::{
		create_group, create_group_docs, delete_group, delete_group_docs, get_group,
		get_group_docs, get_group_posts, get_group_posts_docs, get_groups, get_groups_docs,
		update_group, update_group_docs,
	};

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_groups, get_groups_docs).post_with(create_group, create_group_docs),
		)
		.api_route(
			"/:slug",
			get_with(get_group, get_group_docs)
				.put_with(update_group, update_group_docs)
				.delete_with(delete_group, delete_group_docs),
		)
		.api_route("/:slug/posts", get_with(get_group_posts, get_group_posts_docs))
}
