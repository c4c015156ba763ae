use aide::transform::TransformOperation;
use axum::extract::{Path, State};

use crate::{
	extract::{Json, Query, Session},
	feed, model,
	openapi::tag,
	page::Page,
	AppState,
};

use super::{model as output, Error, RouteError};

pub fn get_profile_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Get profile")
		.description("Returns a user's profile with post and follow counts.")
		.tag(tag::PROFILE)
}

/// Returns a user's profile with post and follow counts.
pub async fn get_profile(
	State(state): State<AppState>,
	Path(username): Path<String>,
) -> Result<Json<output::Profile>, RouteError> {
	let user = state
		.store
		.user_by_username(&username)
		.ok_or(Error::UnknownUser(username))?;

	let stats = state.store.author_stats(user.id);

	Ok(Json(output::Profile { user, stats }))
}

pub fn get_profile_posts_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Profile feed")
		.description("Returns a page of the user's posts, newest first.")
		.tag(tag::PROFILE)
}

/// Returns a page of the user's posts, newest first.
pub async fn get_profile_posts(
	State(state): State<AppState>,
	Path(username): Path<String>,
	Query(paginate): Query<output::PaginateInput>,
) -> Result<Json<Page<model::Post>>, RouteError> {
	let page = feed::profile(&state.store, &username, &state.pager, paginate.page)
		.map_err(|_| Error::UnknownUser(username))?;

	Ok(Json(page))
}

pub fn follow_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Follow author")
		.description("Adds the author's posts to your follow feed. Following twice is an error.")
		.tag(tag::PROFILE)
}

/// Starts following an author.
pub async fn follow(
	State(state): State<AppState>,
	session: Session,
	Path(username): Path<String>,
) -> Result<(), RouteError> {
	let author = state
		.store
		.user_by_username(&username)
		.ok_or(Error::UnknownUser(username))?;

	state.store.follow(session.user.id, author.id)?;

	tracing::info!(user = %session.user.username, author = %author.username, "followed");

	Ok(())
}

pub fn unfollow_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Unfollow author")
		.description("Removes the author's posts from your follow feed.")
		.tag(tag::PROFILE)
}

/// Stops following an author.
pub async fn unfollow(
	State(state): State<AppState>,
	session: Session,
	Path(username): Path<String>,
) -> Result<(), RouteError> {
	let author = state
		.store
		.user_by_username(&username)
		.ok_or(Error::UnknownUser(username))?;

	state.store.unfollow(session.user.id, author.id)?;

	Ok(())
}
