use aide::transform::TransformOperation;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::{
	extract::{Json, Query, Session},
	feed, model,
	openapi::tag,
	page::Page,
	store, AppState,
};

use super::{model as input, Error, RouteError};

pub fn get_posts_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Global feed")
		.description("Returns a page of all posts, newest first. Served from a short-lived cache.")
		.tag(tag::POST)
}

/// Returns a page of all posts, newest first.
///
/// Responses are cached per page number for a fixed window, so a brand new
/// post may take a few seconds to appear here.
pub async fn get_posts(
	State(state): State<AppState>,
	Query(paginate): Query<input::PaginateInput>,
) -> Json<Page<model::Post>> {
	let page = state
		.cache
		.page(paginate.page, || {
			feed::global(&state.store, &state.pager, paginate.page)
		})
		.await;

	Json(page)
}

pub fn get_following_posts_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Follow feed")
		.description("Returns a page of posts by the authors you follow, newest first.")
		.tag(tag::POST)
}

/// Returns a page of posts written by the authors the authenticated user
/// follows, newest first.
pub async fn get_following_posts(
	State(state): State<AppState>,
	session: Session,
	Query(paginate): Query<input::PaginateInput>,
) -> Json<Page<model::Post>> {
	Json(feed::following(
		&state.store,
		session.user.id,
		&state.pager,
		paginate.page,
	))
}

pub fn create_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Create post")
		.description("Creates a new post, optionally tagged to a group.")
		.tag(tag::POST)
}

/// Creates a new post.
pub async fn create_post(
	State(state): State<AppState>,
	session: Session,
	Json(input): Json<input::CreatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = state
		.store
		.create_post(session.user.id, input.text, input.group, input.image)?;

	tracing::info!(author = %session.user.username, post = %post.id, "created post");

	Ok(Json(post))
}

pub fn get_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Get single post")
		.description("Returns a single post by its unique id.")
		.tag(tag::POST)
}

/// Returns a single post by its unique id.
pub async fn get_post(
	State(state): State<AppState>,
	Path(post_id): Path<Uuid>,
) -> Result<Json<model::Post>, RouteError> {
	let post = state.store.post(post_id);

	Ok(Json(post.ok_or(Error::UnknownPost(post_id))?))
}

pub fn update_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Update post")
		.description("Updates an existing post. Only the author may do this.")
		.tag(tag::POST)
}

/// Updates an existing post by its unique id.
pub async fn update_post(
	State(state): State<AppState>,
	session: Session,
	Path(post_id): Path<Uuid>,
	Json(input): Json<input::UpdatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = state
		.store
		.update_post(post_id, session.user.id, input.text, input.group, input.image)
		.map_err(|error| match error {
			store::Error::UnknownPost => Error::UnknownPost(post_id).into(),
			error => RouteError::Store(error),
		})?;

	Ok(Json(post))
}

pub fn delete_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Delete post")
		.description("Deletes an existing post and its comments. Only the author may do this.")
		.tag(tag::POST)
}

/// Deletes an existing post by its unique id.
pub async fn delete_post(
	State(state): State<AppState>,
	session: Session,
	Path(post_id): Path<Uuid>,
) -> Result<(), RouteError> {
	state
		.store
		.delete_post(post_id, session.user.id)
		.map_err(|error| match error {
			store::Error::UnknownPost => Error::UnknownPost(post_id).into(),
			error => RouteError::Store(error),
		})?;

	Ok(())
}

pub fn get_comments_docs(op: TransformOperation) -> TransformOperation {
	op.summary("List comments")
		.description("Returns the comments on a post, oldest first.")
		.tag(tag::POST)
}

/// Returns the comments on a post, in insertion order.
pub async fn get_comments(
	State(state): State<AppState>,
	Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<model::Comment>>, RouteError> {
	let comments = state.store.comments(post_id).map_err(|error| match error {
		store::Error::UnknownPost => Error::UnknownPost(post_id).into(),
		error => RouteError::Store(error),
	})?;

	Ok(Json(comments))
}

pub fn create_comment_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Create comment")
		.description("Adds a comment to a post.")
		.tag(tag::POST)
}

/// Adds a comment to a post.
pub async fn create_comment(
	State(state): State<AppState>,
	session: Session,
	Path(post_id): Path<Uuid>,
	Json(input): Json<input::CreateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = state
		.store
		.create_comment(post_id, session.user.id, input.text)
		.map_err(|error| match error {
			store::Error::UnknownPost => Error::UnknownPost(post_id).into(),
			error => RouteError::Store(error),
		})?;

	Ok(Json(comment))
}
