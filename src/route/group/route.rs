use aide::transform::TransformOperation;
use axum::extract::{Path, State};

use crate::{
	extract::{Json, Query, Session},
	feed, model,
	openapi::tag,
	page::Page,
	store, AppState,
};

use super::{model as input, Error, RouteError};

fn is_url_safe(slug: &str) -> bool {
	slug.chars()
		.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn get_groups_docs(op: TransformOperation) -> TransformOperation {
	op.summary("List groups")
		.description("Returns every group, ordered by slug.")
		.tag(tag::GROUP)
}

/// Returns every group, ordered by slug.
pub async fn get_groups(State(state): State<AppState>) -> Json<Vec<model::Group>> {
	Json(state.store.groups())
}

pub fn create_group_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Create group")
		.description("Creates a new group with a unique, URL-safe slug.")
		.tag(tag::GROUP)
}

/// Creates a new group.
pub async fn create_group(
	State(state): State<AppState>,
	session: Session,
	Json(input): Json<input::CreateGroupInput>,
) -> Result<Json<model::Group>, RouteError> {
	if !is_url_safe(&input.slug) {
		return Err(Error::InvalidSlug.into());
	}

	let group = state
		.store
		.create_group(input.slug, input.title, input.description)?;

	tracing::info!(user = %session.user.username, slug = %group.slug, "created group");

	Ok(Json(group))
}

pub fn get_group_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Get group")
		.description("Returns a single group by its slug.")
		.tag(tag::GROUP)
}

/// Returns a single group by its slug.
pub async fn get_group(
	State(state): State<AppState>,
	Path(slug): Path<String>,
) -> Result<Json<model::Group>, RouteError> {
	let group = state.store.group_by_slug(&slug);

	Ok(Json(group.ok_or(Error::UnknownGroup(slug))?))
}

pub fn update_group_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Update group")
		.description("Updates a group's title or description.")
		.tag(tag::GROUP)
}

/// Updates a group's title or description.
pub async fn update_group(
	State(state): State<AppState>,
	_session: Session,
	Path(slug): Path<String>,
	Json(input): Json<input::UpdateGroupInput>,
) -> Result<Json<model::Group>, RouteError> {
	let group = state
		.store
		.update_group(&slug, input.title, input.description)
		.map_err(|error| match error {
			store::Error::UnknownGroup => Error::UnknownGroup(slug).into(),
			error => RouteError::Store(error),
		})?;

	Ok(Json(group))
}

pub fn delete_group_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Delete group")
		.description("Deletes a group. Its posts are kept and detached from the group.")
		.tag(tag::GROUP)
}

/// Deletes a group. Posts published under it are detached, not deleted.
pub async fn delete_group(
	State(state): State<AppState>,
	session: Session,
	Path(slug): Path<String>,
) -> Result<(), RouteError> {
	state.store.delete_group(&slug).map_err(|error| match error {
		store::Error::UnknownGroup => Error::UnknownGroup(slug.clone()).into(),
		error => RouteError::Store(error),
	})?;

	tracing::info!(user = %session.user.username, slug = %slug, "deleted group");

	Ok(())
}

pub fn get_group_posts_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Group feed")
		.description("Returns a page of the group's posts, newest first.")
		.tag(tag::GROUP)
}

/// Returns a page of the group's posts, newest first.
pub async fn get_group_posts(
	State(state): State<AppState>,
	Path(slug): Path<String>,
	Query(paginate): Query<input::PaginateInput>,
) -> Result<Json<Page<model::Post>>, RouteError> {
	let page = feed::group(&state.store, &slug, &state.pager, paginate.page)
		.map_err(|_| Error::UnknownGroup(slug))?;

	Ok(Json(page))
}
