//! Feed composition: which posts are visible for each feed scope.
//!
//! Each function resolves its scope key, delegates the count-and-slice to
//! the store and returns one page in canonical newest-first order. All four
//! feeds are pure reads.

use uuid::Uuid;

use crate::{
	model::Post,
	page::{Page, Pager},
	store::{PostFilter, Store},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown group {0}")]
	UnknownGroup(String),
	#[error("unknown user {0}")]
	UnknownUser(String),
}

/// Every post on the platform, newest first.
#[must_use]
pub fn global(store: &Store, pager: &Pager, page: Option<u64>) -> Page<Post> {
	store.posts_page(&PostFilter::All, pager, page)
}

/// Posts published under the group with `slug`, newest first.
///
/// A group with no posts yields an empty page, not an error.
pub fn group(
	store: &Store,
	slug: &str,
	pager: &Pager,
	page: Option<u64>,
) -> Result<Page<Post>, Error> {
	let group = store
		.group_by_slug(slug)
		.ok_or_else(|| Error::UnknownGroup(slug.to_owned()))?;

	Ok(store.posts_page(&PostFilter::Group(group.id), pager, page))
}

/// Posts authored by `username`, newest first.
pub fn profile(
	store: &Store,
	username: &str,
	pager: &Pager,
	page: Option<u64>,
) -> Result<Page<Post>, Error> {
	let author = store
		.user_by_username(username)
		.ok_or_else(|| Error::UnknownUser(username.to_owned()))?;

	Ok(store.posts_page(&PostFilter::Author(author.id), pager, page))
}

/// Posts by the authors that `user_id` follows, newest first.
///
/// Empty when the user follows no one. Callers are responsible for only
/// passing an authenticated user.
#[must_use]
pub fn following(store: &Store, user_id: Uuid, pager: &Pager, page: Option<u64>) -> Page<Post> {
	store.posts_page(&PostFilter::Authors(store.following(user_id)), pager, page)
}
