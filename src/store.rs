//! In-memory relational tables for users, groups, posts, comments and
//! follow edges.
//!
//! On-delete rules are enforced here rather than by a database: deleting a
//! user removes their posts, comments, sessions and follow edges; deleting a
//! post removes its comments; deleting a group detaches its posts instead of
//! deleting them. Every cascade runs inside the same write-lock critical
//! section, so readers never observe a half-applied cascade.

use std::{
	collections::{BTreeMap, BTreeSet, HashMap},
	sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::Utc;
use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

use crate::{
	model::{Comment, Group, Post, User},
	page::{Page, Pager},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("email already taken")]
	EmailTaken,
	#[error("username already taken")]
	UsernameTaken,
	#[error("group slug already taken")]
	SlugTaken,
	#[error("unknown group")]
	UnknownGroup,
	#[error("unknown post")]
	UnknownPost,
	#[error("unknown user")]
	UnknownUser,
	#[error("already following this author")]
	AlreadyFollowing,
	#[error("not following this author")]
	NotFollowing,
}

/// Filter applied when selecting posts for a feed.
#[derive(Debug, Clone)]
pub enum PostFilter {
	All,
	Group(Uuid),
	Author(Uuid),
	Authors(Vec<Uuid>),
}

impl PostFilter {
	fn matches(&self, post: &Post) -> bool {
		match self {
			Self::All => true,
			Self::Group(group) => post.group_id == Some(*group),
			Self::Author(author) => post.author_id == *author,
			Self::Authors(authors) => authors.contains(&post.author_id),
		}
	}
}

/// Aggregate counts shown on a profile.
#[derive(Debug, Clone, Copy, Serialize, JsonSchema)]
pub struct AuthorStats {
	pub posts: usize,
	pub followers: usize,
	pub following: usize,
}

#[derive(Debug, Default)]
struct Tables {
	users: HashMap<Uuid, User>,
	sessions: HashMap<Uuid, Uuid>,
	groups: HashMap<Uuid, Group>,
	/// Posts keyed by insertion sequence; iterating in reverse yields the
	/// canonical newest-first feed order.
	posts: BTreeMap<u64, Post>,
	post_seq: HashMap<Uuid, u64>,
	comments: BTreeMap<u64, Comment>,
	follows: BTreeSet<(Uuid, Uuid)>,
	seq: u64,
}

impl Tables {
	fn next_seq(&mut self) -> u64 {
		self.seq += 1;
		self.seq
	}
}

/// Handle to the shared tables. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Store {
	tables: Arc<RwLock<Tables>>,
}

impl Store {
	fn read(&self) -> RwLockReadGuard<'_, Tables> {
		self.tables.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, Tables> {
		self.tables.write().unwrap_or_else(PoisonError::into_inner)
	}

	/// Inserts a user with the caller-provided id.
	///
	/// The id is chosen by the caller because the password hash is salted
	/// with it before the user exists.
	pub fn create_user(
		&self,
		id: Uuid,
		email: String,
		username: String,
		password: Vec<u8>,
	) -> Result<User, Error> {
		let mut tables = self.write();

		if tables.users.values().any(|user| user.email == email) {
			return Err(Error::EmailTaken);
		}

		if tables.users.values().any(|user| user.username == username) {
			return Err(Error::UsernameTaken);
		}

		let user = User {
			id,
			email,
			username,
			password,
			created_at: Utc::now(),
		};

		tables.users.insert(id, user.clone());
		Ok(user)
	}

	pub fn user_by_email(&self, email: &str) -> Option<User> {
		self.read()
			.users
			.values()
			.find(|user| user.email == email)
			.cloned()
	}

	pub fn user_by_username(&self, username: &str) -> Option<User> {
		self.read()
			.users
			.values()
			.find(|user| user.username == username)
			.cloned()
	}

	/// Removes a user and everything that hangs off them: their posts (and
	/// those posts' comments), their own comments, their sessions, and any
	/// follow edge with the user at either end.
	pub fn delete_user(&self, id: Uuid) -> Result<(), Error> {
		let mut guard = self.write();
		let tables = &mut *guard;

		if tables.users.remove(&id).is_none() {
			return Err(Error::UnknownUser);
		}

		let Tables {
			posts,
			post_seq,
			comments,
			follows,
			sessions,
			..
		} = tables;

		posts.retain(|_, post| post.author_id != id);
		post_seq.retain(|_, seq| posts.contains_key(seq));
		comments.retain(|_, comment| {
			comment.author_id != id && post_seq.contains_key(&comment.post_id)
		});
		follows.retain(|(user, author)| *user != id && *author != id);
		sessions.retain(|_, user| *user != id);

		Ok(())
	}

	pub fn create_session(&self, user_id: Uuid) -> Uuid {
		let id = Uuid::new_v4();

		self.write().sessions.insert(id, user_id);
		id
	}

	pub fn delete_session(&self, id: Uuid) -> bool {
		self.write().sessions.remove(&id).is_some()
	}

	pub fn session_user(&self, id: Uuid) -> Option<User> {
		let tables = self.read();

		tables
			.sessions
			.get(&id)
			.and_then(|user_id| tables.users.get(user_id))
			.cloned()
	}

	pub fn create_group(
		&self,
		slug: String,
		title: String,
		description: String,
	) -> Result<Group, Error> {
		let mut tables = self.write();

		if tables.groups.values().any(|group| group.slug == slug) {
			return Err(Error::SlugTaken);
		}

		let group = Group {
			id: Uuid::new_v4(),
			slug,
			title,
			description,
		};

		tables.groups.insert(group.id, group.clone());
		Ok(group)
	}

	pub fn groups(&self) -> Vec<Group> {
		let mut groups = self.read().groups.values().cloned().collect::<Vec<_>>();

		groups.sort_by(|a, b| a.slug.cmp(&b.slug));
		groups
	}

	pub fn group_by_slug(&self, slug: &str) -> Option<Group> {
		self.read()
			.groups
			.values()
			.find(|group| group.slug == slug)
			.cloned()
	}

	pub fn update_group(
		&self,
		slug: &str,
		title: Option<String>,
		description: Option<String>,
	) -> Result<Group, Error> {
		let mut tables = self.write();
		let group = tables
			.groups
			.values_mut()
			.find(|group| group.slug == slug)
			.ok_or(Error::UnknownGroup)?;

		if let Some(title) = title {
			group.title = title;
		}

		if let Some(description) = description {
			group.description = description;
		}

		Ok(group.clone())
	}

	/// Deleting a group detaches its posts rather than deleting them.
	pub fn delete_group(&self, slug: &str) -> Result<(), Error> {
		let mut tables = self.write();
		let id = tables
			.groups
			.values()
			.find(|group| group.slug == slug)
			.map(|group| group.id)
			.ok_or(Error::UnknownGroup)?;

		tables.groups.remove(&id);

		for post in tables
			.posts
			.values_mut()
			.filter(|post| post.group_id == Some(id))
		{
			post.group_id = None;
		}

		Ok(())
	}

	pub fn create_post(
		&self,
		author_id: Uuid,
		text: String,
		group_id: Option<Uuid>,
		image: Option<String>,
	) -> Result<Post, Error> {
		let mut tables = self.write();

		if !tables.users.contains_key(&author_id) {
			return Err(Error::UnknownUser);
		}

		if let Some(group_id) = group_id {
			if !tables.groups.contains_key(&group_id) {
				return Err(Error::UnknownGroup);
			}
		}

		// Publication timestamps never move backwards, so reverse sequence
		// order is also descending publication order.
		let published_at = tables
			.posts
			.values()
			.next_back()
			.map_or_else(Utc::now, |last| Utc::now().max(last.published_at));

		let post = Post {
			id: Uuid::new_v4(),
			author_id,
			group_id,
			text,
			image,
			published_at,
		};

		let seq = tables.next_seq();

		tables.post_seq.insert(post.id, seq);
		tables.posts.insert(seq, post.clone());
		Ok(post)
	}

	pub fn post(&self, id: Uuid) -> Option<Post> {
		let tables = self.read();

		tables
			.post_seq
			.get(&id)
			.and_then(|seq| tables.posts.get(seq))
			.cloned()
	}

	/// Only the author may edit a post; to anyone else it behaves as if the
	/// post does not exist.
	///
	/// The outer `Option` on `group_id` and `image` distinguishes "leave as
	/// is" (`None`) from "set", where setting to `None` clears the field.
	pub fn update_post(
		&self,
		id: Uuid,
		author_id: Uuid,
		text: Option<String>,
		group_id: Option<Option<Uuid>>,
		image: Option<Option<String>>,
	) -> Result<Post, Error> {
		let mut guard = self.write();
		let tables = &mut *guard;

		if let Some(Some(group_id)) = group_id {
			if !tables.groups.contains_key(&group_id) {
				return Err(Error::UnknownGroup);
			}
		}

		let post = tables
			.post_seq
			.get(&id)
			.and_then(|seq| tables.posts.get_mut(seq))
			.ok_or(Error::UnknownPost)?;

		if post.author_id != author_id {
			return Err(Error::UnknownPost);
		}

		if let Some(text) = text {
			post.text = text;
		}

		if let Some(group_id) = group_id {
			post.group_id = group_id;
		}

		if let Some(image) = image {
			post.image = image;
		}

		Ok(post.clone())
	}

	/// Removes a post and its comments. Author-only, like [`Self::update_post`].
	pub fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<(), Error> {
		let mut tables = self.write();
		let seq = *tables.post_seq.get(&id).ok_or(Error::UnknownPost)?;
		let post = tables.posts.get(&seq).ok_or(Error::UnknownPost)?;

		if post.author_id != author_id {
			return Err(Error::UnknownPost);
		}

		tables.posts.remove(&seq);
		tables.post_seq.remove(&id);
		tables.comments.retain(|_, comment| comment.post_id != id);

		Ok(())
	}

	pub fn create_comment(
		&self,
		post_id: Uuid,
		author_id: Uuid,
		text: String,
	) -> Result<Comment, Error> {
		let mut tables = self.write();

		if !tables.post_seq.contains_key(&post_id) {
			return Err(Error::UnknownPost);
		}

		if !tables.users.contains_key(&author_id) {
			return Err(Error::UnknownUser);
		}

		let comment = Comment {
			id: Uuid::new_v4(),
			post_id,
			author_id,
			text,
			published_at: Utc::now(),
		};

		let seq = tables.next_seq();

		tables.comments.insert(seq, comment.clone());
		Ok(comment)
	}

	/// Comments on a post, in insertion order.
	pub fn comments(&self, post_id: Uuid) -> Result<Vec<Comment>, Error> {
		let tables = self.read();

		if !tables.post_seq.contains_key(&post_id) {
			return Err(Error::UnknownPost);
		}

		Ok(tables
			.comments
			.values()
			.filter(|comment| comment.post_id == post_id)
			.cloned()
			.collect())
	}

	/// Records that `user_id` follows `author_id`. The edge is unique; the
	/// store does not forbid a user following themselves.
	pub fn follow(&self, user_id: Uuid, author_id: Uuid) -> Result<(), Error> {
		let mut tables = self.write();

		if !tables.users.contains_key(&author_id) {
			return Err(Error::UnknownUser);
		}

		if !tables.follows.insert((user_id, author_id)) {
			return Err(Error::AlreadyFollowing);
		}

		Ok(())
	}

	pub fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<(), Error> {
		if self.write().follows.remove(&(user_id, author_id)) {
			Ok(())
		} else {
			Err(Error::NotFollowing)
		}
	}

	/// Authors that `user_id` follows.
	pub fn following(&self, user_id: Uuid) -> Vec<Uuid> {
		self.read()
			.follows
			.iter()
			.filter(|(user, _)| *user == user_id)
			.map(|(_, author)| *author)
			.collect()
	}

	pub fn author_stats(&self, user_id: Uuid) -> AuthorStats {
		let tables = self.read();

		AuthorStats {
			posts: tables
				.posts
				.values()
				.filter(|post| post.author_id == user_id)
				.count(),
			followers: tables
				.follows
				.iter()
				.filter(|(_, author)| *author == user_id)
				.count(),
			following: tables
				.follows
				.iter()
				.filter(|(user, _)| *user == user_id)
				.count(),
		}
	}

	/// Selects one feed page: a count pass, then a bounded fetch of just the
	/// requested window, both under a single read lock.
	pub fn posts_page(
		&self,
		filter: &PostFilter,
		pager: &Pager,
		requested: Option<u64>,
	) -> Page<Post> {
		let tables = self.read();

		let total = tables
			.posts
			.values()
			.filter(|post| filter.matches(post))
			.count();
		let number = pager.clamp(total, requested);
		let items = tables
			.posts
			.values()
			.rev()
			.filter(|post| filter.matches(post))
			.skip(pager.offset(number))
			.take(pager.size())
			.cloned()
			.collect();

		pager.assemble(items, total, number)
	}
}
