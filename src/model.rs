use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

/// A registered user.
///
/// Use this when fetching from the store and returning to the client.
/// The `email` and `password` fields are not serialized to the client.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct User {
	pub id: Uuid,
	#[serde(skip_serializing)]
	#[schemars(skip)]
	pub email: String,
	/// Argon2 output, salted with `id`.
	#[serde(skip_serializing)]
	#[schemars(skip)]
	pub password: Vec<u8>,
	pub username: String,
	pub created_at: DateTime<Utc>,
}

/// A topic that posts can be published under.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Group {
	pub id: Uuid,
	/// Unique, URL-safe identifier of the group.
	pub slug: String,
	pub title: String,
	pub description: String,
}

/// A single post, written by a user and optionally tagged to a group.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Post {
	pub id: Uuid,
	pub author_id: Uuid,
	/// The group the post belongs to, if any. Cleared when the group
	/// is deleted.
	pub group_id: Option<Uuid>,
	pub text: String,
	/// Opaque reference to an attached image.
	pub image: Option<String>,
	/// Assigned at creation and immutable thereafter.
	pub published_at: DateTime<Utc>,
}

/// A comment on a post.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Comment {
	pub id: Uuid,
	pub post_id: Uuid,
	pub author_id: Uuid,
	pub text: String,
	pub published_at: DateTime<Utc>,
}
