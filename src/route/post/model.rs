pub use crate::route::model::PaginateInput;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use validator::Validate;

/// Distinguishes an absent field from an explicit `null`.
fn explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	Option::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreatePostInput {
	/// The text of the post.
	#[validate(length(min = 1, max = 10_000))]
	pub text: String,
	/// The group to publish the post under, if any.
	pub group: Option<Uuid>,
	/// Opaque reference to an attached image.
	#[validate(length(min = 1, max = 512))]
	pub image: Option<String>,
}

/// Fields left out are kept as they are; sending `null` for `group` or
/// `image` clears them.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct UpdatePostInput {
	#[validate(length(min = 1, max = 10_000))]
	pub text: Option<String>,
	#[serde(default, deserialize_with = "explicit_null")]
	pub group: Option<Option<Uuid>>,
	#[serde(default, deserialize_with = "explicit_null")]
	#[validate(length(min = 1, max = 512))]
	pub image: Option<Option<String>>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreateCommentInput {
	/// The text of the comment.
	#[validate(length(min = 1, max = 2_000))]
	pub text: String,
}
