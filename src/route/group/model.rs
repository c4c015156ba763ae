pub use crate::route::model::PaginateInput;

use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreateGroupInput {
	/// Unique, URL-safe identifier of the group.
	#[validate(length(min = 1, max = 64))]
	pub slug: String,
	#[validate(length(min = 1, max = 200))]
	pub title: String,
	pub description: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct UpdateGroupInput {
	#[validate(length(min = 1, max = 200))]
	pub title: Option<String>,
	pub description: Option<String>,
}
