pub use crate::route::model::PaginateInput;

use schemars::JsonSchema;
use serde::Serialize;

use crate::{model::User, store::AuthorStats};

/// A user's public profile.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Profile {
	#[serde(flatten)]
	pub user: User,
	pub stats: AuthorStats,
}
