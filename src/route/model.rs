use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use validator::Validate;

/// Query parameters selecting a feed page.
///
/// The paginator is tolerant: a missing or malformed `page` falls back to
/// the first page, and a number past the end is clamped to the last page by
/// the pager. Nothing here ever rejects a request.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct PaginateInput {
	/// The page number to return (1-indexed).
	#[serde(default, deserialize_with = "lenient_page")]
	pub page: Option<u64>,
}

/// Anything that does not parse as a positive integer is treated as absent.
fn lenient_page<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<String>::deserialize(deserializer)?;

	Ok(raw
		.and_then(|raw| raw.parse().ok())
		.filter(|&page| page > 0))
}
