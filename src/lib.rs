#![warn(clippy::pedantic)]

pub mod cache;
pub mod error;
pub mod extract;
pub mod feed;
pub mod model;
pub mod openapi;
pub mod page;
pub mod route;
pub mod session;
pub mod store;

use std::{sync::Arc, time::Duration};

use aide::{axum::ApiRouter, openapi::OpenApi};
use argon2::Argon2;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

pub use cache::FeedCache;
pub use page::{Page, Pager};
pub use store::Store;

/// Startup configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
	/// Number of posts per feed page.
	pub page_size: usize,
	/// How long a global feed page may be served from cache.
	pub feed_cache_ttl: Duration,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			page_size: page::DEFAULT_PAGE_SIZE,
			feed_cache_ttl: cache::DEFAULT_TTL,
		}
	}
}

impl Config {
	/// Reads `PAGE_SIZE` and `FEED_CACHE_SECONDS`, falling back to the
	/// defaults when they are unset.
	#[must_use]
	pub fn from_env() -> Self {
		let default = Self::default();

		Self {
			page_size: std::env::var("PAGE_SIZE").map_or(default.page_size, |size| {
				size.parse().expect("PAGE_SIZE must be a positive number")
			}),
			feed_cache_ttl: std::env::var("FEED_CACHE_SECONDS")
				.map_or(default.feed_cache_ttl, |seconds| {
					Duration::from_secs(
						seconds
							.parse()
							.expect("FEED_CACHE_SECONDS must be a number"),
					)
				}),
		}
	}
}

/// The shared application state.
///
/// This contains all shared dependencies that handlers need to access:
/// the data store, the password hasher, the pager configuration and the
/// global feed cache.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Store,
	pub hasher: Argon2<'static>,
	pub pager: Pager,
	pub cache: FeedCache,
}

pub type AppState = State;

impl State {
	#[must_use]
	pub fn new(config: &Config) -> Self {
		Self {
			store: Store::default(),
			hasher: Argon2::default(),
			pager: Pager::new(config.page_size),
			cache: FeedCache::new(config.feed_cache_ttl),
		}
	}
}

/// Builds the application router and its OpenAPI document.
pub fn app(state: State) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/auth", route::auth::routes())
		.nest("/posts", route::post::routes())
		.nest("/groups", route::group::routes())
		.nest("/users", route::profile::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}
