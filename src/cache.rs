//! Whole-page cache for the global feed.
//!
//! Mirrors the original application's fixed-expiry page cache: entries are
//! keyed by the requested page number and served until they expire. Nothing
//! invalidates an entry early, so a newly created post only shows up once
//! the window has passed. Feed reads are pure, which keeps a cached page
//! identical to a freshly computed one within the window.

use std::time::Duration;

use moka::future::Cache;

use crate::{model::Post, page::Page};

pub const DEFAULT_TTL: Duration = Duration::from_secs(20);

/// Bounds the cache even when clients request arbitrary page numbers.
const MAX_ENTRIES: u64 = 1_024;

#[derive(Clone)]
pub struct FeedCache {
	/// `None` when caching is disabled.
	entries: Option<Cache<Option<u64>, Page<Post>>>,
}

impl FeedCache {
	/// A zero `ttl` disables caching entirely.
	#[must_use]
	pub fn new(ttl: Duration) -> Self {
		let entries = (!ttl.is_zero()).then(|| {
			Cache::builder()
				.max_capacity(MAX_ENTRIES)
				.time_to_live(ttl)
				.build()
		});

		Self { entries }
	}

	/// Returns the cached page for `key` when still fresh, otherwise
	/// rebuilds it with `fill` and caches the result.
	pub async fn page(&self, key: Option<u64>, fill: impl FnOnce() -> Page<Post>) -> Page<Post> {
		let Some(entries) = &self.entries else {
			return fill();
		};

		if let Some(page) = entries.get(&key).await {
			return page;
		}

		let page = fill();

		entries.insert(key, page.clone()).await;
		page
	}

	/// Number of resident entries, after housekeeping has run.
	#[cfg(test)]
	async fn entry_count(&self) -> u64 {
		let Some(entries) = &self.entries else {
			return 0;
		};

		entries.run_pending_tasks().await;
		entries.entry_count()
	}
}

#[cfg(test)]
mod test {
	use std::time::Duration;

	use super::FeedCache;
	use crate::page::Pager;

	#[tokio::test]
	async fn test_serves_stale_page_within_ttl() {
		let cache = FeedCache::new(Duration::from_secs(60));
		let pager = Pager::new(10);

		let first = cache.page(None, || pager.assemble(Vec::new(), 0, 1)).await;

		assert_eq!(first.total_items, 0);

		// The refreshed state is not observed until the entry expires.
		let second = cache.page(None, || pager.assemble(Vec::new(), 5, 1)).await;

		assert_eq!(second.total_items, 0);
	}

	#[tokio::test]
	async fn test_zero_ttl_disables_caching() {
		let cache = FeedCache::new(Duration::ZERO);
		let pager = Pager::new(10);

		cache.page(None, || pager.assemble(Vec::new(), 0, 1)).await;

		let fresh = cache.page(None, || pager.assemble(Vec::new(), 5, 1)).await;

		assert_eq!(fresh.total_items, 5);
	}

	#[tokio::test]
	async fn test_keys_are_independent() {
		let cache = FeedCache::new(Duration::from_secs(60));
		let pager = Pager::new(10);

		cache.page(Some(1), || pager.assemble(Vec::new(), 1, 1)).await;

		let other = cache.page(Some(2), || pager.assemble(Vec::new(), 2, 1)).await;

		assert_eq!(other.total_items, 2);
	}

	#[tokio::test]
	async fn test_expired_entries_are_evicted() {
		let cache = FeedCache::new(Duration::from_millis(10));
		let pager = Pager::new(10);

		// A client walking page numbers must not grow the cache forever.
		for page in 1..=500 {
			cache
				.page(Some(page), || pager.assemble(Vec::new(), 0, 1))
				.await;
		}

		tokio::time::sleep(Duration::from_millis(50)).await;

		cache.page(None, || pager.assemble(Vec::new(), 0, 1)).await;

		assert!(
			cache.entry_count().await < 500,
			"expired entries still resident"
		);
	}
}
