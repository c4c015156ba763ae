//! Fixed-size page slicing over an ordered feed.
//!
//! The pager never rejects a page number: a missing or malformed one means
//! the first page, and one past the end is clamped to the last page. The
//! store realizes only the requested window, so the pager works with an
//! already-bounded slice plus the total count.

use schemars::JsonSchema;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Splits an ordered result set into fixed-size pages.
#[derive(Debug, Clone)]
pub struct Pager {
	size: usize,
}

impl Pager {
	/// # Panics
	///
	/// Panics if `size` is zero.
	#[must_use]
	pub fn new(size: usize) -> Self {
		assert!(size > 0, "page size must be positive");

		Self { size }
	}

	#[must_use]
	pub fn size(&self) -> usize {
		self.size
	}

	/// Number of pages needed for `total` items.
	#[must_use]
	pub fn total_pages(&self, total: usize) -> usize {
		total.div_ceil(self.size)
	}

	/// Normalizes a requested 1-indexed page number against `total` items.
	///
	/// `None` (absent or unparseable upstream) selects the first page; a
	/// number past the end selects the last page that holds any items.
	#[must_use]
	pub fn clamp(&self, total: usize, requested: Option<u64>) -> usize {
		let last = self.total_pages(total).max(1);
		let requested = requested
			.and_then(|page| usize::try_from(page).ok())
			.unwrap_or(1);

		requested.clamp(1, last)
	}

	/// Offset of the first item on `number` (1-indexed).
	#[must_use]
	pub fn offset(&self, number: usize) -> usize {
		(number - 1) * self.size
	}

	/// Assembles page metadata around an already-bounded slice.
	#[must_use]
	pub fn assemble<T>(&self, items: Vec<T>, total: usize, number: usize) -> Page<T> {
		let total_pages = self.total_pages(total);

		Page {
			has_previous: number > 1,
			has_next: number < total_pages,
			items,
			number,
			total_items: total,
			total_pages,
		}
	}
}

impl Default for Pager {
	fn default() -> Self {
		Self::new(DEFAULT_PAGE_SIZE)
	}
}

/// A bounded slice of a feed plus navigation metadata.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Page<T> {
	pub items: Vec<T>,
	/// The 1-indexed page number this slice came from.
	pub number: usize,
	pub total_items: usize,
	pub total_pages: usize,
	pub has_previous: bool,
	pub has_next: bool,
}

#[cfg(test)]
mod test {
	use super::Pager;

	#[test]
	fn test_total_pages() {
		let pager = Pager::new(10);

		assert_eq!(pager.total_pages(0), 0);
		assert_eq!(pager.total_pages(10), 1);
		assert_eq!(pager.total_pages(13), 2);
		assert_eq!(pager.total_pages(20), 2);
		assert_eq!(pager.total_pages(21), 3);
	}

	#[test]
	fn test_clamp_defaults_to_first_page() {
		let pager = Pager::new(10);

		assert_eq!(pager.clamp(13, None), 1);
		assert_eq!(pager.clamp(0, None), 1);
	}

	#[test]
	fn test_clamp_tolerates_out_of_range() {
		let pager = Pager::new(10);

		assert_eq!(pager.clamp(13, Some(2)), 2);
		assert_eq!(pager.clamp(13, Some(3)), 2);
		assert_eq!(pager.clamp(13, Some(9999)), 2);
		assert_eq!(pager.clamp(0, Some(7)), 1);
	}

	#[test]
	fn test_offset() {
		let pager = Pager::new(10);

		assert_eq!(pager.offset(1), 0);
		assert_eq!(pager.offset(2), 10);
	}

	#[test]
	fn test_boundary_metadata() {
		let pager = Pager::new(10);

		let first = pager.assemble(vec![0; 10], 13, 1);

		assert_eq!(first.items.len(), 10);
		assert!(first.has_next);
		assert!(!first.has_previous);

		let second = pager.assemble(vec![0; 3], 13, 2);

		assert_eq!(second.items.len(), 3);
		assert!(!second.has_next);
		assert!(second.has_previous);
		assert_eq!(second.total_pages, 2);
		assert_eq!(second.total_items, 13);
	}

	#[test]
	fn test_assemble_is_idempotent() {
		let pager = Pager::new(5);

		let one = pager.assemble(vec![1, 2, 3], 13, 3);
		let two = pager.assemble(vec![1, 2, 3], 13, 3);

		assert_eq!(one.items, two.items);
		assert_eq!(one.number, two.number);
		assert_eq!(one.has_next, two.has_next);
		assert_eq!(one.has_previous, two.has_previous);
	}
}
