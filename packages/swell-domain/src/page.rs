use serde::{Deserialize, Serialize};

pub const MAX_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
	#[error("page must be 1 or greater.")]
	PageOutOfRange,
	#[error("limit must be in the range 1-{max}.", max = MAX_PAGE_LIMIT)]
	LimitOutOfRange,
}

/// A validated `(page, limit)` pair. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
	page: u32,
	limit: u32,
}
impl PageRequest {
	pub fn new(page: u32, limit: u32) -> Result<Self, PageError> {
		if page < 1 {
			return Err(PageError::PageOutOfRange);
		}
		if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
			return Err(PageError::LimitOutOfRange);
		}

		Ok(Self { page, limit })
	}

	pub fn page(self) -> u32 {
		self.page
	}

	pub fn limit(self) -> u32 {
		self.limit
	}

	pub fn offset(self) -> usize {
		(self.page as usize - 1) * self.limit as usize
	}

	/// Returns the `[offset, offset + limit)` window clamped to `total`.
	pub fn window(self, total: usize) -> std::ops::Range<usize> {
		let start = self.offset().min(total);
		let end = start.saturating_add(self.limit as usize).min(total);

		start..end
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
	pub page: u32,
	pub limit: u32,
	pub total: u64,
	pub has_next: bool,
}
impl Pagination {
	pub fn for_slice(request: PageRequest, total: usize, returned: usize) -> Self {
		let has_next = request.offset().saturating_add(returned) < total;

		Self { page: request.page, limit: request.limit, total: total as u64, has_next }
	}
}
