//! Paging directives.

use serde::{Deserialize, Serialize};

/// Limit/offset paging. Both bounds are optional; an unpaged query emits
/// neither clause/stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pageable {
	limit: Option<u64>,
	offset: Option<u64>,
}

impl Pageable {
	pub fn unpaged() -> Self {
		Self::default()
	}

	pub fn with_limit(mut self, limit: u64) -> Self {
		self.limit = Some(limit);
		self
	}

	pub fn with_offset(mut self, offset: u64) -> Self {
		self.offset = Some(offset);
		self
	}

	pub fn limit(&self) -> Option<u64> {
		self.limit
	}

	pub fn offset(&self) -> Option<u64> {
		self.offset
	}

	pub fn is_paged(&self) -> bool {
		self.limit.is_some() || self.offset.is_some()
	}
}
