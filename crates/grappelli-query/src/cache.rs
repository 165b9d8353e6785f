//! Compiled-query caching.
//!
//! Compilation is pure, so a query compiled once per (repository type,
//! method) pair can be reused forever. The cache stores the immutable
//! [`CompiledQuery`] behind an `Arc`; population follows an
//! insert-if-absent discipline so concurrent first calls race benignly —
//! both compile, one wins the slot, and every later call shares the
//! winner.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::artifact::CompiledQuery;
use crate::error::CompileResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
	repository: String,
	method: String,
}

/// A concurrency-safe cache of compiled artifacts.
#[derive(Debug, Default)]
pub struct QueryCache {
	entries: DashMap<CacheKey, Arc<CompiledQuery>>,
}

static GLOBAL: Lazy<QueryCache> = Lazy::new(QueryCache::new);

impl QueryCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// The process-wide default cache.
	pub fn global() -> &'static QueryCache {
		&GLOBAL
	}

	/// Fetch the artifact for `(repository, method)`, compiling it with
	/// `compile` on first use. Errors are not cached; a failing compile
	/// will be retried by the next caller.
	pub fn get_or_compile<F>(
		&self,
		repository: &str,
		method: &str,
		compile: F,
	) -> CompileResult<Arc<CompiledQuery>>
	where
		F: FnOnce() -> CompileResult<CompiledQuery>,
	{
		let key = CacheKey {
			repository: repository.to_string(),
			method: method.to_string(),
		};
		if let Some(hit) = self.entries.get(&key) {
			return Ok(hit.clone());
		}
		let compiled = Arc::new(compile()?);
		Ok(self.entries.entry(key).or_insert(compiled).clone())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::binding::ParameterBinding;

	#[test]
	fn second_lookup_reuses_first_compile() {
		let cache = QueryCache::new();
		let mut compiles = 0;
		for _ in 0..2 {
			let result = cache
				.get_or_compile("PersonRepository", "findByName", || {
					compiles += 1;
					Ok(CompiledQuery::raw("SELECT 1", Vec::<ParameterBinding>::new()))
				})
				.unwrap();
			assert_eq!(result.query_text(), Some("SELECT 1"));
		}
		assert_eq!(compiles, 1);
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn failed_compiles_are_not_cached() {
		let cache = QueryCache::new();
		let err = cache.get_or_compile("R", "m", || {
			Err(crate::error::CompileError::MalformedNegation)
		});
		assert!(err.is_err());
		assert!(cache.is_empty());
	}
}
