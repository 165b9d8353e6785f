//! The assembled criteria query.

use serde::{Deserialize, Serialize};

use crate::criterion::Criterion;
use crate::join::JoinPath;
use crate::page::Pageable;
use crate::projection::Projection;
use crate::sort::{Order, Sort};

/// A complete backend-agnostic query description: predicate tree,
/// projection list, explicit joins, ordering and paging.
///
/// # Examples
///
/// ```
/// use grappelli_criteria::{Criterion, CriteriaQuery, Order};
///
/// let query = CriteriaQuery::new()
///     .filter(Criterion::and(vec![
///         Criterion::gt("age", 18),
///         Criterion::starts_with("name", "A", true),
///     ]))
///     .order_by(Order::asc("name"))
///     .limit(20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CriteriaQuery {
	criterion: Option<Criterion>,
	projections: Vec<Projection>,
	joins: Vec<JoinPath>,
	sort: Sort,
	pageable: Pageable,
	distinct: bool,
}

impl CriteriaQuery {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the predicate tree. Subsequent calls AND the new criterion onto
	/// the existing one.
	pub fn filter(mut self, criterion: Criterion) -> Self {
		self.criterion = Some(match self.criterion.take() {
			Some(existing) => Criterion::And(vec![existing, criterion]),
			None => criterion,
		});
		self
	}

	pub fn project(mut self, projection: Projection) -> Self {
		self.projections.push(projection);
		self
	}

	pub fn join(mut self, join: impl Into<JoinPath>) -> Self {
		self.joins.push(join.into());
		self
	}

	pub fn order_by(mut self, order: Order) -> Self {
		self.sort = self.sort.and(order);
		self
	}

	pub fn limit(mut self, limit: u64) -> Self {
		self.pageable = self.pageable.with_limit(limit);
		self
	}

	pub fn offset(mut self, offset: u64) -> Self {
		self.pageable = self.pageable.with_offset(offset);
		self
	}

	pub fn distinct(mut self) -> Self {
		self.distinct = true;
		self
	}

	pub fn criterion(&self) -> Option<&Criterion> {
		self.criterion.as_ref()
	}

	pub fn projections(&self) -> &[Projection] {
		&self.projections
	}

	pub fn joins(&self) -> &[JoinPath] {
		&self.joins
	}

	pub fn sort(&self) -> &Sort {
		&self.sort
	}

	pub fn pageable(&self) -> Pageable {
		self.pageable
	}

	pub fn is_distinct(&self) -> bool {
		self.distinct
	}
}
