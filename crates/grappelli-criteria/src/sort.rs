//! Ordering directives.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Direction {
	#[default]
	Asc,
	Desc,
}

/// A single ordering entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	path: String,
	direction: Direction,
}

impl Order {
	pub fn asc(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			direction: Direction::Asc,
		}
	}

	pub fn desc(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			direction: Direction::Desc,
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn direction(&self) -> Direction {
		self.direction
	}
}

/// Ordered list of sort entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Sort {
	orders: Vec<Order>,
}

impl Sort {
	pub fn unsorted() -> Self {
		Self::default()
	}

	pub fn by(orders: Vec<Order>) -> Self {
		Self { orders }
	}

	pub fn and(mut self, order: Order) -> Self {
		self.orders.push(order);
		self
	}

	pub fn orders(&self) -> &[Order] {
		&self.orders
	}

	pub fn is_sorted(&self) -> bool {
		!self.orders.is_empty()
	}
}
