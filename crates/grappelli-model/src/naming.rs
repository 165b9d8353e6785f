//! Naming strategies mapping declared names to persisted names.

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

/// Strategy for deriving table/collection and column/field names from the
/// declared entity and property names.
///
/// # Examples
///
/// ```
/// use grappelli_model::NamingStrategy;
///
/// let naming = NamingStrategy::UnderscoreSeparatedLowerCase;
/// assert_eq!(naming.mapped_name("OrderLine"), "order_line");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NamingStrategy {
	/// `OrderLine` becomes `order_line`.
	#[default]
	UnderscoreSeparatedLowerCase,
	/// `OrderLine` becomes `orderline`.
	LowerCase,
	/// Names are persisted exactly as declared.
	Raw,
}

impl NamingStrategy {
	pub fn mapped_name(&self, declared: &str) -> String {
		match self {
			NamingStrategy::UnderscoreSeparatedLowerCase => declared.to_case(Case::Snake),
			NamingStrategy::LowerCase => declared.to_lowercase(),
			NamingStrategy::Raw => declared.to_string(),
		}
	}
}
