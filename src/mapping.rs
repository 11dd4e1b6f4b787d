//! Mapping between query parameter names and component fields.
//!
//! [`build_mappings`] runs once per component type. It keeps the fields
//! that are both parameters and supplied from the query string, groups them
//! by query parameter name (case-insensitively) and resolves a value parser
//! for each.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{QueryBindingError, QueryBindingResult};
use crate::field::ComponentField;
use crate::parser::{ParserRegistry, QueryValueParser};

/// One component field fed by a query parameter.
#[derive(Debug, Clone)]
pub struct QueryParameterDestination {
	field_name: Arc<str>,
	parser: Arc<QueryValueParser>,
	/// Index of the field's entry in the supplier's default template.
	pub(crate) slot: usize,
}

impl QueryParameterDestination {
	pub fn field_name(&self) -> &str {
		&self.field_name
	}

	pub(crate) fn field_name_arc(&self) -> &Arc<str> {
		&self.field_name
	}

	pub fn parser(&self) -> &QueryValueParser {
		&self.parser
	}
}

/// All fields bound to one query parameter name.
#[derive(Debug, Clone)]
pub struct QueryParameterMapping {
	query_parameter_name: Arc<str>,
	destinations: Vec<QueryParameterDestination>,
}

impl QueryParameterMapping {
	/// The query parameter name, as first declared.
	pub fn query_parameter_name(&self) -> &str {
		&self.query_parameter_name
	}

	/// Destinations in declaration order.
	pub fn destinations(&self) -> &[QueryParameterDestination] {
		&self.destinations
	}

	pub(crate) fn destinations_mut(&mut self) -> &mut [QueryParameterDestination] {
		&mut self.destinations
	}

	/// Whether `name` refers to this mapping's query parameter.
	pub fn matches(&self, name: &str) -> bool {
		query_names_match(&self.query_parameter_name, name)
	}
}

/// Case-insensitive comparison of query parameter names.
pub(crate) fn query_names_match(a: &str, b: &str) -> bool {
	if a.eq_ignore_ascii_case(b) {
		return true;
	}
	if a.is_ascii() && b.is_ascii() {
		return false;
	}
	a.chars()
		.flat_map(char::to_lowercase)
		.eq(b.chars().flat_map(char::to_lowercase))
}

/// Builds the query parameter mappings for one component.
///
/// Destinations within a mapping keep the order of `fields`, so repeated
/// builds of the same component are identical.
///
/// # Errors
///
/// Returns [`QueryBindingError::UnsupportedType`] if any query-bound
/// parameter has an unsupported type. The whole component is rejected, not
/// just that field. Returns [`QueryBindingError::DuplicateField`] if a
/// query-bound field name is described twice.
pub fn build_mappings(
	component: &'static str,
	fields: &[ComponentField],
	parsers: &ParserRegistry,
) -> QueryBindingResult<Vec<QueryParameterMapping>> {
	let mut seen = HashSet::with_capacity(fields.len());
	let mut mappings: Vec<QueryParameterMapping> = Vec::new();

	for field in fields {
		let Some(query_name) = field.query_parameter_name() else {
			continue;
		};

		if !seen.insert(field.name()) {
			return Err(QueryBindingError::DuplicateField {
				component,
				field: field.name().to_string(),
			});
		}

		let parser = parsers
			.get_or_create(&field.field_type())
			.map_err(|source| QueryBindingError::UnsupportedType {
				component,
				field: field.name().to_string(),
				source,
			})?;
		let destination = QueryParameterDestination {
			field_name: Arc::from(field.name()),
			parser,
			slot: 0,
		};

		match mappings.iter_mut().find(|m| m.matches(query_name)) {
			Some(mapping) => mapping.destinations.push(destination),
			None => mappings.push(QueryParameterMapping {
				query_parameter_name: Arc::from(query_name),
				destinations: vec![destination],
			}),
		}
	}

	Ok(mappings)
}
