//! Error types for query parameter binding.
//!
//! Only configuration mistakes are errors. Malformed query values and unknown
//! query keys are not: the affected field is simply reset for that render.

use thiserror::Error;

/// A field type that no query value parser exists for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("querystring values cannot be parsed as type '{type_name}'")]
pub struct UnsupportedTypeError {
	/// Rust type name of the offending field type.
	pub type_name: &'static str,
}

/// Errors raised while building the query bindings of a component type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryBindingError {
	/// A query-bound parameter has a type outside the supported scalar set.
	#[error("cannot bind field '{field}' of component '{component}' to the query string: {source}")]
	UnsupportedType {
		/// Component that declared the field.
		component: &'static str,
		/// Name of the offending field.
		field: String,
		/// The underlying parser lookup failure.
		#[source]
		source: UnsupportedTypeError,
	},

	/// The same field name was described twice for one component.
	#[error("component '{component}' describes field '{field}' more than once")]
	DuplicateField {
		/// Component that declared the field.
		component: &'static str,
		/// The repeated field name.
		field: String,
	},
}

impl QueryBindingError {
	/// Returns the component the error was raised for.
	pub fn component(&self) -> &'static str {
		match self {
			Self::UnsupportedType { component, .. } | Self::DuplicateField { component, .. } => {
				component
			}
		}
	}

	/// Returns the unsupported type name, if this is an [`UnsupportedType`](Self::UnsupportedType) error.
	pub fn unsupported_type_name(&self) -> Option<&'static str> {
		match self {
			Self::UnsupportedType { source, .. } => Some(source.type_name),
			Self::DuplicateField { .. } => None,
		}
	}
}

/// Result type alias for query binding operations.
pub type QueryBindingResult<T> = Result<T, QueryBindingError>;
