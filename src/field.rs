//! Component field metadata.
//!
//! Components describe their fields once, either by hand or through
//! `#[derive(QueryComponent)]`. The description replaces runtime reflection:
//! it lists each field's name, its Rust type, whether it is a component
//! parameter, and whether (and under which name) it is supplied from the
//! query string.
//!
//! # Example
//!
//! ```
//! use reinhardt_pages_query::{ComponentField, FieldType, QueryComponent};
//!
//! struct Paged {
//!     page: Option<i32>,
//! }
//!
//! impl QueryComponent for Paged {
//!     fn component_fields() -> Vec<ComponentField> {
//!         vec![
//!             ComponentField::new("page", FieldType::of::<Option<i32>>())
//!                 .parameter()
//!                 .from_query(),
//!         ]
//!     }
//! }
//!
//! let fields = Paged::component_fields();
//! assert_eq!(fields[0].query_parameter_name(), Some("page"));
//! ```

use std::any::{TypeId, type_name};
use std::borrow::Cow;
use std::fmt;

use crate::value::ScalarKind;

/// The Rust type of a component field.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldType {
	type_id: TypeId,
	type_name: &'static str,
}

impl FieldType {
	/// Captures the type `T`.
	pub fn of<T: 'static>() -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			type_name: type_name::<T>(),
		}
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Returns the scalar kind this type parses as, unwrapping `Option`.
	pub fn scalar_kind(&self) -> Option<ScalarKind> {
		ScalarKind::of_type_id(self.type_id)
	}
}

impl fmt::Debug for FieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("FieldType").field(&self.type_name).finish()
	}
}

/// Marks a field as supplied from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FromQuery {
	/// Query parameter name override. The field name is used when absent.
	pub name: Option<Cow<'static, str>>,
}

/// One field of a component, as seen by the query binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentField {
	name: Cow<'static, str>,
	field_type: FieldType,
	is_parameter: bool,
	from_query: Option<FromQuery>,
}

impl ComponentField {
	/// Creates a field that is neither a parameter nor query-bound.
	pub fn new(name: impl Into<Cow<'static, str>>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			is_parameter: false,
			from_query: None,
		}
	}

	/// Marks the field as a component parameter.
	pub fn parameter(mut self) -> Self {
		self.is_parameter = true;
		self
	}

	/// Marks the field as supplied from the query parameter of the same name.
	pub fn from_query(mut self) -> Self {
		self.from_query = Some(FromQuery::default());
		self
	}

	/// Marks the field as supplied from the query parameter `name`.
	pub fn from_query_named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
		self.from_query = Some(FromQuery {
			name: Some(name.into()),
		});
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn field_type(&self) -> FieldType {
		self.field_type
	}

	pub fn is_parameter(&self) -> bool {
		self.is_parameter
	}

	pub fn from_query_marker(&self) -> Option<&FromQuery> {
		self.from_query.as_ref()
	}

	/// Returns the query parameter name this field binds to.
	///
	/// `None` unless the field is both a parameter and marked as supplied
	/// from the query string.
	pub fn query_parameter_name(&self) -> Option<&str> {
		if !self.is_parameter {
			return None;
		}
		let marker = self.from_query.as_ref()?;
		Some(marker.name.as_deref().unwrap_or(&self.name))
	}
}

/// A component type whose fields can be described for query binding.
pub trait QueryComponent: 'static {
	/// Describes every field relevant to binding, inherited ones first.
	///
	/// Called at most once per type by the cache, barring a race on first
	/// access.
	fn component_fields() -> Vec<ComponentField>;

	/// Name used in error messages and logs.
	fn component_name() -> &'static str {
		type_name::<Self>()
	}
}

/// A type-erased handle to a [`QueryComponent`].
///
/// Lets callers that only hold erased component factories (routers, SSR
/// renderers) consult the binding cache.
#[derive(Clone, Copy)]
pub struct ComponentType {
	type_id: TypeId,
	name: &'static str,
	fields: fn() -> Vec<ComponentField>,
}

impl ComponentType {
	pub fn of<C: QueryComponent>() -> Self {
		Self {
			type_id: TypeId::of::<C>(),
			name: C::component_name(),
			fields: C::component_fields,
		}
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Runs the component's field description.
	pub fn fields(&self) -> Vec<ComponentField> {
		(self.fields)()
	}
}

impl fmt::Debug for ComponentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentType")
			.field("name", &self.name)
			.finish()
	}
}

impl PartialEq for ComponentType {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for ComponentType {}
