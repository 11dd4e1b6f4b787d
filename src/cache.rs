//! Per-type cache of query parameter suppliers.
//!
//! Field descriptions are inspected once per component type. The result,
//! including the fact that a type has nothing to bind, is kept for the
//! lifetime of the cache and never evicted.
//!
//! ```
//! use reinhardt_pages_query::{
//!     ComponentField, FieldType, QueryBindingCache, QueryComponent, QueryValue, SupplierLookup,
//! };
//!
//! struct Paged;
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
//! let cache = QueryBindingCache::new();
//! let SupplierLookup::Found(supplier) = cache.for_type::<Paged>()? else {
//!     unreachable!("Paged binds `page`");
//! };
//! let assignments = supplier.render_assignments("?page=5");
//! assert_eq!(assignments[0].value, Some(QueryValue::Int(5)));
//! # Ok::<(), reinhardt_pages_query::QueryBindingError>(())
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::error::QueryBindingResult;
use crate::field::{ComponentType, QueryComponent};
use crate::mapping::build_mappings;
use crate::parser::ParserRegistry;
use crate::supplier::QueryParameterValueSupplier;

/// Outcome of a supplier lookup for one component type.
#[derive(Debug, Clone)]
pub enum SupplierLookup {
	/// The type has query-bound parameters.
	Found(Arc<QueryParameterValueSupplier>),
	/// The type has no query-bound parameters; renders can skip query
	/// binding for it entirely.
	NotApplicable,
}

impl SupplierLookup {
	pub fn supplier(&self) -> Option<&Arc<QueryParameterValueSupplier>> {
		match self {
			Self::Found(supplier) => Some(supplier),
			Self::NotApplicable => None,
		}
	}

	pub fn is_found(&self) -> bool {
		matches!(self, Self::Found(_))
	}

	/// Whether two lookups hold the same cached entry.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Found(a), Self::Found(b)) => Arc::ptr_eq(a, b),
			(Self::NotApplicable, Self::NotApplicable) => true,
			_ => false,
		}
	}
}

/// Global binding cache singleton
static BINDING_CACHE: OnceLock<QueryBindingCache> = OnceLock::new();

/// Compute-once, cache-forever map from component type to supplier.
///
/// Concurrent first lookups of the same type may each build a supplier, but
/// only the first one stored is ever returned. Build failures are not
/// cached: every lookup of a misconfigured type fails the same way.
#[derive(Debug)]
pub struct QueryBindingCache {
	parsers: Arc<ParserRegistry>,
	entries: RwLock<HashMap<TypeId, SupplierLookup>>,
}

impl Default for QueryBindingCache {
	fn default() -> Self {
		Self::new()
	}
}

impl QueryBindingCache {
	/// Creates an empty cache backed by the global parser registry.
	pub fn new() -> Self {
		Self::with_parsers(ParserRegistry::global())
	}

	/// Creates an empty cache backed by `parsers`.
	pub fn with_parsers(parsers: Arc<ParserRegistry>) -> Self {
		Self {
			parsers,
			entries: RwLock::new(HashMap::new()),
		}
	}

	/// Returns the process-wide cache.
	pub fn global() -> &'static QueryBindingCache {
		BINDING_CACHE.get_or_init(Self::new)
	}

	pub fn parsers(&self) -> &Arc<ParserRegistry> {
		&self.parsers
	}

	/// Looks up (building on first use) the supplier for `C`.
	///
	/// # Errors
	///
	/// Fails if `C` declares a query-bound parameter of an unsupported type
	/// or describes a field twice.
	pub fn for_type<C: QueryComponent>(&self) -> QueryBindingResult<SupplierLookup> {
		self.for_component(&ComponentType::of::<C>())
	}

	/// Type-erased form of [`for_type`](Self::for_type).
	pub fn for_component(&self, component: &ComponentType) -> QueryBindingResult<SupplierLookup> {
		if let Some(lookup) = self.cached(component.type_id()) {
			tracing::trace!(component = component.name(), "query binding cache hit");
			return Ok(lookup);
		}

		let lookup = self.build(component)?;
		let mut entries = self.entries.write();
		Ok(entries
			.entry(component.type_id())
			.or_insert(lookup)
			.clone())
	}

	/// Returns the cached entry for a type, or `None` if it has not been
	/// computed yet.
	pub fn cached(&self, type_id: TypeId) -> Option<SupplierLookup> {
		self.entries.read().get(&type_id).cloned()
	}

	/// Number of component types computed so far.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	fn build(&self, component: &ComponentType) -> QueryBindingResult<SupplierLookup> {
		let fields = component.fields();
		let mappings = build_mappings(component.name(), &fields, &self.parsers).inspect_err(|e| {
			tracing::warn!(component = component.name(), error = %e, "invalid query bindings");
		})?;

		tracing::debug!(
			component = component.name(),
			mappings = mappings.len(),
			"built query parameter supplier"
		);
		Ok(match QueryParameterValueSupplier::new(mappings) {
			Some(supplier) => SupplierLookup::Found(Arc::new(supplier)),
			None => SupplierLookup::NotApplicable,
		})
	}
}

/// Looks up the supplier for `C` in the global cache.
pub fn supplier_for<C: QueryComponent>() -> QueryBindingResult<SupplierLookup> {
	QueryBindingCache::global().for_type::<C>()
}
