//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use reinhardt_pages_query::prelude::*;
//! ```

pub use crate::cache::{QueryBindingCache, SupplierLookup, supplier_for};
pub use crate::error::{QueryBindingError, QueryBindingResult};
pub use crate::field::{ComponentField, ComponentType, FieldType, QueryComponent};
pub use crate::supplier::{ComponentParameterSink, QueryAssignment, QueryParameterValueSupplier};
pub use crate::value::{QueryValue, ScalarKind};

#[cfg(feature = "macros")]
pub use reinhardt_pages_query_macros::QueryComponent;
