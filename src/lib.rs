//! # Reinhardt Pages Query
//!
//! Binds values from the URL query string to component parameters for
//! reinhardt-pages.
//!
//! A component declares which of its parameters are supplied from the query
//! string, under which name, and with which scalar type. At render time the
//! current query string is scanned once and every query-bound parameter gets
//! an assignment: either the parsed value, or an explicit reset when the
//! query string does not carry a usable value. Navigating between URLs
//! therefore always produces the same parameters for the same URL,
//! regardless of history.
//!
//! ## Architecture
//!
//! - [`field`]: component field metadata ([`QueryComponent`], [`ComponentField`])
//! - [`value`]: supported scalar kinds and parsed [`QueryValue`]s
//! - [`parser`]: per-kind value parsers, cached in a [`ParserRegistry`]
//! - [`mapping`]: grouping of fields by query parameter name
//! - [`scanner`]: allocation-free query string scanning
//! - [`supplier`]: render-time assignment of values to fields
//! - [`cache`]: per-type supplier cache ([`QueryBindingCache`])
//!
//! ## Supported types
//!
//! | Kind | Rust type |
//! |------|-----------|
//! | `bool` | `bool` |
//! | `datetime` | `chrono::NaiveDateTime` |
//! | `decimal` | `rust_decimal::Decimal` |
//! | `double` | `f64` |
//! | `float` | `f32` |
//! | `guid` | `uuid::Uuid` |
//! | `int` | `i32` |
//! | `long` | `i64` |
//!
//! `Option<T>` of any of these is accepted as well. A query-bound parameter
//! of any other type makes the whole component fail to bind with
//! [`QueryBindingError::UnsupportedType`].
//!
//! ## Features
//!
//! - `macros` (default): re-exports `#[derive(QueryComponent)]`
//! - `full`: all features
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_pages_query::prelude::*;
//!
//! #[derive(QueryComponent)]
//! struct ProductList {
//!     #[parameter]
//!     #[from_query(name = "page")]
//!     current_page: Option<i32>,
//!
//!     #[parameter]
//!     #[from_query]
//!     category: Option<uuid::Uuid>,
//!
//!     #[parameter]
//!     title: String,
//! }
//!
//! if let SupplierLookup::Found(supplier) = supplier_for::<ProductList>()? {
//!     let assignments = supplier.render_assignments("?page=2");
//!     // [("category", None), ("current_page", Some(Int(2)))]
//! }
//! ```

// Lets `#[derive(QueryComponent)]` expansions resolve inside this crate too
extern crate self as reinhardt_pages_query;

pub mod cache;
pub mod error;
pub mod field;
pub mod mapping;
pub mod parser;
pub mod prelude;
pub mod scanner;
pub mod supplier;
pub mod value;

pub use cache::{QueryBindingCache, SupplierLookup, supplier_for};
pub use error::{QueryBindingError, QueryBindingResult, UnsupportedTypeError};
pub use field::{ComponentField, ComponentType, FieldType, FromQuery, QueryComponent};
pub use mapping::{QueryParameterDestination, QueryParameterMapping, build_mappings};
pub use parser::{ParserRegistry, QueryValueParser};
pub use scanner::{QueryStringEnumerator, QueryStringParameter, decode_query_component};
pub use supplier::{ComponentParameterSink, QueryAssignment, QueryParameterValueSupplier};
pub use value::{QueryValue, ScalarKind};

// Derive macros live in the macro namespace, so the trait and the derive can
// share the `QueryComponent` name
#[cfg(feature = "macros")]
pub use reinhardt_pages_query_macros::QueryComponent;
