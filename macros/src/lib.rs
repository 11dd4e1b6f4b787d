//! Procedural macros for reinhardt-pages-query.
//!
//! This crate provides the `#[derive(QueryComponent)]` macro, which generates
//! the field table the query binding reads instead of inspecting types at
//! runtime.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod query_component;

/// Derives a `QueryComponent` implementation for a struct.
///
/// # Attributes
///
/// ## Field-level attributes
///
/// - `#[parameter]` - The field is a component parameter
/// - `#[from_query]` - The parameter is supplied from the query parameter
///   named like the field
/// - `#[from_query(name = "p")]` - The parameter is supplied from the query
///   parameter `p`
/// - `#[query(flatten)]` - The field's type is itself a `QueryComponent`
///   whose fields are included, ahead of this struct's own fields
///
/// Fields without any of these attributes are not described.
///
/// # Example
///
/// ```ignore
/// use reinhardt_pages_query::QueryComponent;
///
/// #[derive(QueryComponent)]
/// struct Pagination {
///     #[parameter]
///     #[from_query(name = "page")]
///     current_page: Option<i32>,
/// }
///
/// #[derive(QueryComponent)]
/// struct ProductList {
///     #[query(flatten)]
///     pagination: Pagination,
///
///     #[parameter]
///     #[from_query]
///     category: Option<uuid::Uuid>,
/// }
/// ```
///
/// This generates:
///
/// ```ignore
/// impl reinhardt_pages_query::QueryComponent for ProductList {
///     fn component_fields() -> Vec<reinhardt_pages_query::ComponentField> {
///         let mut fields = Vec::new();
///         fields.extend(<Pagination as reinhardt_pages_query::QueryComponent>::component_fields());
///         fields.push(
///             reinhardt_pages_query::ComponentField::new(
///                 "category",
///                 reinhardt_pages_query::FieldType::of::<Option<uuid::Uuid>>(),
///             )
///             .parameter()
///             .from_query(),
///         );
///         fields
///     }
/// }
/// ```
#[proc_macro_derive(QueryComponent, attributes(parameter, from_query, query))]
pub fn derive_query_component(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	query_component::derive_query_component_impl(input)
		.unwrap_or_else(|e| e.to_compile_error())
		.into()
}
