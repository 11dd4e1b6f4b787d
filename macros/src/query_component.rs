//! Implementation of the QueryComponent derive macro

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, GenericParam, LitStr, Type};

/// What the derive knows about one struct field
enum FieldInfo {
	/// A field described to the query binding
	Described {
		name: String,
		ty: Type,
		is_parameter: bool,
		/// `Some(None)` binds under the field name, `Some(Some(n))` under `n`
		from_query: Option<Option<LitStr>>,
	},
	/// An embedded component whose fields are inherited
	Flattened { ty: Type },
	/// No query binding attributes
	Ignored,
}

pub(crate) fn derive_query_component_impl(input: DeriveInput) -> syn::Result<TokenStream> {
	let struct_name = &input.ident;

	let fields = match &input.data {
		Data::Struct(data_struct) => match &data_struct.fields {
			Fields::Named(fields) => &fields.named,
			_ => {
				return Err(syn::Error::new_spanned(
					struct_name,
					"QueryComponent can only be derived for structs with named fields",
				));
			}
		},
		_ => {
			return Err(syn::Error::new_spanned(
				struct_name,
				"QueryComponent can only be derived for structs",
			));
		}
	};

	if let Some(lifetime) = input.generics.lifetimes().next() {
		return Err(syn::Error::new_spanned(
			lifetime,
			"QueryComponent requires a 'static type; lifetime parameters are not supported",
		));
	}

	let mut errors: Option<syn::Error> = None;
	let mut flattened = Vec::new();
	let mut described = Vec::new();

	for field in fields {
		match classify_field(field) {
			Ok(FieldInfo::Flattened { ty }) => flattened.push(ty),
			Ok(FieldInfo::Described {
				name,
				ty,
				is_parameter,
				from_query,
			}) => {
				let parameter = is_parameter.then(|| quote!(.parameter()));
				let from_query = match from_query {
					Some(Some(query_name)) => Some(quote!(.from_query_named(#query_name))),
					Some(None) => Some(quote!(.from_query())),
					None => None,
				};
				described.push(quote! {
					fields.push(
						::reinhardt_pages_query::ComponentField::new(
							#name,
							::reinhardt_pages_query::FieldType::of::<#ty>(),
						)
						#parameter
						#from_query
					);
				});
			}
			Ok(FieldInfo::Ignored) => {}
			Err(e) => match errors.as_mut() {
				Some(existing) => existing.combine(e),
				None => errors = Some(e),
			},
		}
	}

	if let Some(errors) = errors {
		return Err(errors);
	}

	let mut generics = input.generics.clone();
	for param in &mut generics.params {
		if let GenericParam::Type(type_param) = param {
			type_param.bounds.push(syn::parse_quote!('static));
		}
	}
	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

	Ok(quote! {
		impl #impl_generics ::reinhardt_pages_query::QueryComponent for #struct_name #ty_generics #where_clause {
			fn component_fields() -> ::std::vec::Vec<::reinhardt_pages_query::ComponentField> {
				#[allow(unused_mut)]
				let mut fields = ::std::vec::Vec::new();
				#(
					fields.extend(
						<#flattened as ::reinhardt_pages_query::QueryComponent>::component_fields()
					);
				)*
				#(#described)*
				fields
			}
		}
	})
}

/// Classify a field by its query binding attributes
fn classify_field(field: &syn::Field) -> syn::Result<FieldInfo> {
	let Some(ident) = &field.ident else {
		return Ok(FieldInfo::Ignored);
	};

	let mut is_parameter = false;
	let mut from_query = None;
	let mut flatten = false;

	for attr in &field.attrs {
		if attr.path().is_ident("parameter") {
			attr.meta.require_path_only()?;
			is_parameter = true;
		} else if attr.path().is_ident("from_query") {
			from_query = Some(parse_from_query(attr)?);
		} else if attr.path().is_ident("query") {
			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("flatten") {
					flatten = true;
					Ok(())
				} else {
					Err(meta.error("unsupported query attribute, expected `flatten`"))
				}
			})?;
		}
	}

	if flatten {
		if is_parameter || from_query.is_some() {
			return Err(syn::Error::new_spanned(
				ident,
				"#[query(flatten)] cannot be combined with #[parameter] or #[from_query]",
			));
		}
		return Ok(FieldInfo::Flattened {
			ty: field.ty.clone(),
		});
	}

	if !is_parameter && from_query.is_none() {
		return Ok(FieldInfo::Ignored);
	}

	Ok(FieldInfo::Described {
		name: ident.unraw().to_string(),
		ty: field.ty.clone(),
		is_parameter,
		from_query,
	})
}

/// Parse `#[from_query]` or `#[from_query(name = "...")]`
fn parse_from_query(attr: &syn::Attribute) -> syn::Result<Option<LitStr>> {
	if matches!(attr.meta, syn::Meta::Path(_)) {
		return Ok(None);
	}

	let mut name = None;
	attr.parse_nested_meta(|meta| {
		if meta.path.is_ident("name") {
			name = Some(meta.value()?.parse::<LitStr>()?);
			Ok(())
		} else {
			Err(meta.error("unsupported from_query attribute, expected `name = \"...\"`"))
		}
	})?;
	Ok(name)
}
