//! Render-time binding of query string values to component parameters.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::mapping::QueryParameterMapping;
use crate::scanner::QueryStringEnumerator;
use crate::value::QueryValue;

/// One parameter assignment produced by a render.
///
/// `value` is `None` when the field must be reset: its query parameter was
/// absent, or present but unparsable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAssignment {
	pub field: Arc<str>,
	pub value: Option<QueryValue>,
}

/// Receives the assignments of a render.
///
/// Implemented by whatever builds the component instance being rendered.
pub trait ComponentParameterSink {
	/// Sets (or, with `None`, resets) one component parameter.
	fn add_component_parameter(&mut self, name: &str, value: Option<QueryValue>);
}

impl ComponentParameterSink for HashMap<String, Option<QueryValue>> {
	fn add_component_parameter(&mut self, name: &str, value: Option<QueryValue>) {
		self.insert(name.to_string(), value);
	}
}

impl ComponentParameterSink for Vec<QueryAssignment> {
	fn add_component_parameter(&mut self, name: &str, value: Option<QueryValue>) {
		self.push(QueryAssignment {
			field: Arc::from(name),
			value,
		});
	}
}

/// Supplies query-bound parameter values for one component type.
///
/// Built once per component type by the
/// [`QueryBindingCache`](crate::cache::QueryBindingCache) and shared between
/// concurrent renders. A supplier always has at least one mapping; types
/// without query-bound fields never get one.
#[derive(Debug)]
pub struct QueryParameterValueSupplier {
	mappings: Vec<QueryParameterMapping>,
	/// One reset entry per destination, sorted by field name. Cloned, never
	/// mutated, by each render.
	default_template: Vec<QueryAssignment>,
}

impl QueryParameterValueSupplier {
	/// Creates a supplier, or `None` if there is nothing to bind.
	///
	/// Field names must be unique across all destinations.
	pub(crate) fn new(mut mappings: Vec<QueryParameterMapping>) -> Option<Self> {
		if mappings.is_empty() {
			return None;
		}

		let mut order: Vec<(usize, usize)> = mappings
			.iter()
			.enumerate()
			.flat_map(|(m, mapping)| (0..mapping.destinations().len()).map(move |d| (m, d)))
			.collect();
		order.sort_by(|&(am, ad), &(bm, bd)| {
			mappings[am].destinations()[ad]
				.field_name()
				.cmp(mappings[bm].destinations()[bd].field_name())
		});

		let mut default_template = Vec::with_capacity(order.len());
		for (m, d) in order {
			let destination = &mut mappings[m].destinations_mut()[d];
			destination.slot = default_template.len();
			default_template.push(QueryAssignment {
				field: destination.field_name_arc().clone(),
				value: None,
			});
		}

		Some(Self {
			mappings,
			default_template,
		})
	}

	pub fn mappings(&self) -> &[QueryParameterMapping] {
		&self.mappings
	}

	/// Names of every bound field, sorted.
	pub fn field_names(&self) -> impl Iterator<Item = &str> {
		self.default_template.iter().map(|a| &*a.field)
	}

	/// Computes the assignments for `query`.
	///
	/// Every bound field appears exactly once in the result, sorted by field
	/// name. Fields whose query parameter is absent or unparsable are reset
	/// to `None`. When a name repeats, the last parsable value wins. Names
	/// are compared without decoding them.
	pub fn render_assignments(&self, query: &str) -> Vec<QueryAssignment> {
		let mut assignments = self.default_template.clone();

		for parameter in QueryStringEnumerator::new(query) {
			// Mappings per component are few; a scan beats hashing the key
			let Some(mapping) = self
				.mappings
				.iter()
				.find(|m| m.matches(parameter.encoded_name))
			else {
				continue;
			};

			let value = parameter.decoded_value();
			for destination in mapping.destinations() {
				if let Some(parsed) = destination.parser().try_parse_single(&value) {
					assignments[destination.slot].value = Some(parsed);
				}
			}
		}

		assignments
	}

	/// Computes the assignments for `query` and hands them to `sink`.
	pub fn render_parameters_from_query_string<S>(&self, sink: &mut S, query: &str)
	where
		S: ComponentParameterSink + ?Sized,
	{
		for assignment in self.render_assignments(query) {
			sink.add_component_parameter(&assignment.field, assignment.value);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::{ComponentField, FieldType};
	use crate::mapping::build_mappings;
	use crate::parser::ParserRegistry;
	use proptest::prelude::*;
	use rstest::{fixture, rstest};

	fn supplier(fields: Vec<ComponentField>) -> QueryParameterValueSupplier {
		let mappings = build_mappings("Test", &fields, &ParserRegistry::new()).unwrap();
		QueryParameterValueSupplier::new(mappings).unwrap()
	}

	fn values(assignments: &[QueryAssignment]) -> Vec<(&str, Option<QueryValue>)> {
		assignments
			.iter()
			.map(|a| (&*a.field, a.value.clone()))
			.collect()
	}

	#[fixture]
	fn paged() -> QueryParameterValueSupplier {
		supplier(vec![
			ComponentField::new("Page", FieldType::of::<Option<i32>>())
				.parameter()
				.from_query_named("page"),
		])
	}

	#[rstest]
	#[case("page=5", Some(5))]
	#[case("?page=5", Some(5))]
	#[case("", None)]
	#[case("Page=abc", None)]
	#[case("PAGE=7", Some(7))]
	#[case("page=1&page=2", Some(2))]
	#[case("page=1&page=oops", Some(1))]
	#[case("other=3", None)]
	#[case("page", None)]
	#[case("page=+9", Some(9))]
	#[case("pa%67e=5", None)]
	fn test_paged_scenarios(
		paged: QueryParameterValueSupplier,
		#[case] query: &str,
		#[case] expected: Option<i32>,
	) {
		let assignments = paged.render_assignments(query);

		assert_eq!(values(&assignments), vec![("Page", expected.map(QueryValue::Int))]);
	}

	#[rstest]
	fn test_shared_query_name_feeds_every_destination() {
		let supplier = supplier(vec![
			ComponentField::new("X", FieldType::of::<i32>())
				.parameter()
				.from_query_named("q"),
			ComponentField::new("Y", FieldType::of::<i32>())
				.parameter()
				.from_query_named("q"),
		]);

		let assignments = supplier.render_assignments("q=7");

		assert_eq!(
			values(&assignments),
			vec![("X", Some(QueryValue::Int(7))), ("Y", Some(QueryValue::Int(7)))]
		);
	}

	#[rstest]
	fn test_shared_query_name_parses_per_destination_kind() {
		let supplier = supplier(vec![
			ComponentField::new("count", FieldType::of::<i32>())
				.parameter()
				.from_query_named("v"),
			ComponentField::new("ratio", FieldType::of::<f64>())
				.parameter()
				.from_query_named("v"),
		]);

		let assignments = supplier.render_assignments("v=2.5");

		assert_eq!(
			values(&assignments),
			vec![("count", None), ("ratio", Some(QueryValue::Double(2.5)))]
		);
	}

	#[rstest]
	fn test_assignments_are_sorted_by_field_name() {
		let supplier = supplier(vec![
			ComponentField::new("zeta", FieldType::of::<bool>())
				.parameter()
				.from_query(),
			ComponentField::new("alpha", FieldType::of::<i64>())
				.parameter()
				.from_query(),
			ComponentField::new("Mid", FieldType::of::<i32>())
				.parameter()
				.from_query(),
		]);

		let names: Vec<_> = supplier.field_names().collect();
		assert_eq!(names, vec!["Mid", "alpha", "zeta"]);

		let assignments = supplier.render_assignments("zeta=true&alpha=10");
		assert_eq!(
			values(&assignments),
			vec![
				("Mid", None),
				("alpha", Some(QueryValue::Long(10))),
				("zeta", Some(QueryValue::Bool(true))),
			]
		);
	}

	#[rstest]
	fn test_decodes_values_before_parsing() {
		let supplier = supplier(vec![
			ComponentField::new("at", FieldType::of::<Option<chrono::NaiveDateTime>>())
				.parameter()
				.from_query(),
		]);

		let assignments = supplier.render_assignments("at=2024-01-15+10%3A20%3A30");

		let expected = chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
			.unwrap()
			.and_hms_opt(10, 20, 30)
			.unwrap();
		assert_eq!(assignments[0].value, Some(QueryValue::DateTime(expected)));
	}

	#[rstest]
	fn test_renders_do_not_leak_into_each_other(paged: QueryParameterValueSupplier) {
		assert_eq!(
			paged.render_assignments("page=3")[0].value,
			Some(QueryValue::Int(3))
		);
		assert_eq!(paged.render_assignments("")[0].value, None);
	}

	#[rstest]
	fn test_no_mappings_yields_no_supplier() {
		assert!(QueryParameterValueSupplier::new(Vec::new()).is_none());
	}

	#[rstest]
	fn test_render_into_hash_map_sink(paged: QueryParameterValueSupplier) {
		let mut attrs: HashMap<String, Option<QueryValue>> = HashMap::new();
		attrs.insert("Page".to_string(), Some(QueryValue::Int(99)));

		paged.render_parameters_from_query_string(&mut attrs, "unrelated=1");

		assert_eq!(attrs.len(), 1);
		assert_eq!(attrs["Page"], None);
	}

	#[rstest]
	fn test_render_into_vec_sink(paged: QueryParameterValueSupplier) {
		let mut sink: Vec<QueryAssignment> = Vec::new();

		paged.render_parameters_from_query_string(&mut sink, "page=4");

		assert_eq!(sink, paged.render_assignments("page=4"));
	}

	#[rstest]
	fn test_assignments_serialize_for_hydration(paged: QueryParameterValueSupplier) {
		let assignments = paged.render_assignments("page=5");

		let json = serde_json::to_value(&assignments).unwrap();
		assert_eq!(
			json,
			serde_json::json!([{ "field": "Page", "value": { "kind": "int", "value": 5 } }])
		);

		let restored: Vec<QueryAssignment> = serde_json::from_value(json).unwrap();
		assert_eq!(restored, assignments);
	}

	#[rstest]
	#[case("ratio=inf")]
	#[case("ratio=NaN")]
	#[case("ratio=1e400")]
	#[case("ratio=2.5&ratio=-inf")]
	fn test_non_finite_values_keep_hydration_readable(#[case] query: &str) {
		let supplier = supplier(vec![
			ComponentField::new("ratio", FieldType::of::<Option<f64>>())
				.parameter()
				.from_query(),
			ComponentField::new("scale", FieldType::of::<Option<f32>>())
				.parameter()
				.from_query_named("ratio"),
		]);
		let assignments = supplier.render_assignments(query);

		let json = serde_json::to_string(&assignments).unwrap();
		let restored: Vec<QueryAssignment> = serde_json::from_str(&json).unwrap();

		assert_eq!(restored, assignments);
		assert_eq!(assignments, supplier.render_assignments(query));
	}

	proptest! {
		#[test]
		fn prop_unrelated_query_resets_every_field(
			query in "([a-o]{1,6}=[a-z0-9%+]{0,6}&?){0,5}",
		) {
			// Bound names all start with letters past 'o'
			let supplier = supplier(vec![
				ComponentField::new("page", FieldType::of::<Option<i32>>())
					.parameter()
					.from_query_named("pg"),
				ComponentField::new("sort", FieldType::of::<bool>())
					.parameter()
					.from_query_named("srt"),
			]);

			let assignments = supplier.render_assignments(&query);

			prop_assert_eq!(assignments.len(), 2);
			prop_assert!(assignments.iter().all(|a| a.value.is_none()));
		}

		#[test]
		fn prop_every_field_assigned_exactly_once(query in ".{0,64}") {
			let supplier = supplier(vec![
				ComponentField::new("b", FieldType::of::<i32>())
					.parameter()
					.from_query(),
				ComponentField::new("a", FieldType::of::<uuid::Uuid>())
					.parameter()
					.from_query(),
			]);

			let names: Vec<_> = supplier
				.render_assignments(&query)
				.into_iter()
				.map(|a| a.field.to_string())
				.collect();

			prop_assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
		}
	}
}
