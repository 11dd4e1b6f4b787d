//! Benchmark: Query binding render path (cache hit + single-pass scan)

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use reinhardt_pages_query::{
	ComponentField, FieldType, QueryBindingCache, QueryComponent, SupplierLookup,
};

// Benchmark fixture: a typical list page
struct ProductList;

impl QueryComponent for ProductList {
	fn component_fields() -> Vec<ComponentField> {
		vec![
			ComponentField::new("page", FieldType::of::<Option<i32>>())
				.parameter()
				.from_query(),
			ComponentField::new("category", FieldType::of::<Option<uuid::Uuid>>())
				.parameter()
				.from_query(),
			ComponentField::new("in_stock", FieldType::of::<bool>())
				.parameter()
				.from_query(),
		]
	}
}

fn benchmark_cache_lookup(c: &mut Criterion) {
	let cache = QueryBindingCache::new();
	cache.for_type::<ProductList>().unwrap();

	c.bench_function("cache_lookup_hit", |b| {
		b.iter(|| black_box(cache.for_type::<ProductList>().unwrap()));
	});
}

fn benchmark_render_assignments(c: &mut Criterion) {
	let cache = QueryBindingCache::new();
	let SupplierLookup::Found(supplier) = cache.for_type::<ProductList>().unwrap() else {
		panic!("ProductList binds query parameters");
	};

	c.bench_function("render_empty_query", |b| {
		b.iter(|| black_box(supplier.render_assignments(black_box(""))));
	});

	c.bench_function("render_matching_query", |b| {
		b.iter(|| {
			black_box(supplier.render_assignments(black_box(
				"?page=12&category=550e8400-e29b-41d4-a716-446655440000&in_stock=true",
			)))
		});
	});

	c.bench_function("render_noisy_query", |b| {
		b.iter(|| {
			black_box(supplier.render_assignments(black_box(
				"utm_source=news&utm_medium=email&utm_campaign=spring+sale&ref=abc%20def&page=3",
			)))
		});
	});
}

criterion_group!(benches, benchmark_cache_lookup, benchmark_render_assignments);
criterion_main!(benches);
