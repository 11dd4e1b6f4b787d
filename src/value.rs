//! Scalar kinds that can be bound from a query string, and their parsed values.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed set of scalar kinds a query parameter can be parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
	/// `bool`
	Bool,
	/// `chrono::NaiveDateTime`
	DateTime,
	/// `rust_decimal::Decimal`
	Decimal,
	/// `f64`
	Double,
	/// `f32`
	Float,
	/// `uuid::Uuid`
	Guid,
	/// `i32`
	Int,
	/// `i64`
	Long,
}

impl ScalarKind {
	/// All supported kinds.
	pub const ALL: [ScalarKind; 8] = [
		Self::Bool,
		Self::DateTime,
		Self::Decimal,
		Self::Double,
		Self::Float,
		Self::Guid,
		Self::Int,
		Self::Long,
	];

	/// Returns the canonical short name of the kind (`int`, `guid`, ...).
	pub fn name(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::DateTime => "datetime",
			Self::Decimal => "decimal",
			Self::Double => "double",
			Self::Float => "float",
			Self::Guid => "guid",
			Self::Int => "int",
			Self::Long => "long",
		}
	}

	/// Resolves a Rust type to its scalar kind.
	///
	/// `Option<T>` is the nullable form of `T` and resolves to `T`'s kind.
	/// Returns `None` for any type outside the supported set.
	pub fn of_type_id(type_id: TypeId) -> Option<Self> {
		SUPPORTED_TYPES.get(&type_id).copied()
	}
}

impl fmt::Display for ScalarKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

static SUPPORTED_TYPES: Lazy<HashMap<TypeId, ScalarKind>> = Lazy::new(|| {
	let mut types = HashMap::with_capacity(ScalarKind::ALL.len() * 2);

	macro_rules! register {
		($($ty:ty => $kind:ident),* $(,)?) => {
			$(
				types.insert(TypeId::of::<$ty>(), ScalarKind::$kind);
				types.insert(TypeId::of::<Option<$ty>>(), ScalarKind::$kind);
			)*
		};
	}

	register! {
		bool => Bool,
		NaiveDateTime => DateTime,
		Decimal => Decimal,
		f64 => Double,
		f32 => Float,
		Uuid => Guid,
		i32 => Int,
		i64 => Long,
	}

	types
});

/// A value parsed from the query string.
///
/// The serialized form is tagged with the kind name so that assignments can
/// be embedded in hydration payloads and read back unambiguously.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum QueryValue {
	Bool(bool),
	DateTime(NaiveDateTime),
	Decimal(Decimal),
	Double(f64),
	Float(f32),
	Guid(Uuid),
	Int(i32),
	Long(i64),
}

impl QueryValue {
	/// Returns the kind of this value.
	pub fn kind(&self) -> ScalarKind {
		match self {
			Self::Bool(_) => ScalarKind::Bool,
			Self::DateTime(_) => ScalarKind::DateTime,
			Self::Decimal(_) => ScalarKind::Decimal,
			Self::Double(_) => ScalarKind::Double,
			Self::Float(_) => ScalarKind::Float,
			Self::Guid(_) => ScalarKind::Guid,
			Self::Int(_) => ScalarKind::Int,
			Self::Long(_) => ScalarKind::Long,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_date_time(&self) -> Option<NaiveDateTime> {
		match self {
			Self::DateTime(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_decimal(&self) -> Option<Decimal> {
		match self {
			Self::Decimal(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Double(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_f32(&self) -> Option<f32> {
		match self {
			Self::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_uuid(&self) -> Option<Uuid> {
		match self {
			Self::Guid(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_i32(&self) -> Option<i32> {
		match self {
			Self::Int(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Long(v) => Some(*v),
			_ => None,
		}
	}
}

/// Formats the value in the canonical text form its kind's parser accepts.
impl fmt::Display for QueryValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(v) => write!(f, "{}", v),
			Self::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
			Self::Decimal(v) => write!(f, "{}", v),
			Self::Double(v) => write!(f, "{}", v),
			Self::Float(v) => write!(f, "{}", v),
			Self::Guid(v) => write!(f, "{}", v.hyphenated()),
			Self::Int(v) => write!(f, "{}", v),
			Self::Long(v) => write!(f, "{}", v),
		}
	}
}

macro_rules! impl_from_scalar {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for QueryValue {
				fn from(value: $ty) -> Self {
					Self::$variant(value)
				}
			}
		)*
	};
}

impl_from_scalar! {
	bool => Bool,
	NaiveDateTime => DateTime,
	Decimal => Decimal,
	f64 => Double,
	f32 => Float,
	Uuid => Guid,
	i32 => Int,
	i64 => Long,
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(TypeId::of::<i32>(), Some(ScalarKind::Int))]
	#[case(TypeId::of::<Option<i32>>(), Some(ScalarKind::Int))]
	#[case(TypeId::of::<i64>(), Some(ScalarKind::Long))]
	#[case(TypeId::of::<Option<bool>>(), Some(ScalarKind::Bool))]
	#[case(TypeId::of::<Uuid>(), Some(ScalarKind::Guid))]
	#[case(TypeId::of::<Option<NaiveDateTime>>(), Some(ScalarKind::DateTime))]
	#[case(TypeId::of::<Decimal>(), Some(ScalarKind::Decimal))]
	#[case(TypeId::of::<f32>(), Some(ScalarKind::Float))]
	#[case(TypeId::of::<Option<f64>>(), Some(ScalarKind::Double))]
	#[case(TypeId::of::<String>(), None)]
	#[case(TypeId::of::<u32>(), None)]
	#[case(TypeId::of::<Option<Option<i32>>>(), None)]
	#[case(TypeId::of::<Vec<i32>>(), None)]
	fn test_of_type_id(#[case] type_id: TypeId, #[case] expected: Option<ScalarKind>) {
		assert_eq!(ScalarKind::of_type_id(type_id), expected);
	}

	#[rstest]
	fn test_kind_names_are_unique() {
		let mut names: Vec<_> = ScalarKind::ALL.iter().map(|k| k.name()).collect();
		names.sort_unstable();
		names.dedup();
		assert_eq!(names.len(), ScalarKind::ALL.len());
	}

	#[rstest]
	#[case(QueryValue::Int(-5), "-5")]
	#[case(QueryValue::Bool(true), "true")]
	#[case(QueryValue::Double(1.5), "1.5")]
	#[case(
		QueryValue::Guid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap()),
		"550e8400-e29b-41d4-a716-446655440000"
	)]
	#[case(
		QueryValue::DateTime(
			chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
				.unwrap()
				.and_hms_opt(10, 20, 30)
				.unwrap()
		),
		"2024-01-15T10:20:30"
	)]
	fn test_display_is_canonical(#[case] value: QueryValue, #[case] expected: &str) {
		assert_eq!(value.to_string(), expected);
	}

	#[rstest]
	fn test_accessors_match_variant() {
		let value = QueryValue::from(42i64);

		assert_eq!(value.kind(), ScalarKind::Long);
		assert_eq!(value.as_i64(), Some(42));
		assert_eq!(value.as_i32(), None);
	}
}
