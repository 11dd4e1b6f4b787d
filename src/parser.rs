//! Value parsers for query parameter values.
//!
//! Each supported [`ScalarKind`] has one validator turning decoded query
//! text into a [`QueryValue`]. Parsers are created on first use and shared
//! for the lifetime of the process through a [`ParserRegistry`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::UnsupportedTypeError;
use crate::field::FieldType;
use crate::value::{QueryValue, ScalarKind};

type Validator = fn(&str) -> Option<QueryValue>;

/// Parses query text for exactly one scalar kind.
#[derive(Clone)]
pub struct QueryValueParser {
	kind: ScalarKind,
	validator: Validator,
}

impl QueryValueParser {
	/// Creates the parser for `kind`.
	pub fn new(kind: ScalarKind) -> Self {
		let validator: Validator = match kind {
			ScalarKind::Bool => parse_bool,
			ScalarKind::DateTime => parse_date_time,
			ScalarKind::Decimal => parse_decimal,
			ScalarKind::Double => parse_double,
			ScalarKind::Float => parse_float,
			ScalarKind::Guid => parse_guid,
			ScalarKind::Int => parse_int,
			ScalarKind::Long => parse_long,
		};
		Self { kind, validator }
	}

	pub fn kind(&self) -> ScalarKind {
		self.kind
	}

	/// Parses one decoded value. Malformed input yields `None`.
	pub fn try_parse_single(&self, text: &str) -> Option<QueryValue> {
		(self.validator)(text.trim_matches(|c: char| c.is_ascii_whitespace()))
	}
}

impl fmt::Debug for QueryValueParser {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("QueryValueParser")
			.field("kind", &self.kind)
			.finish()
	}
}

fn parse_bool(text: &str) -> Option<QueryValue> {
	if text.eq_ignore_ascii_case("true") {
		Some(QueryValue::Bool(true))
	} else if text.eq_ignore_ascii_case("false") {
		Some(QueryValue::Bool(false))
	} else {
		None
	}
}

fn parse_date_time(text: &str) -> Option<QueryValue> {
	const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

	if let Ok(value) = DateTime::parse_from_rfc3339(text) {
		return Some(QueryValue::DateTime(value.naive_utc()));
	}
	for format in FORMATS {
		if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
			return Some(QueryValue::DateTime(value));
		}
	}
	NaiveDate::parse_from_str(text, "%Y-%m-%d")
		.ok()
		.and_then(|date| date.and_hms_opt(0, 0, 0))
		.map(QueryValue::DateTime)
}

fn parse_decimal(text: &str) -> Option<QueryValue> {
	// Digit separators are rejected, as for the integer kinds
	if text.contains('_') {
		return None;
	}
	Decimal::from_str(text)
		.or_else(|_| Decimal::from_scientific(text))
		.ok()
		.map(QueryValue::Decimal)
}

fn parse_double(text: &str) -> Option<QueryValue> {
	text.parse::<f64>()
		.ok()
		.filter(|v| v.is_finite())
		.map(QueryValue::Double)
}

fn parse_float(text: &str) -> Option<QueryValue> {
	text.parse::<f32>()
		.ok()
		.filter(|v| v.is_finite())
		.map(QueryValue::Float)
}

fn parse_guid(text: &str) -> Option<QueryValue> {
	Uuid::parse_str(text).ok().map(QueryValue::Guid)
}

fn parse_int(text: &str) -> Option<QueryValue> {
	text.parse::<i32>().ok().map(QueryValue::Int)
}

fn parse_long(text: &str) -> Option<QueryValue> {
	text.parse::<i64>().ok().map(QueryValue::Long)
}

/// Global parser registry singleton
static PARSER_REGISTRY: OnceLock<Arc<ParserRegistry>> = OnceLock::new();

/// Caches one [`QueryValueParser`] per scalar kind.
///
/// Safe to share between threads. Two threads racing on the same kind may
/// both construct a parser; construction is a pure function of the kind and
/// the first inserted parser is the one every caller gets back.
#[derive(Debug, Default)]
pub struct ParserRegistry {
	parsers: RwLock<HashMap<ScalarKind, Arc<QueryValueParser>>>,
}

impl ParserRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the process-wide registry.
	pub fn global() -> Arc<ParserRegistry> {
		PARSER_REGISTRY
			.get_or_init(|| Arc::new(Self::new()))
			.clone()
	}

	/// Returns the parser for a field type, unwrapping `Option<T>` to `T`.
	///
	/// # Errors
	///
	/// Returns [`UnsupportedTypeError`] if the type is outside the supported
	/// scalar set.
	pub fn get_or_create(
		&self,
		field_type: &FieldType,
	) -> Result<Arc<QueryValueParser>, UnsupportedTypeError> {
		let kind = field_type.scalar_kind().ok_or(UnsupportedTypeError {
			type_name: field_type.type_name(),
		})?;
		Ok(self.get_or_create_kind(kind))
	}

	/// Returns the parser for `kind`, creating it on first use.
	pub fn get_or_create_kind(&self, kind: ScalarKind) -> Arc<QueryValueParser> {
		if let Some(parser) = self.parsers.read().get(&kind) {
			return parser.clone();
		}

		tracing::trace!(kind = kind.name(), "creating query value parser");
		let parser = Arc::new(QueryValueParser::new(kind));
		self.parsers.write().entry(kind).or_insert(parser).clone()
	}

	/// Returns the number of parsers created so far.
	pub fn len(&self) -> usize {
		self.parsers.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.parsers.read().is_empty()
	}
}
