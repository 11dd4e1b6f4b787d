//! Single-pass query string scanning.
//!
//! [`QueryStringEnumerator`] walks a raw query string from left to right and
//! yields its `name=value` pairs as slices of the input. Nothing is decoded
//! or allocated while scanning; values are decoded on demand, and only for
//! pairs somebody is interested in.

use std::borrow::Cow;

/// One undecoded `name=value` pair of a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryStringParameter<'a> {
	/// The name exactly as it appears in the query string.
	pub encoded_name: &'a str,
	/// The value exactly as it appears in the query string.
	pub encoded_value: &'a str,
}

impl<'a> QueryStringParameter<'a> {
	/// Decodes the value: `+` becomes a space, then `%XX` escapes are
	/// resolved. Invalid UTF-8 in the result is replaced lossily.
	pub fn decoded_value(&self) -> Cow<'a, str> {
		decode_query_component(self.encoded_value)
	}
}

/// Decodes one query string component using form-urlencoded rules.
pub fn decode_query_component(encoded: &str) -> Cow<'_, str> {
	if !encoded.contains(['+', '%']) {
		return Cow::Borrowed(encoded);
	}

	let spaced = encoded.replace('+', " ");
	let bytes = urlencoding::decode_binary(spaced.as_bytes());
	Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}

/// Iterator over the pairs of a query string.
///
/// A leading `?` is skipped. Empty segments (`a=1&&b=2`) are skipped. A
/// segment without `=` yields an empty value. Repeated names are all
/// yielded, in order.
#[derive(Debug, Clone)]
pub struct QueryStringEnumerator<'a> {
	remaining: &'a str,
}

impl<'a> QueryStringEnumerator<'a> {
	pub fn new(query: &'a str) -> Self {
		Self {
			remaining: query.strip_prefix('?').unwrap_or(query),
		}
	}
}

impl<'a> Iterator for QueryStringEnumerator<'a> {
	type Item = QueryStringParameter<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if self.remaining.is_empty() {
				return None;
			}

			let segment = match self.remaining.split_once('&') {
				Some((segment, rest)) => {
					self.remaining = rest;
					segment
				}
				None => std::mem::take(&mut self.remaining),
			};

			if segment.is_empty() {
				continue;
			}

			// Split on the first '=' only; values may contain '=' (e.g. Base64)
			let (encoded_name, encoded_value) = segment.split_once('=').unwrap_or((segment, ""));
			return Some(QueryStringParameter {
				encoded_name,
				encoded_value,
			});
		}
	}
}
