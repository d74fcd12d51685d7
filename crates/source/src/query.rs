//! Query string construction.

use url::{Url, form_urlencoded};

/// Ordered query parameters. Absent values are dropped, never rendered empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
	pairs: Vec<(String, String)>,
}

impl QueryParams {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a parameter.
	pub fn push(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.pairs.push((key.into(), value.to_string()));
		self
	}

	/// Appends a parameter only when `value` is present.
	pub fn push_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
		match value {
			Some(value) => self.push(key, value),
			None => self,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	/// Renders `key=value&...` with form encoding.
	pub fn encode(&self) -> String {
		form_urlencoded::Serializer::new(String::new())
			.extend_pairs(&self.pairs)
			.finish()
	}

	/// Appends the parameters to `url`'s query.
	pub fn apply(&self, url: &mut Url) {
		if self.pairs.is_empty() {
			return;
		}
		url.query_pairs_mut().extend_pairs(&self.pairs);
	}
}
