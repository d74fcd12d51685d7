use url::Url;

use crate::{QueryParams, Result, SourceError};

/// API endpoints known to [`crate::HttpSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
	/// Full prefecture list.
	Prefectures,
	/// Yearly population composition of one prefecture (`prefCode` param).
	PopulationComposition,
}

impl Endpoint {
	const fn segments(self) -> &'static [&'static str] {
		match self {
			Self::Prefectures => &["api", "v1", "prefectures"],
			Self::PopulationComposition => &["api", "v1", "population", "composition", "perYear"],
		}
	}

	/// Resolves this endpoint under `base`, keeping any path prefix of `base`.
	pub fn url(self, base: &Url, params: &QueryParams) -> Result<Url> {
		let mut url = base.clone();
		url.set_query(None);
		url.set_fragment(None);
		url.path_segments_mut()
			.map_err(|()| SourceError::Config(format!("base url cannot carry a path: {base}")))?
			.pop_if_empty()
			.extend(self.segments());
		params.apply(&mut url);
		Ok(url)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn resolves_against_bare_host() {
		let base = Url::parse("https://yumemi-frontend-engineer-codecheck-api.vercel.app").unwrap();
		let url = Endpoint::Prefectures.url(&base, &QueryParams::new()).unwrap();
		assert_eq!(url.as_str(), "https://yumemi-frontend-engineer-codecheck-api.vercel.app/api/v1/prefectures");
	}

	#[test]
	fn keeps_base_path_prefix_and_appends_query() {
		let base = Url::parse("http://localhost:8080/proxy/").unwrap();
		let params = QueryParams::new().push("prefCode", 13);
		let url = Endpoint::PopulationComposition.url(&base, &params).unwrap();
		assert_eq!(url.as_str(), "http://localhost:8080/proxy/api/v1/population/composition/perYear?prefCode=13");
	}

	#[test]
	fn rejects_cannot_be_a_base_urls() {
		let base = Url::parse("mailto:someone@example.test").unwrap();
		let err = Endpoint::Prefectures.url(&base, &QueryParams::new()).unwrap_err();
		assert!(matches!(err, SourceError::Config(_)));
	}
}
