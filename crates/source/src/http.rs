//! HTTP implementation of [`PopulationSource`].

use async_trait::async_trait;
use prefpop_model::{PopulationSeries, Prefecture, PrefectureId};
use reqwest::header::ACCEPT;
use reqwest::{Client, Request};
use tracing::debug;

use crate::{ApiConfig, Endpoint, PopulationSource, QueryParams, Result, SourceError, decode_population, decode_prefectures};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// [`PopulationSource`] backed by the prefecture population HTTP API.
#[derive(Debug, Clone)]
pub struct HttpSource {
	client: Client,
	config: ApiConfig,
}

impl HttpSource {
	/// Builds a client for `config`.
	pub fn new(config: ApiConfig) -> Result<Self> {
		config.validate()?;
		let client = Client::builder()
			.timeout(config.request_timeout())
			.user_agent(config.user_agent.clone())
			.build()
			.map_err(|e| SourceError::Config(e.to_string()))?;
		Ok(Self { client, config })
	}

	pub fn config(&self) -> &ApiConfig {
		&self.config
	}

	/// Builds the GET request for `endpoint` without sending it.
	pub fn build_request(&self, endpoint: Endpoint, params: &QueryParams) -> Result<Request> {
		let url = endpoint.url(&self.config.base_url, params)?;
		let mut request = self.client.get(url).header(ACCEPT, "application/json");
		if let Some(key) = &self.config.api_key {
			request = request.header(API_KEY_HEADER, key);
		}
		request.build().map_err(|e| SourceError::Config(e.to_string()))
	}

	async fn execute(&self, request: Request) -> Result<Vec<u8>> {
		let url = request.url().clone();
		let response = self
			.client
			.execute(request)
			.await
			.map_err(|e| SourceError::Transport(e.to_string()))?;

		let status = response.status();
		debug!(url = %url, status = status.as_u16(), "source.response");
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(SourceError::Status {
				status: status.as_u16(),
				body,
			});
		}

		let body = response.bytes().await.map_err(|e| SourceError::Transport(e.to_string()))?;
		Ok(body.to_vec())
	}
}

#[async_trait]
impl PopulationSource for HttpSource {
	async fn fetch_prefectures(&self) -> Result<Vec<Prefecture>> {
		let request = self.build_request(Endpoint::Prefectures, &QueryParams::new())?;
		let body = self.execute(request).await?;
		decode_prefectures(&body)
	}

	async fn fetch_population(&self, prefecture: PrefectureId) -> Result<PopulationSeries> {
		let params = QueryParams::new().push("prefCode", prefecture.0);
		let request = self.build_request(Endpoint::PopulationComposition, &params)?;
		let body = self.execute(request).await?;
		decode_population(prefecture, &body)
	}
}
