use async_trait::async_trait;
use prefpop_model::{PopulationSeries, Prefecture, PrefectureId};

use crate::Result;

/// Where prefectures and their population compositions come from.
///
/// Implementations must surface failures rather than returning empty data.
#[async_trait]
pub trait PopulationSource: Send + Sync {
	/// Fetches the full prefecture list.
	async fn fetch_prefectures(&self) -> Result<Vec<Prefecture>>;

	/// Fetches the population composition of one prefecture.
	async fn fetch_population(&self, prefecture: PrefectureId) -> Result<PopulationSeries>;
}
