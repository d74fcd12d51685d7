//! Response envelope decoding.

use prefpop_model::{Composition, PopulationPoint, PopulationSeries, Prefecture, PrefectureId};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{Result, SourceError};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
	message: Option<String>,
	result: Option<T>,
}

impl<T> Envelope<T> {
	fn into_result(self) -> Result<T> {
		match self.result {
			Some(result) => Ok(result),
			None => Err(SourceError::Api(self.message.unwrap_or_else(|| "response carried no result".to_string()))),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePrefecture {
	pref_code: u32,
	pref_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePopulation {
	boundary_year: i32,
	data: Vec<WireComposition>,
}

#[derive(Debug, Deserialize)]
struct WireComposition {
	label: String,
	data: Vec<WirePoint>,
}

#[derive(Debug, Deserialize)]
struct WirePoint {
	year: i32,
	value: u64,
	rate: Option<f64>,
}

fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
	serde_json::from_slice::<Envelope<T>>(body)?.into_result()
}

/// Decodes a prefecture list response, in the order the API lists them.
pub fn decode_prefectures(body: &[u8]) -> Result<Vec<Prefecture>> {
	Ok(decode_envelope::<Vec<WirePrefecture>>(body)?
		.into_iter()
		.map(|p| Prefecture::new(p.pref_code, p.pref_name))
		.collect())
}

/// Decodes a population composition response for `prefecture`.
pub fn decode_population(prefecture: PrefectureId, body: &[u8]) -> Result<PopulationSeries> {
	let wire: WirePopulation = decode_envelope(body)?;
	let compositions = wire
		.data
		.into_iter()
		.map(|comp| {
			let points = comp.data.into_iter().map(|p| PopulationPoint::new(p.year, p.value, p.rate)).collect();
			Composition::new(comp.label, points)
		})
		.collect();
	Ok(PopulationSeries::new(prefecture, wire.boundary_year, compositions)?)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn decodes_prefecture_list() {
		let body = r#"{
			"message": null,
			"result": [
				{ "prefCode": 1, "prefName": "北海道" },
				{ "prefCode": 2, "prefName": "青森県" },
				{ "prefCode": 3, "prefName": "岩手県" }
			]
		}"#;
		let prefectures = decode_prefectures(body.as_bytes()).unwrap();
		assert_eq!(
			prefectures,
			vec![Prefecture::new(1, "北海道"), Prefecture::new(2, "青森県"), Prefecture::new(3, "岩手県")]
		);
	}

	#[test]
	fn decodes_population_with_and_without_rate() {
		let body = r#"{
			"message": "success",
			"result": {
				"boundaryYear": 2020,
				"data": [
					{ "label": "総人口", "data": [{ "year": 1960, "value": 5039206 }] },
					{ "label": "年少人口", "data": [{ "year": 1960, "value": 1681479, "rate": 33.37 }] }
				]
			}
		}"#;
		let series = decode_population(PrefectureId(1), body.as_bytes()).unwrap();
		assert_eq!(series.prefecture(), PrefectureId(1));
		assert_eq!(series.boundary_year(), 2020);
		assert_eq!(series.composition("総人口").unwrap().points, vec![PopulationPoint::new(1960, 5039206, None)]);
		assert_eq!(
			series.composition("年少人口").unwrap().points,
			vec![PopulationPoint::new(1960, 1681479, Some(33.37))]
		);
	}

	#[test]
	fn empty_population_result_is_valid() {
		let body = r#"{ "message": "success", "result": { "boundaryYear": 2020, "data": [] } }"#;
		let series = decode_population(PrefectureId(1), body.as_bytes()).unwrap();
		assert!(series.compositions().is_empty());
	}

	#[test]
	fn missing_result_surfaces_message() {
		let body = r#"{ "statusCode": "403", "message": "Forbidden.", "description": "" }"#;
		let err = decode_prefectures(body.as_bytes()).unwrap_err();
		assert_eq!(err, SourceError::Api("Forbidden.".into()));
	}

	#[test]
	fn undecodable_body_is_malformed() {
		let err = decode_population(PrefectureId(1), b"<html>").unwrap_err();
		assert!(matches!(err, SourceError::Malformed(_)));

		let err = decode_population(PrefectureId(1), br#"{"result":{"boundaryYear":"x","data":[]}}"#).unwrap_err();
		assert!(matches!(err, SourceError::Malformed(_)));
	}

	#[test]
	fn invariant_violations_are_malformed() {
		let body = r#"{ "result": { "boundaryYear": 2020, "data": [
			{ "label": "総人口", "data": [{ "year": 1965, "value": 2 }, { "year": 1960, "value": 1 }] }
		] } }"#;
		let err = decode_population(PrefectureId(5), body.as_bytes()).unwrap_err();
		assert!(matches!(err, SourceError::Malformed(msg) if msg.contains("not ascending")));
	}
}
