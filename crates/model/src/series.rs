use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::{PrefectureId, SeriesError};

/// One yearly sample of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopulationPoint {
	pub year: i32,
	pub value: u64,
	/// Share of the total population in percent. Absent for the total itself.
	pub rate: Option<f64>,
}

impl PopulationPoint {
	pub const fn new(year: i32, value: u64, rate: Option<f64>) -> Self {
		Self { year, value, rate }
	}
}

/// A labelled population series, e.g. working-age population over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
	pub label: String,
	pub points: Vec<PopulationPoint>,
}

impl Composition {
	pub fn new(label: impl Into<String>, points: Vec<PopulationPoint>) -> Self {
		Self {
			label: label.into(),
			points,
		}
	}
}

/// Population composition of one prefecture as fetched from the data source.
///
/// Years after `boundary_year` are projections rather than census figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationSeries {
	prefecture: PrefectureId,
	boundary_year: i32,
	compositions: Vec<Composition>,
}

impl PopulationSeries {
	/// Validates and builds a series.
	pub fn new(prefecture: PrefectureId, boundary_year: i32, compositions: Vec<Composition>) -> Result<Self, SeriesError> {
		let mut labels = FxHashSet::default();
		for comp in &compositions {
			if !labels.insert(comp.label.as_str()) {
				return Err(SeriesError::DuplicateLabel {
					prefecture,
					label: comp.label.clone(),
				});
			}
			if let Some(pair) = comp.points.windows(2).find(|w| w[0].year >= w[1].year) {
				return Err(SeriesError::UnorderedPoints {
					prefecture,
					label: comp.label.clone(),
					year: pair[1].year,
				});
			}
		}
		Ok(Self {
			prefecture,
			boundary_year,
			compositions,
		})
	}

	pub fn prefecture(&self) -> PrefectureId {
		self.prefecture
	}

	pub fn boundary_year(&self) -> i32 {
		self.boundary_year
	}

	pub fn compositions(&self) -> &[Composition] {
		&self.compositions
	}

	/// Composition with the given label.
	pub fn composition(&self, label: &str) -> Option<&Composition> {
		self.compositions.iter().find(|c| c.label == label)
	}

	pub fn labels(&self) -> impl Iterator<Item = &str> {
		self.compositions.iter().map(|c| c.label.as_str())
	}
}
