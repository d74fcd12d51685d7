//! Plain-text and JSON output.

use std::fmt::Write as _;

use prefpop_controller::AggregatedView;
use prefpop_model::{Catalog, PopulationPoint, Prefecture, PrefectureId};
use serde::Serialize;

/// Marks points after the boundary year.
const PROJECTION_MARK: char = '*';

pub fn catalog_table(catalog: &Catalog) -> String {
	let mut out = String::new();
	for prefecture in catalog.iter() {
		let _ = writeln!(out, "{:>3} {}", prefecture.id.0, prefecture.name);
	}
	out
}

pub fn catalog_rows(catalog: &Catalog) -> Vec<&Prefecture> {
	catalog.iter().collect()
}

/// Outcome for one selected prefecture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowStatus {
	Ready { boundary_year: i32, points: Vec<PopulationPoint> },
	/// Fetched, but the series has no composition with the requested label.
	MissingLabel { available: Vec<String> },
	Failed { error: String },
	Loading,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefectureReport {
	pub id: PrefectureId,
	pub name: String,
	#[serde(flatten)]
	pub status: RowStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationReport {
	pub label: String,
	pub prefectures: Vec<PrefectureReport>,
}

impl PopulationReport {
	/// One row per selected id, in selection order.
	pub fn build(view: &AggregatedView, catalog: &Catalog, label: &str) -> Self {
		let prefectures = view
			.selected_ids()
			.iter()
			.map(|&id| {
				let status = if let Some(err) = view.failure(id) {
					RowStatus::Failed { error: err.to_string() }
				} else if let Some(series) = view.series(id) {
					match series.composition(label) {
						Some(composition) => RowStatus::Ready {
							boundary_year: series.boundary_year(),
							points: composition.points.clone(),
						},
						None => RowStatus::MissingLabel {
							available: series.labels().map(str::to_string).collect(),
						},
					}
				} else {
					RowStatus::Loading
				};
				PrefectureReport {
					id,
					name: catalog.name(id).map_or_else(|| id.to_string(), str::to_string),
					status,
				}
			})
			.collect();
		Self {
			label: label.to_string(),
			prefectures,
		}
	}

	pub fn has_failures(&self) -> bool {
		self.prefectures.iter().any(|p| matches!(p.status, RowStatus::Failed { .. }))
	}

	pub fn to_text(&self) -> String {
		let mut out = String::new();
		for row in &self.prefectures {
			let _ = writeln!(out, "{} ({}) {}", row.name, row.id.0, self.label);
			match &row.status {
				RowStatus::Ready { boundary_year, points } => {
					for point in points {
						let mark = if point.year > *boundary_year { PROJECTION_MARK } else { ' ' };
						let _ = write!(out, "  {}{mark} {:>10}", point.year, point.value);
						if let Some(rate) = point.rate {
							let _ = write!(out, " {rate:>6.2}%");
						}
						out.push('\n');
					}
				}
				RowStatus::MissingLabel { available } => {
					let _ = writeln!(out, "  no such composition (available: {})", available.join(", "));
				}
				RowStatus::Failed { error } => {
					let _ = writeln!(out, "  error: {error}");
				}
				RowStatus::Loading => out.push_str("  loading\n"),
			}
		}
		out
	}
}
