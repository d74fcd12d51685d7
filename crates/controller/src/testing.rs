//! Scripted data source for controller and cache tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use prefpop_model::{Composition, PopulationPoint, PopulationSeries, Prefecture, PrefectureId};
use prefpop_source::{PopulationSource, SourceError};
use tokio::sync::oneshot;

enum Reply {
	Done(Result<PopulationSeries, SourceError>),
	Panic,
}

#[derive(Default)]
struct ScriptState {
	calls: Vec<PrefectureId>,
	queued: HashMap<PrefectureId, VecDeque<Reply>>,
	waiters: HashMap<PrefectureId, VecDeque<oneshot::Sender<Reply>>>,
}

/// Population source whose fetches stay in flight until the test resolves
/// them. Resolutions sent before the fetch arrives are queued.
pub(crate) struct ScriptedSource {
	catalog: Result<Vec<Prefecture>, SourceError>,
	state: Mutex<ScriptState>,
}

impl ScriptedSource {
	pub fn with_catalog(prefectures: &[(u32, &str)]) -> Self {
		Self {
			catalog: Ok(prefectures.iter().map(|&(id, name)| Prefecture::new(id, name)).collect()),
			state: Mutex::default(),
		}
	}

	pub fn failing_catalog(error: SourceError) -> Self {
		Self {
			catalog: Err(error),
			state: Mutex::default(),
		}
	}

	fn reply(&self, id: PrefectureId, reply: Reply) {
		let mut state = self.state.lock().unwrap();
		let waiter = state.waiters.get_mut(&id).and_then(VecDeque::pop_front);
		match waiter {
			Some(tx) => {
				let _ = tx.send(reply);
			}
			None => state.queued.entry(id).or_default().push_back(reply),
		}
	}

	/// Completes the oldest outstanding fetch for `id` with `result`.
	pub fn resolve(&self, id: u32, result: Result<PopulationSeries, SourceError>) {
		self.reply(PrefectureId(id), Reply::Done(result));
	}

	/// Makes the oldest outstanding fetch for `id` panic.
	pub fn panic_on(&self, id: u32) {
		self.reply(PrefectureId(id), Reply::Panic);
	}

	/// Number of fetches received for `id`.
	pub fn calls_for(&self, id: u32) -> usize {
		self.state.lock().unwrap().calls.iter().filter(|c| c.0 == id).count()
	}

	pub fn total_calls(&self) -> usize {
		self.state.lock().unwrap().calls.len()
	}

	/// Yields until at least `n` fetches have arrived.
	pub async fn wait_for_calls(&self, n: usize) {
		tokio::time::timeout(Duration::from_secs(5), async {
			while self.total_calls() < n {
				tokio::time::sleep(Duration::from_millis(1)).await;
			}
		})
		.await
		.expect("fetches did not arrive in time");
	}
}

#[async_trait]
impl PopulationSource for ScriptedSource {
	async fn fetch_prefectures(&self) -> prefpop_source::Result<Vec<Prefecture>> {
		self.catalog.clone()
	}

	async fn fetch_population(&self, prefecture: PrefectureId) -> prefpop_source::Result<PopulationSeries> {
		let queued = {
			let mut state = self.state.lock().unwrap();
			state.calls.push(prefecture);
			match state.queued.get_mut(&prefecture).and_then(VecDeque::pop_front) {
				Some(reply) => Ok(reply),
				None => {
					let (tx, rx) = oneshot::channel();
					state.waiters.entry(prefecture).or_default().push_back(tx);
					Err(rx)
				}
			}
		};
		let reply = match queued {
			Ok(reply) => reply,
			Err(rx) => rx
				.await
				.unwrap_or_else(|_| Reply::Done(Err(SourceError::Transport("script dropped".into())))),
		};
		match reply {
			Reply::Done(result) => result,
			Reply::Panic => panic!("scripted panic for {prefecture}"),
		}
	}
}

/// Series with a single `年少人口` composition.
pub(crate) fn young_series(id: u32) -> PopulationSeries {
	PopulationSeries::new(
		PrefectureId(id),
		2020,
		vec![Composition::new("年少人口", vec![PopulationPoint::new(1960, 1681479, Some(33.37))])],
	)
	.unwrap()
}

/// Series with `総人口` and `年少人口` compositions.
pub(crate) fn full_series(id: u32, total: u64) -> PopulationSeries {
	PopulationSeries::new(
		PrefectureId(id),
		2020,
		vec![
			Composition::new("総人口", vec![PopulationPoint::new(1960, total, None), PopulationPoint::new(2025, total / 2, None)]),
			Composition::new("年少人口", vec![PopulationPoint::new(1960, total / 3, Some(33.3))]),
		],
	)
	.unwrap()
}
