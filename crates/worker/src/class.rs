/// What a spawned task is for, recorded on every spawn trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// A request to the population data source.
	Fetch,
	/// Forwards a finished task's outcome to its owner, panics included.
	Relay,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Fetch => "fetch",
			Self::Relay => "relay",
		}
	}
}
