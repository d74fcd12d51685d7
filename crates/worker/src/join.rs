use tokio::task::JoinError;

/// Turns a failed join into text that can be stored on a cache entry.
pub fn describe_join_error(err: JoinError) -> String {
	if err.is_cancelled() {
		return "task was cancelled".to_string();
	}
	let Ok(payload) = err.try_into_panic() else {
		return "task failed".to_string();
	};
	let msg = payload
		.downcast_ref::<&str>()
		.copied()
		.or_else(|| payload.downcast_ref::<String>().map(String::as_str));
	match msg {
		Some(msg) => format!("task panicked: {msg}"),
		None => "task panicked".to_string(),
	}
}
