use std::future::Future;

use tokio::task::JoinHandle;

use crate::TaskClass;

/// Spawns `fut` on the current Tokio runtime and records its class.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime. Fetches are only started
/// from the controller, which always runs inside one.
#[allow(clippy::disallowed_methods)]
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	tokio::spawn(fut)
}
