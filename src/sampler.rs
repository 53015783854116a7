// Live task sampler
// Periodically copies the runtime's alive task count into `go_goroutine`
//
// Numan Thabit 2025 Nov

use crate::metrics::Metrics;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Start the task sampler on the current runtime.
///
/// The loop never exits on its own; abort the returned handle to stop it.
/// Must be called from within a tokio runtime.
pub fn spawn_task_sampler(metrics: Arc<Metrics>, period: Duration) -> tokio::task::JoinHandle<()> {
    let runtime = Handle::current();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let tasks = runtime.metrics().num_alive_tasks();
            metrics.set_task_count(tasks);
            debug!(tasks = tasks, "sampled live tasks");
        }
    })
}
