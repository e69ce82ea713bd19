use std::time::Duration;

use tokio::{task::JoinHandle, time::interval};

use super::Panel;

/// Owned handle to the recurring poll cycle.
///
/// Spawning performs one full poll immediately, then repeats every `period`.
/// Dropping the handle aborts the task, so no orphaned requests continue once
/// the owning view is gone.
pub struct Poller {
    task: JoinHandle<()>,
}

impl Poller {
    pub fn spawn(panel: Panel, period: Duration) -> Self {
        let task = tokio::spawn(async move {
            // the first tick completes immediately
            let mut timer = interval(period);

            loop {
                timer.tick().await;
                panel.poll_all().await;
            }
        });

        Poller { task }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
