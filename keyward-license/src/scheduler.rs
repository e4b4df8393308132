//! Periodic job scheduling.

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Name under which license revalidation is registered.
pub const REVALIDATION_JOB: &str = "license_revalidation";

/// How often the stored license is re-validated.
pub const REVALIDATION_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// A unit of scheduled work.
pub type Job = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// The host's periodic task facility.
pub trait Scheduler: Send + Sync {
    /// Runs `job` now and then every `period`.
    ///
    /// Registration is idempotent per `name`: registering a name that is
    /// already scheduled does nothing and returns false.
    fn schedule(&self, name: &str, period: Duration, job: Job) -> bool;

    /// Stops a job. Returns false if no job had that name.
    fn unschedule(&self, name: &str) -> bool;

    /// Returns true if a job with this name is running.
    fn is_scheduled(&self, name: &str) -> bool;
}

/// [`Scheduler`] running each job on its own tokio interval task.
///
/// Must be used from within a tokio runtime. Jobs are aborted when the
/// scheduler is dropped.
#[derive(Default)]
pub struct IntervalScheduler {
    jobs: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl IntervalScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn jobs(&self) -> MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule(&self, name: &str, period: Duration, job: Job) -> bool {
        let mut jobs = self.jobs();
        if jobs.get(name).is_some_and(|handle| !handle.is_finished()) {
            debug!("job {name} already scheduled");
            return false;
        }

        let task_name = name.to_string();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!("running scheduled job {task_name}");
                job().await;
            }
        });
        jobs.insert(name.to_string(), handle);
        info!("scheduled {name} every {}s", period.as_secs());
        true
    }

    fn unschedule(&self, name: &str) -> bool {
        match self.jobs().remove(name) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn is_scheduled(&self, name: &str) -> bool {
        self.jobs()
            .get(name)
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.jobs().drain() {
            handle.abort();
        }
    }
}
