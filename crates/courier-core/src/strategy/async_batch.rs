use std::sync::Arc;
use std::sync::mpsc;

use tracing::debug;

use crate::error::{AggregateError, CourierError};
use crate::ports::WorkerPool;

use super::{NotificationStrategy, Task, run_caught};

/// Runs the whole task list sequentially inside one pool job and waits for it.
///
/// The caller thread never runs a handler, and handlers never overlap each
/// other. Failures keep task order.
pub struct AsyncWaitAll {
    pool: Arc<dyn WorkerPool>,
}

impl AsyncWaitAll {
    pub fn new(pool: Arc<dyn WorkerPool>) -> Self {
        Self { pool }
    }
}

impl NotificationStrategy for AsyncWaitAll {
    fn run(&mut self, tasks: Vec<Task>) -> Result<(), CourierError> {
        debug!(strategy = "async-wait-all", tasks = tasks.len(), "submitting notification batch");
        let (tx, rx) = mpsc::channel();
        self.pool.execute(Box::new(move || {
            let failures: Vec<CourierError> =
                tasks.into_iter().filter_map(|task| run_caught(task).err()).collect();
            let _ = tx.send(failures);
        }));

        match rx.recv() {
            Ok(failures) => AggregateError::into_result(failures),
            Err(_) => Err(CourierError::Abandoned),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::strategy::fixtures::{Probe, messages, pool};

    #[test]
    fn runs_the_batch_on_a_single_pool_thread() {
        let runtime = pool(4);
        let probe = Probe::default();

        let err = AsyncWaitAll::new(Arc::new(runtime.handle().clone()))
            .run(probe.two_failing_two_ok())
            .unwrap_err();

        assert_eq!(probe.handled(), 4);
        assert_eq!(probe.order(), vec!["H1", "H2", "H3", "H4"]);
        let threads = probe.threads();
        assert_eq!(threads.len(), 1);
        assert!(!threads.contains(&thread::current().id()));
        assert_eq!(messages(&err), vec!["Omg", "Oh!"]);
    }

    #[test]
    fn dropped_batch_is_abandoned() {
        struct Black;

        impl WorkerPool for Black {
            fn execute(&self, job: crate::ports::Job) {
                drop(job);
            }
        }

        let err = AsyncWaitAll::new(Arc::new(Black)).run(Vec::new()).unwrap_err();
        assert!(matches!(err, CourierError::Abandoned));
    }
}
