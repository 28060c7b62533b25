//! WorkerPool 上で並列実行する strategy
//!
//! # 内部実装
//! Each task becomes one pool job that reports its outcome over an mpsc
//! channel. A job that is dropped without running drops its sender, so the
//! receiving side sees a disconnect instead of blocking forever.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use tracing::debug;

use crate::error::{AggregateError, CourierError};
use crate::ports::WorkerPool;

use super::{NotificationStrategy, Task, run_caught};

fn submit(pool: &dyn WorkerPool, tasks: Vec<Task>) -> (usize, Receiver<Result<(), CourierError>>) {
    let (tx, rx) = mpsc::channel();
    let submitted = tasks.len();
    for task in tasks {
        let tx = tx.clone();
        pool.execute(Box::new(move || {
            // 受信側が既に戻っている場合は送信失敗を無視する
            let _ = tx.send(run_caught(task));
        }));
    }
    (submitted, rx)
}

/// Submits every task and waits for all of them.
pub struct ParallelWaitAll {
    pool: Arc<dyn WorkerPool>,
}

impl ParallelWaitAll {
    pub fn new(pool: Arc<dyn WorkerPool>) -> Self {
        Self { pool }
    }
}

impl NotificationStrategy for ParallelWaitAll {
    fn run(&mut self, tasks: Vec<Task>) -> Result<(), CourierError> {
        debug!(strategy = "parallel-wait-all", tasks = tasks.len(), "submitting notification tasks");
        let (submitted, rx) = submit(self.pool.as_ref(), tasks);

        let mut failures = Vec::new();
        let mut reported = 0;
        for outcome in rx.iter().take(submitted) {
            reported += 1;
            if let Err(err) = outcome {
                failures.push(err);
            }
        }
        failures.extend((reported..submitted).map(|_| CourierError::Abandoned));

        AggregateError::into_result(failures)
    }
}

/// Submits every task and returns once any one of them completes.
///
/// Tasks still running keep running; only failures reported by the time the
/// call returns are included in the result.
pub struct ParallelWaitAny {
    pool: Arc<dyn WorkerPool>,
}

impl ParallelWaitAny {
    pub fn new(pool: Arc<dyn WorkerPool>) -> Self {
        Self { pool }
    }
}

impl NotificationStrategy for ParallelWaitAny {
    fn run(&mut self, tasks: Vec<Task>) -> Result<(), CourierError> {
        debug!(strategy = "parallel-wait-any", tasks = tasks.len(), "submitting notification tasks");
        let (submitted, rx) = submit(self.pool.as_ref(), tasks);
        if submitted == 0 {
            return Ok(());
        }

        let mut failures = Vec::new();
        match rx.recv() {
            Ok(Err(err)) => failures.push(err),
            Ok(Ok(())) => {}
            Err(_) => failures.push(CourierError::Abandoned),
        }
        failures.extend(rx.try_iter().filter_map(Result::err));

        AggregateError::into_result(failures)
    }
}

/// Submits every task and returns immediately; outcomes are discarded.
pub struct ParallelFireAndForget {
    pool: Arc<dyn WorkerPool>,
}

impl ParallelFireAndForget {
    pub fn new(pool: Arc<dyn WorkerPool>) -> Self {
        Self { pool }
    }
}

impl NotificationStrategy for ParallelFireAndForget {
    fn run(&mut self, tasks: Vec<Task>) -> Result<(), CourierError> {
        debug!(strategy = "parallel-fire-and-forget", tasks = tasks.len(), "submitting notification tasks");
        for task in tasks {
            self.pool.execute(Box::new(move || {
                if let Err(err) = run_caught(task) {
                    debug!(error = %err, "fire-and-forget task failed");
                }
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::ports::Job;
    use crate::strategy::fixtures::{Probe, messages, pool};

    /// Drops every job without running it.
    struct Black;

    impl WorkerPool for Black {
        fn execute(&self, job: Job) {
            drop(job);
        }
    }

    #[test]
    fn wait_all_runs_everything_off_the_caller_thread() {
        let runtime = pool(4);
        let probe = Probe::default();

        let err = ParallelWaitAll::new(Arc::new(runtime.handle().clone()))
            .run(probe.two_failing_two_ok())
            .unwrap_err();

        assert_eq!(probe.handled(), 4);
        assert!(!probe.threads().contains(&thread::current().id()));
        let mut failures = messages(&err);
        failures.sort();
        assert_eq!(failures, vec!["Oh!", "Omg"]);
    }

    #[test]
    fn wait_all_reports_dropped_jobs_as_abandoned() {
        let probe = Probe::default();

        let err = ParallelWaitAll::new(Arc::new(Black))
            .run(probe.two_failing_two_ok())
            .unwrap_err();

        assert_eq!(probe.handled(), 0);
        match err {
            CourierError::Aggregate(aggregate) => {
                assert_eq!(aggregate.len(), 4);
                assert!(aggregate.iter().all(|e| matches!(e, CourierError::Abandoned)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wait_all_captures_panics() {
        let runtime = pool(2);
        let tasks: Vec<Task> = vec![
            Box::new(|| -> Result<(), CourierError> { panic!("kaboom") }) as Task,
            Box::new(|| Ok(())) as Task,
        ];

        let err = ParallelWaitAll::new(Arc::new(runtime.handle().clone()))
            .run(tasks)
            .unwrap_err();

        assert_eq!(messages(&err), vec!["task panicked: kaboom"]);
    }

    #[test]
    fn wait_any_returns_after_the_first_completion() {
        let runtime = pool(4);
        let probe = Probe::default();
        let slow = Duration::from_millis(500);
        let tasks = vec![
            probe.task("H1", slow, Some("slow 1")),
            probe.task("H2", slow, Some("slow 2")),
            probe.task("H3", slow, Some("slow 3")),
            probe.task("H4", Duration::ZERO, Some("fast")),
        ];

        let started = Instant::now();
        let err = ParallelWaitAny::new(Arc::new(runtime.handle().clone()))
            .run(tasks)
            .unwrap_err();

        assert!(started.elapsed() < slow);
        assert_eq!(messages(&err), vec!["fast"]);

        // 残りのタスクは走り続ける
        probe.wait_for(4);
        assert_eq!(probe.handled(), 4);
    }

    #[test]
    fn wait_any_with_no_tasks_succeeds() {
        assert!(ParallelWaitAny::new(Arc::new(Black)).run(Vec::new()).is_ok());
    }

    #[test]
    fn fire_and_forget_returns_before_tasks_finish() {
        let runtime = pool(4);
        let probe = Probe::default();
        let tasks = vec![
            probe.task("H1", Duration::from_millis(200), Some("Omg")),
            probe.task("H2", Duration::from_millis(200), Some("Oh!")),
            probe.task("H3", Duration::from_millis(200), None),
            probe.task("H4", Duration::from_millis(200), None),
        ];

        ParallelFireAndForget::new(Arc::new(runtime.handle().clone()))
            .run(tasks)
            .unwrap();
        assert!(probe.handled() < 4);

        probe.wait_for(4);
        assert_eq!(probe.handled(), 4);
    }
}
