//! 呼び出しスレッド上で順番に実行する strategy

use tracing::debug;

use crate::error::{AggregateError, CourierError};

use super::{NotificationStrategy, Task};

/// Runs tasks in order and stops at the first failure, which is returned as-is.
#[derive(Debug, Default)]
pub struct StopOnFirstFailure;

impl NotificationStrategy for StopOnFirstFailure {
    fn run(&mut self, tasks: Vec<Task>) -> Result<(), CourierError> {
        debug!(strategy = "stop-on-first-failure", tasks = tasks.len(), "running notification tasks");
        for task in tasks {
            task()?;
        }
        Ok(())
    }
}

/// Runs every task in order and reports all failures together.
#[derive(Debug, Default)]
pub struct ContinueCollectingFailures {
    failures: Vec<CourierError>,
}

impl NotificationStrategy for ContinueCollectingFailures {
    fn run(&mut self, tasks: Vec<Task>) -> Result<(), CourierError> {
        debug!(
            strategy = "continue-collecting-failures",
            tasks = tasks.len(),
            "running notification tasks"
        );
        for task in tasks {
            if let Err(err) = task() {
                self.failures.push(err);
            }
        }
        AggregateError::into_result(std::mem::take(&mut self.failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::fixtures::{Probe, messages};

    #[test]
    fn stop_on_first_failure_returns_the_failure_unwrapped() {
        let probe = Probe::default();

        let err = StopOnFirstFailure.run(probe.two_failing_two_ok()).unwrap_err();

        assert!(matches!(err, CourierError::Handler(_)));
        assert_eq!(err.to_string(), "Omg");
        assert_eq!(probe.handled(), 1);
    }

    #[test]
    fn stop_on_first_failure_runs_all_when_nothing_fails() {
        let probe = Probe::default();
        let tasks = vec![
            probe.task("H3", Default::default(), None),
            probe.task("H4", Default::default(), None),
        ];

        StopOnFirstFailure.run(tasks).unwrap();

        assert_eq!(probe.order(), vec!["H3", "H4"]);
    }

    #[test]
    fn continue_collecting_failures_runs_everything() {
        let probe = Probe::default();

        let err = ContinueCollectingFailures::default()
            .run(probe.two_failing_two_ok())
            .unwrap_err();

        assert_eq!(probe.handled(), 4);
        assert_eq!(probe.order(), vec!["H1", "H2", "H3", "H4"]);
        assert_eq!(messages(&err), vec!["Omg", "Oh!"]);
        assert_eq!(err.to_string(), "2 failure(s)");
    }

    #[test]
    fn empty_task_list_succeeds() {
        assert!(StopOnFirstFailure.run(Vec::new()).is_ok());
        assert!(ContinueCollectingFailures::default().run(Vec::new()).is_ok());
    }
}
