//! Strategy - Notification の Task リストをどう実行するか
//!
//! | Strategy | 実行 | 待ち | 失敗 |
//! |---|---|---|---|
//! | `StopOnFirstFailure` | sequential | until the first failure | that failure, unwrapped |
//! | `ContinueCollectingFailures` | sequential | all | `AggregateError`, task order |
//! | `ParallelWaitAll` | pool | all | `AggregateError`, arrival order |
//! | `ParallelWaitAny` | pool | first completion | failures seen by then |
//! | `ParallelFireAndForget` | pool | none | discarded |
//! | `AsyncWaitAll` | one pool job, sequential inside | that job | `AggregateError`, task order |
//!
//! Strategies may hold per-call state, so the mediator asks its
//! `StrategyFactory` for a fresh instance on every `publish`.

mod async_batch;
mod kind;
mod parallel;
mod sequential;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::CourierError;

pub use self::async_batch::AsyncWaitAll;
pub use self::kind::StrategyKind;
pub use self::parallel::{ParallelFireAndForget, ParallelWaitAll, ParallelWaitAny};
pub use self::sequential::{ContinueCollectingFailures, StopOnFirstFailure};

/// One matched handler wrapped in its middleware chain.
pub type Task = Box<dyn FnOnce() -> Result<(), CourierError> + Send + 'static>;

pub trait NotificationStrategy: Send {
    fn run(&mut self, tasks: Vec<Task>) -> Result<(), CourierError>;
}

/// Produces a fresh strategy for every `publish`.
pub type StrategyFactory = Arc<dyn Fn() -> Box<dyn NotificationStrategy> + Send + Sync>;

/// Run a task off the calling thread, turning a panic into a failure.
///
/// The caller's thread is not unwinding, so the panic would otherwise only
/// kill the worker and leave the strategy waiting for a report.
pub(crate) fn run_caught(task: Task) -> Result<(), CourierError> {
    match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(outcome) => outcome,
        Err(payload) => Err(CourierError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
