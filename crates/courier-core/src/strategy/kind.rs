//! StrategyKind - 設定から選べる strategy の名前

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CourierError;
use crate::ports::WorkerPool;

use super::{
    AsyncWaitAll, ContinueCollectingFailures, NotificationStrategy, ParallelFireAndForget,
    ParallelWaitAll, ParallelWaitAny, StopOnFirstFailure, StrategyFactory,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    StopOnFirstFailure,
    ContinueCollectingFailures,
    ParallelWaitAll,
    ParallelWaitAny,
    ParallelFireAndForget,
    AsyncWaitAll,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        Self::StopOnFirstFailure,
        Self::ContinueCollectingFailures,
        Self::ParallelWaitAll,
        Self::ParallelWaitAny,
        Self::ParallelFireAndForget,
        Self::AsyncWaitAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StopOnFirstFailure => "stop-on-first-failure",
            Self::ContinueCollectingFailures => "continue-collecting-failures",
            Self::ParallelWaitAll => "parallel-wait-all",
            Self::ParallelWaitAny => "parallel-wait-any",
            Self::ParallelFireAndForget => "parallel-fire-and-forget",
            Self::AsyncWaitAll => "async-wait-all",
        }
    }

    /// Whether the strategy submits work to a `WorkerPool`.
    pub fn requires_pool(&self) -> bool {
        !matches!(self, Self::StopOnFirstFailure | Self::ContinueCollectingFailures)
    }

    /// Factory producing a fresh strategy of this kind per `publish`.
    ///
    /// Pool-backed kinds fail with `IllegalArgument` when `pool` is `None`.
    pub fn factory(
        self,
        pool: Option<Arc<dyn WorkerPool>>,
    ) -> Result<StrategyFactory, CourierError> {
        let factory: StrategyFactory = match (self, pool) {
            (Self::StopOnFirstFailure, _) => Arc::new(|| Box::new(StopOnFirstFailure) as Box<dyn NotificationStrategy>),
            (Self::ContinueCollectingFailures, _) => {
                Arc::new(|| Box::new(ContinueCollectingFailures::default()) as Box<dyn NotificationStrategy>)
            }
            (kind, None) => {
                return Err(CourierError::illegal_argument(format!(
                    "{kind} strategy requires a worker pool"
                )));
            }
            (Self::ParallelWaitAll, Some(pool)) => pooled(pool, ParallelWaitAll::new),
            (Self::ParallelWaitAny, Some(pool)) => pooled(pool, ParallelWaitAny::new),
            (Self::ParallelFireAndForget, Some(pool)) => pooled(pool, ParallelFireAndForget::new),
            (Self::AsyncWaitAll, Some(pool)) => pooled(pool, AsyncWaitAll::new),
        };
        Ok(factory)
    }
}

fn pooled<S, F>(pool: Arc<dyn WorkerPool>, new: F) -> StrategyFactory
where
    S: NotificationStrategy + 'static,
    F: Fn(Arc<dyn WorkerPool>) -> S + Send + Sync + 'static,
{
    Arc::new(move || Box::new(new(Arc::clone(&pool))) as Box<dyn NotificationStrategy>)
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = CourierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CourierError::illegal_argument(format!("unknown notification strategy: {s}")))
    }
}
