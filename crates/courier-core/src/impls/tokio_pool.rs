//! tokio の blocking pool を WorkerPool として使う
//!
//! Handlers are synchronous and may block, so jobs go to `spawn_blocking`
//! rather than onto the async worker threads. The runtime's
//! `max_blocking_threads` is the pool size.
//!
//! # 使用例
//! ```ignore
//! let runtime = tokio::runtime::Builder::new_multi_thread()
//!     .max_blocking_threads(4)
//!     .build()?;
//! let mediator = MediatorBuilder::new()
//!     .worker_pool(runtime.handle().clone())
//!     .strategy(StrategyKind::ParallelWaitAll)
//!     .build()?;
//! ```

use tokio::runtime::{Handle, Runtime};

use crate::ports::{Job, WorkerPool};

impl WorkerPool for Handle {
    fn execute(&self, job: Job) {
        // JoinHandle は捨てる：結果は job 自身が報告する
        drop(self.spawn_blocking(job));
    }
}

impl WorkerPool for Runtime {
    fn execute(&self, job: Job) {
        drop(self.spawn_blocking(job));
    }
}
