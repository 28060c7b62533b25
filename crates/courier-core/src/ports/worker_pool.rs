//! WorkerPool port - 並列 strategy が使うスレッドプール
//!
//! The pool belongs to the embedding application: it decides how many threads
//! exist and how long they live. Strategies only submit jobs to it.

/// A unit of work submitted to the pool. It reports its own outcome.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// WorkerPool は Job を呼び出し元とは別のスレッドで実行
///
/// # 契約
/// - `execute` should hand the job to another thread; an inline pool is
///   accepted but turns every parallel strategy into a sequential one
/// - a job that is dropped without running is reported by the strategy as
///   `CourierError::Abandoned`
pub trait WorkerPool: Send + Sync {
    fn execute(&self, job: Job);
}
