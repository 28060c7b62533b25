//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **tokio_pool**: `tokio::runtime::{Handle, Runtime}` as a `WorkerPool`

pub mod tokio_pool;
