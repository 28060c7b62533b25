//! Ports - 抽象化レイヤー
//!
//! The core runs everything on the caller's thread except notification
//! fan-out, which submits work through these traits.

pub mod worker_pool;

pub use self::worker_pool::{Job, WorkerPool};
