//! courier-core
//!
//! In-process mediator: commands are routed by type to exactly one handler,
//! notifications fan out to every matching handler, and both pass through an
//! ordered middleware chain.
//!
//! # モジュール構成
//! - **domain**: メッセージモデル（Command, Notification, Envelope）
//! - **typed**: 型付き Handler API（CommandHandler, NotificationHandler, Matcher, middleware, HandlerRegistry）
//! - **pipeline**: Router, middleware chain, NotificationDispatcher
//! - **strategy**: Notification の実行戦略（6 種類）
//! - **ports**: 抽象化レイヤー（WorkerPool）
//! - **impls**: 実装（tokio runtime を WorkerPool として使う）
//! - **app**: MediatorBuilder, Mediator, MediatorConfig
//! - **error**: CourierError, AggregateError
//!
//! # 使用例
//! ```ignore
//! let mediator = Mediator::builder()
//!     .command_handler::<Ping, _>(Pong)
//!     .build()?;
//! let reply = mediator.send(Ping)?;
//! ```

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod pipeline;
pub mod ports;
pub mod strategy;
pub mod typed;

pub use self::app::{Mediator, MediatorBuilder, MediatorConfig};
pub use self::domain::{Command, Envelope, Notification};
pub use self::error::{AggregateError, BoxError, CourierError};
pub use self::strategy::{NotificationStrategy, StrategyKind};
pub use self::typed::{
    CommandHandler, CommandMiddleware, Matcher, Next, NotificationHandler, NotificationMiddleware,
    Reply, command_middleware, notification_middleware,
};
