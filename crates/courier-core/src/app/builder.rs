//! MediatorBuilder - Mediator の構築とワイヤリング
//!
//! Registration happens here, once; the built `Mediator` is read-only.
//! Invalid configuration is rejected by `build()` rather than on the first
//! `publish`.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{Command, Notification};
use crate::error::CourierError;
use crate::pipeline::{NotificationDispatcher, Router};
use crate::ports::WorkerPool;
use crate::strategy::{NotificationStrategy, StrategyFactory, StrategyKind};
use crate::typed::{
    CommandHandler, CommandMiddleware, HandlerRegistry, NotificationHandler, NotificationMiddleware,
};

use super::config::MediatorConfig;
use super::mediator::Mediator;

/// MediatorBuilder は Mediator を構築
///
/// # 使用例
/// ```ignore
/// let mediator = Mediator::builder()
///     .command_handler::<PlaceOrder, _>(PlaceOrderHandler::new(orders))
///     .notification_handler::<OrderPlaced, _>(SendReceipt)
///     .command_middleware(command_middleware(|command, next| {
///         tracing::info!(command = %command.short_name(), "sending");
///         next.run()
///     }))
///     .strategy(StrategyKind::ParallelWaitAll)
///     .worker_pool(runtime.handle().clone())
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - pool を使う strategy に `worker_pool()` が無ければ `IllegalArgument`
/// - `strategy_factory()` は `StrategyKind` より優先
#[derive(Default)]
pub struct MediatorBuilder {
    registry: HandlerRegistry,
    config: MediatorConfig,
    strategy_factory: Option<StrategyFactory>,
    worker_pool: Option<Arc<dyn WorkerPool>>,
}

impl MediatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from handlers and middleware registered elsewhere.
    pub fn registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn command_handler<C: Command, H: CommandHandler<C>>(mut self, handler: H) -> Self {
        self.registry.register_command::<C, H>(handler);
        self
    }

    pub fn notification_handler<N: Notification, H: NotificationHandler<N>>(
        mut self,
        handler: H,
    ) -> Self {
        self.registry.register_notification::<N, H>(handler);
        self
    }

    /// Registration order is execution order: the first middleware is outermost.
    pub fn command_middleware(mut self, middleware: impl CommandMiddleware) -> Self {
        self.registry.add_command_middleware(middleware);
        self
    }

    pub fn notification_middleware(mut self, middleware: impl NotificationMiddleware) -> Self {
        self.registry.add_notification_middleware(middleware);
        self
    }

    pub fn config(mut self, config: MediatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strategy(mut self, kind: StrategyKind) -> Self {
        self.config.notification_strategy = kind;
        self
    }

    /// Custom strategy; called once per `publish`.
    pub fn strategy_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn NotificationStrategy> + Send + Sync + 'static,
    {
        self.strategy_factory = Some(Arc::new(factory));
        self
    }

    pub fn worker_pool(mut self, pool: impl WorkerPool + 'static) -> Self {
        self.worker_pool = Some(Arc::new(pool));
        self
    }

    pub fn shared_worker_pool(mut self, pool: Arc<dyn WorkerPool>) -> Self {
        self.worker_pool = Some(pool);
        self
    }

    /// # Errors
    /// `IllegalArgument` when the configured strategy needs a worker pool and
    /// none was given.
    pub fn build(self) -> Result<Mediator, CourierError> {
        let strategy = match self.strategy_factory {
            Some(factory) => factory,
            None => self.config.notification_strategy.factory(self.worker_pool)?,
        };

        let parts = self.registry.into_parts();
        debug!(
            command_handlers = parts.command_handlers.len(),
            notification_handlers = parts.notification_handlers.len(),
            command_middlewares = parts.command_middlewares.len(),
            notification_middlewares = parts.notification_middlewares.len(),
            strategy = %self.config.notification_strategy,
            route_cache = self.config.route_cache,
            "built mediator"
        );

        let router = if self.config.route_cache {
            Router::new(parts.command_handlers)
        } else {
            Router::without_cache(parts.command_handlers)
        };
        let dispatcher =
            NotificationDispatcher::new(parts.notification_handlers, parts.notification_middlewares);

        Ok(Mediator::new(router, parts.command_middlewares, dispatcher, strategy))
    }
}
