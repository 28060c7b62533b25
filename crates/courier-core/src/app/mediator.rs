//! Mediator - send / publish の入口
//!
//! # 内部実装
//! - `send`: command middleware chain → terminal (Router.route → handle) → downcast
//! - `publish`: dispatcher が Task を作る → 毎回新しい strategy で実行

use std::sync::Arc;

use crate::domain::{Command, Envelope, Notification, short_name_of};
use crate::error::CourierError;
use crate::pipeline::chain::{self, Continuation};
use crate::pipeline::{NotificationDispatcher, Router};
use crate::strategy::StrategyFactory;
use crate::typed::{CommandMiddleware, Reply};

use super::builder::MediatorBuilder;

/// Mediator は登録済みの handler へ command / notification を届ける
///
/// Immutable after `MediatorBuilder::build`; share it by reference or `Arc`.
pub struct Mediator {
    router: Router,
    command_middlewares: Vec<Arc<dyn CommandMiddleware>>,
    dispatcher: NotificationDispatcher,
    strategy: StrategyFactory,
}

impl Mediator {
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    pub(crate) fn new(
        router: Router,
        command_middlewares: Vec<Arc<dyn CommandMiddleware>>,
        dispatcher: NotificationDispatcher,
        strategy: StrategyFactory,
    ) -> Self {
        Self {
            router,
            command_middlewares,
            dispatcher,
            strategy,
        }
    }

    /// Route `command` to its single handler through the command middleware.
    ///
    /// # Errors
    /// - `HandlerNotFound` / `MultipleHandlersMatched`: routing failed
    /// - `TypeMismatch`: a middleware replaced the reply with another type
    /// - anything the handler or a middleware returned
    pub fn send<C: Command>(&self, command: C) -> Result<C::Output, CourierError> {
        let envelope = Envelope::of(&command);
        let terminal: Continuation<'_, Reply> = Box::new(|| {
            let handler = self.router.route(&envelope)?;
            handler.handle_erased(&envelope)
        });
        let chain = chain::build(&self.command_middlewares[..], terminal, |middleware, next| {
            middleware.invoke(&envelope, next)
        });

        let reply = chain()?;
        reply
            .downcast::<C::Output>()
            .map(|output| *output)
            .map_err(|_| CourierError::TypeMismatch {
                expected: short_name_of::<C::Output>(),
                found: format!("another reply type for {}", envelope.short_name()),
            })
    }

    /// Deliver `notification` to every matching handler under the configured strategy.
    ///
    /// No matching handler is not an error.
    pub fn publish<N: Notification>(&self, notification: N) -> Result<(), CourierError> {
        let tasks = self.dispatcher.tasks(notification);
        let mut strategy = (self.strategy)();
        strategy.run(tasks)
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}
