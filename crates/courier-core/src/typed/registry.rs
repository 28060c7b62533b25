//! HandlerRegistry - Handler と Middleware の登録と管理
//!
//! # 内部実装
//! - `register_command::<C, H>(handler)` wraps `H` in `TypedCommandHandler`
//!   and stores it as `Arc<dyn ErasedCommandHandler>`
//! - every collection is a `Vec`: registration order is matching order for
//!   handlers and wrapping order for middleware
//! - duplicates are allowed here; the router reports them when a command
//!   actually matches more than one handler
//!
//! Built during initialization (mutable), read-only once the mediator is built.

use std::sync::Arc;

use crate::domain::{Command, Notification};

use super::handler::{
    CommandHandler, ErasedCommandHandler, ErasedNotificationHandler, NotificationHandler,
    TypedCommandHandler, TypedNotificationHandler,
};
use super::middleware::{CommandMiddleware, NotificationMiddleware};

#[derive(Clone, Default)]
pub struct HandlerRegistry {
    command_handlers: Vec<Arc<dyn ErasedCommandHandler>>,
    notification_handlers: Vec<Arc<dyn ErasedNotificationHandler>>,
    command_middlewares: Vec<Arc<dyn CommandMiddleware>>,
    notification_middlewares: Vec<Arc<dyn NotificationMiddleware>>,
}

/// The four collections, handed over to the router and the dispatcher.
pub(crate) struct RegistryParts {
    pub command_handlers: Vec<Arc<dyn ErasedCommandHandler>>,
    pub notification_handlers: Vec<Arc<dyn ErasedNotificationHandler>>,
    pub command_middlewares: Vec<Arc<dyn CommandMiddleware>>,
    pub notification_middlewares: Vec<Arc<dyn NotificationMiddleware>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_command<C: Command, H: CommandHandler<C>>(&mut self, handler: H) {
        self.command_handlers
            .push(Arc::new(TypedCommandHandler::<C, H>::new(handler)));
    }

    pub fn register_notification<N: Notification, H: NotificationHandler<N>>(
        &mut self,
        handler: H,
    ) {
        self.notification_handlers
            .push(Arc::new(TypedNotificationHandler::<N, H>::new(handler)));
    }

    pub fn add_command_middleware(&mut self, middleware: impl CommandMiddleware) {
        self.command_middlewares.push(Arc::new(middleware));
    }

    pub fn add_notification_middleware(&mut self, middleware: impl NotificationMiddleware) {
        self.notification_middlewares.push(Arc::new(middleware));
    }

    pub fn command_handlers(&self) -> &[Arc<dyn ErasedCommandHandler>] {
        &self.command_handlers
    }

    pub fn notification_handlers(&self) -> &[Arc<dyn ErasedNotificationHandler>] {
        &self.notification_handlers
    }

    pub fn command_middlewares(&self) -> &[Arc<dyn CommandMiddleware>] {
        &self.command_middlewares
    }

    pub fn notification_middlewares(&self) -> &[Arc<dyn NotificationMiddleware>] {
        &self.notification_middlewares
    }

    /// Short names of the registered command handlers, in registration order.
    pub fn command_handler_names(&self) -> Vec<String> {
        self.command_handlers
            .iter()
            .map(|h| h.handler_name().to_string())
            .collect()
    }

    pub(crate) fn into_parts(self) -> RegistryParts {
        RegistryParts {
            command_handlers: self.command_handlers,
            notification_handlers: self.notification_handlers,
            command_middlewares: self.command_middlewares,
            notification_middlewares: self.notification_middlewares,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Envelope;
    use crate::error::CourierError;
    use crate::typed::middleware::command_middleware;

    struct Ping;

    impl Command for Ping {
        type Output = ();
    }

    struct Pong1;

    impl CommandHandler<Ping> for Pong1 {
        fn handle(&self, _command: &Ping) -> Result<(), CourierError> {
            Ok(())
        }
    }

    struct Pong2;

    impl CommandHandler<Ping> for Pong2 {
        fn handle(&self, _command: &Ping) -> Result<(), CourierError> {
            Ok(())
        }
    }

    struct Greet;

    impl Notification for Greet {}

    struct OnGreet;

    impl NotificationHandler<Greet> for OnGreet {
        fn handle(&self, _notification: &Greet) -> Result<(), CourierError> {
            Ok(())
        }
    }

    #[test]
    fn keeps_registration_order() {
        let mut registry = HandlerRegistry::new();
        registry.register_command::<Ping, _>(Pong1);
        registry.register_command::<Ping, _>(Pong2);

        assert_eq!(registry.command_handler_names(), vec!["Pong1", "Pong2"]);
    }

    #[test]
    fn keeps_each_collection_separate() {
        let mut registry = HandlerRegistry::new();
        registry.register_notification::<Greet, _>(OnGreet);
        registry.add_command_middleware(command_middleware(|_command, next| next.run()));

        assert!(registry.command_handlers().is_empty());
        assert_eq!(registry.notification_handlers().len(), 1);
        assert_eq!(registry.command_middlewares().len(), 1);
        assert!(registry.notification_middlewares().is_empty());

        let parts = registry.into_parts();
        assert_eq!(parts.notification_handlers[0].handler_name(), "OnGreet");
    }

    #[test]
    fn registered_handler_still_matches_by_type() {
        let mut registry = HandlerRegistry::new();
        registry.register_command::<Ping, _>(Pong1);

        let handler = &registry.command_handlers()[0];
        assert!(handler.matches(&Envelope::of(&Ping)));
        assert!(!handler.matches(&Envelope::of(&Greet)));
    }
}
