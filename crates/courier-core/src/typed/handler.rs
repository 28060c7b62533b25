//! Handler traits - Command / Notification を処理する Handler の定義
//!
//! # 二層構造
//! - **表層（Typed）**: `CommandHandler<C>`, `NotificationHandler<N>` - 型安全
//! - **内部（Erased）**: `ErasedCommandHandler`, `ErasedNotificationHandler` -
//!   object-safe, so handlers of different message types share one `Vec`
//!
//! `TypedCommandHandler<C, H>` / `TypedNotificationHandler<N, H>` bridge the two
//! layers. The matcher is asked for once, at wrapping time.

use std::any::{Any, TypeId};
use std::marker::PhantomData;

use crate::domain::{Command, Envelope, Notification, short_name_of};
use crate::error::CourierError;

use super::matcher::Matcher;

/// Type-erased command result; `Mediator::send` downcasts it back to `C::Output`.
pub type Reply = Box<dyn Any>;

/// CommandHandler は Command を処理して `C::Output` を返す
///
/// # 使用例
/// ```ignore
/// struct PlaceOrderHandler;
///
/// impl CommandHandler<PlaceOrder> for PlaceOrderHandler {
///     fn handle(&self, command: &PlaceOrder) -> Result<OrderId, CourierError> {
///         Ok(OrderId::new(&command.sku))
///     }
/// }
/// ```
pub trait CommandHandler<C: Command>: Send + Sync + 'static {
    fn handle(&self, command: &C) -> Result<C::Output, CourierError>;

    /// Override to accept only some `C`s.
    fn matcher(&self) -> Matcher<C> {
        Matcher::ByType
    }
}

pub trait NotificationHandler<N: Notification>: Send + Sync + 'static {
    fn handle(&self, notification: &N) -> Result<(), CourierError>;

    fn matcher(&self) -> Matcher<N> {
        Matcher::ByType
    }
}

/// Object-safe view of a `CommandHandler`.
pub trait ErasedCommandHandler: Send + Sync {
    /// Short type name of the handler, used in routing errors.
    fn handler_name(&self) -> &str;

    fn accepted_type(&self) -> TypeId;

    /// `false` when the handler matches through a predicate.
    fn is_cacheable(&self) -> bool;

    fn matches(&self, command: &Envelope<'_>) -> bool;

    fn handle_erased(&self, command: &Envelope<'_>) -> Result<Reply, CourierError>;
}

pub trait ErasedNotificationHandler: Send + Sync {
    fn handler_name(&self) -> &str;

    fn matches(&self, notification: &Envelope<'_>) -> bool;

    fn handle_erased(&self, notification: &Envelope<'_>) -> Result<(), CourierError>;
}

pub struct TypedCommandHandler<C: Command, H: CommandHandler<C>> {
    handler: H,
    matcher: Matcher<C>,
    name: String,
    _marker: PhantomData<fn(C)>,
}

impl<C: Command, H: CommandHandler<C>> TypedCommandHandler<C, H> {
    pub fn new(handler: H) -> Self {
        let matcher = handler.matcher();
        Self {
            handler,
            matcher,
            name: short_name_of::<H>(),
            _marker: PhantomData,
        }
    }
}

impl<C: Command, H: CommandHandler<C>> ErasedCommandHandler for TypedCommandHandler<C, H> {
    fn handler_name(&self) -> &str {
        &self.name
    }

    fn accepted_type(&self) -> TypeId {
        self.matcher.accepted_type()
    }

    fn is_cacheable(&self) -> bool {
        self.matcher.is_cacheable()
    }

    fn matches(&self, command: &Envelope<'_>) -> bool {
        self.matcher.matches(command)
    }

    fn handle_erased(&self, command: &Envelope<'_>) -> Result<Reply, CourierError> {
        let command = downcast::<C>(command)?;
        let output = self.handler.handle(command)?;
        Ok(Box::new(output))
    }
}

pub struct TypedNotificationHandler<N: Notification, H: NotificationHandler<N>> {
    handler: H,
    matcher: Matcher<N>,
    name: String,
    _marker: PhantomData<fn(N)>,
}

impl<N: Notification, H: NotificationHandler<N>> TypedNotificationHandler<N, H> {
    pub fn new(handler: H) -> Self {
        let matcher = handler.matcher();
        Self {
            handler,
            matcher,
            name: short_name_of::<H>(),
            _marker: PhantomData,
        }
    }
}

impl<N: Notification, H: NotificationHandler<N>> ErasedNotificationHandler
    for TypedNotificationHandler<N, H>
{
    fn handler_name(&self) -> &str {
        &self.name
    }

    fn matches(&self, notification: &Envelope<'_>) -> bool {
        self.matcher.matches(notification)
    }

    fn handle_erased(&self, notification: &Envelope<'_>) -> Result<(), CourierError> {
        self.handler.handle(downcast::<N>(notification)?)
    }
}

fn downcast<'a, T: 'static>(envelope: &Envelope<'a>) -> Result<&'a T, CourierError> {
    envelope
        .downcast_ref::<T>()
        .ok_or_else(|| CourierError::TypeMismatch {
            expected: short_name_of::<T>(),
            found: envelope.short_name(),
        })
}
