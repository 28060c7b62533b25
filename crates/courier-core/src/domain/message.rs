//! Command / Notification - mediator を通るメッセージ
//!
//! # 使い分け
//! - **Command**: exactly one handler, returns `Output`
//! - **Notification**: zero or more handlers, returns nothing

use crate::app::Mediator;
use crate::error::CourierError;

/// A request routed to exactly one handler by its concrete type.
///
/// # 使用例
/// ```ignore
/// struct PlaceOrder {
///     sku: String,
/// }
///
/// impl Command for PlaceOrder {
///     type Output = OrderId;
/// }
///
/// let id = PlaceOrder { sku: "A-1".into() }.execute(&mediator)?;
/// ```
pub trait Command: 'static {
    type Output: 'static;

    /// `mediator.send(self)` の糖衣
    fn execute(self, mediator: &Mediator) -> Result<Self::Output, CourierError>
    where
        Self: Sized,
    {
        mediator.send(self)
    }
}

/// An event delivered to every matching handler.
///
/// `Send + Sync` because the parallel strategies share one notification
/// between worker threads.
pub trait Notification: Send + Sync + 'static {
    fn publish_to(self, mediator: &Mediator) -> Result<(), CourierError>
    where
        Self: Sized,
    {
        mediator.publish(self)
    }
}
