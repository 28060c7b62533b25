//! Typed - 型付き Handler API
//!
//! Handlers declare the message type they accept through their generic
//! parameter, so routing never needs reflection.
//!
//! # 二層構造
//! - **表層（Typed）**: `CommandHandler<C>`, `NotificationHandler<N>`, `Matcher<T>`
//! - **内部（Erased）**: `ErasedCommandHandler`, `ErasedNotificationHandler`

pub mod handler;
pub mod matcher;
pub mod middleware;
pub mod registry;

pub use self::handler::{
    CommandHandler, ErasedCommandHandler, ErasedNotificationHandler, NotificationHandler, Reply,
};
pub use self::matcher::Matcher;
pub use self::middleware::{
    CommandMiddleware, FnMiddleware, Next, NotificationMiddleware, command_middleware,
    notification_middleware,
};
pub use self::registry::HandlerRegistry;
