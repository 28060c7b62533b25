//! Middleware - send / publish を包む横断的処理
//!
//! Middleware receives the message as an `Envelope` and the rest of the chain
//! as `Next`. It may:
//! - run logic before and after `next.run()`
//! - inspect or replace the result
//! - not call `next` at all (short-circuit)
//! - call `next` again (retry)
//! - return an error, which unwinds every outer middleware

use std::fmt;

use crate::domain::Envelope;
use crate::error::CourierError;

use super::handler::Reply;

/// The rest of the chain.
pub struct Next<'a, T> {
    continuation: &'a dyn Fn() -> Result<T, CourierError>,
}

impl<'a, T> Next<'a, T> {
    pub(crate) fn new(continuation: &'a dyn Fn() -> Result<T, CourierError>) -> Self {
        Self { continuation }
    }

    pub fn run(&self) -> Result<T, CourierError> {
        (self.continuation)()
    }
}

impl<T> Clone for Next<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Next<'_, T> {}

impl<T> fmt::Debug for Next<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Next")
    }
}

/// CommandMiddleware は全ての Command の前後で実行される
///
/// # 使用例
/// ```ignore
/// struct Timing;
///
/// impl CommandMiddleware for Timing {
///     fn invoke(&self, command: &Envelope<'_>, next: Next<'_, Reply>) -> Result<Reply, CourierError> {
///         let started = Instant::now();
///         let reply = next.run();
///         tracing::info!(command = %command.short_name(), elapsed = ?started.elapsed());
///         reply
///     }
/// }
/// ```
pub trait CommandMiddleware: Send + Sync + 'static {
    fn invoke(&self, command: &Envelope<'_>, next: Next<'_, Reply>) -> Result<Reply, CourierError>;
}

pub trait NotificationMiddleware: Send + Sync + 'static {
    fn invoke(&self, notification: &Envelope<'_>, next: Next<'_, ()>) -> Result<(), CourierError>;
}

/// Middleware built from a closure. See [`command_middleware`] and
/// [`notification_middleware`].
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> CommandMiddleware for FnMiddleware<F>
where
    F: Fn(&Envelope<'_>, Next<'_, Reply>) -> Result<Reply, CourierError> + Send + Sync + 'static,
{
    fn invoke(&self, command: &Envelope<'_>, next: Next<'_, Reply>) -> Result<Reply, CourierError> {
        (self.f)(command, next)
    }
}

impl<F> NotificationMiddleware for FnMiddleware<F>
where
    F: Fn(&Envelope<'_>, Next<'_, ()>) -> Result<(), CourierError> + Send + Sync + 'static,
{
    fn invoke(&self, notification: &Envelope<'_>, next: Next<'_, ()>) -> Result<(), CourierError> {
        (self.f)(notification, next)
    }
}

/// ```ignore
/// builder.command_middleware(command_middleware(|command, next| {
///     tracing::debug!(command = %command.short_name(), "sending");
///     next.run()
/// }))
/// ```
pub fn command_middleware<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&Envelope<'_>, Next<'_, Reply>) -> Result<Reply, CourierError> + Send + Sync + 'static,
{
    FnMiddleware { f }
}

pub fn notification_middleware<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&Envelope<'_>, Next<'_, ()>) -> Result<(), CourierError> + Send + Sync + 'static,
{
    FnMiddleware { f }
}
