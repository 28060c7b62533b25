//! Matcher - handler がメッセージを受け付けるかの判定
//!
//! The accepted type is the handler's generic parameter, fixed when the
//! handler is registered, so type matching is a `TypeId` comparison. A handler
//! can narrow that further with a predicate over the message itself.
//!
//! # キャッシュ
//! - `ByType`: the answer depends only on the type, so the router may memoize it
//! - `When`: the answer depends on field values and is evaluated on every call

use std::any::TypeId;
use std::fmt;

use crate::domain::Envelope;

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub enum Matcher<T> {
    /// Accept every `T`.
    ByType,
    /// Accept the `T`s for which the predicate holds.
    When(Predicate<T>),
}

impl<T: 'static> Matcher<T> {
    /// ```ignore
    /// fn matcher(&self) -> Matcher<Ping> {
    ///     Matcher::when(|ping: &Ping| ping.message == "bye")
    /// }
    /// ```
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::When(Box::new(predicate))
    }

    pub fn accepted_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    pub fn is_cacheable(&self) -> bool {
        matches!(self, Self::ByType)
    }

    pub fn matches(&self, envelope: &Envelope<'_>) -> bool {
        let Some(message) = envelope.downcast_ref::<T>() else {
            return false;
        };
        match self {
            Self::ByType => true,
            Self::When(predicate) => predicate(message),
        }
    }
}

impl<T> Default for Matcher<T> {
    fn default() -> Self {
        Self::ByType
    }
}

impl<T> fmt::Debug for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByType => f.write_str("ByType"),
            Self::When(_) => f.write_str("When(..)"),
        }
    }
}
