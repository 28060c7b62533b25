//! Envelope - middleware から見たメッセージ
//!
//! Middleware is registered once and runs for every command (or every
//! notification), so it cannot be generic over the message type. It receives
//! an `Envelope` instead: a borrowed, type-erased view that still knows the
//! concrete type and can be downcast.

use std::any::{Any, TypeId};
use std::fmt;

use super::type_name::short_type_name;

#[derive(Clone, Copy)]
pub struct Envelope<'a> {
    payload: &'a dyn Any,
    type_id: TypeId,
    type_name: &'static str,
}

impl<'a> Envelope<'a> {
    pub fn of<T: Any>(payload: &'a T) -> Self {
        Self {
            payload,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Concrete type of the wrapped message.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully-qualified type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without module paths (`Ping`, not `my_app::Ping`).
    pub fn short_name(&self) -> String {
        short_type_name(self.type_name)
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for Envelope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
