//! NotificationDispatcher - Notification を Task のリストに変換
//!
//! One task per matching handler, in registration order. Each task folds its
//! own middleware chain when it runs, so continuations (and anything a
//! middleware captures per invocation) are never shared between handlers.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{Envelope, Notification};
use crate::strategy::Task;
use crate::typed::{ErasedNotificationHandler, NotificationMiddleware};

use super::chain::{self, Continuation};

pub struct NotificationDispatcher {
    handlers: Vec<Arc<dyn ErasedNotificationHandler>>,
    middlewares: Arc<[Arc<dyn NotificationMiddleware>]>,
}

impl NotificationDispatcher {
    pub fn new(
        handlers: Vec<Arc<dyn ErasedNotificationHandler>>,
        middlewares: Vec<Arc<dyn NotificationMiddleware>>,
    ) -> Self {
        Self {
            handlers,
            middlewares: middlewares.into(),
        }
    }

    pub fn tasks<N: Notification>(&self, notification: N) -> Vec<Task> {
        let notification = Arc::new(notification);
        let envelope = Envelope::of(&*notification);

        let tasks: Vec<Task> = self
            .handlers
            .iter()
            .filter(|handler| handler.matches(&envelope))
            .map(|handler| {
                let handler = Arc::clone(handler);
                let middlewares = Arc::clone(&self.middlewares);
                let notification = Arc::clone(&notification);
                Box::new(move || {
                    let envelope = Envelope::of(&*notification);
                    let terminal: Continuation<'_, ()> =
                        Box::new(|| handler.handle_erased(&envelope));
                    let chain = chain::build(&middlewares[..], terminal, |middleware, next| {
                        middleware.invoke(&envelope, next)
                    });
                    chain()
                }) as Task
            })
            .collect();

        debug!(
            notification = envelope.type_name(),
            handlers = tasks.len(),
            "matched notification handlers"
        );
        tasks
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}
