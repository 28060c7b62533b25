//! Router - Command を処理する唯一の Handler を選ぶ
//!
//! Zero matches and several matches are both errors: a command always has
//! exactly one handler, and the router never picks one on the caller's behalf.
//!
//! # キャッシュ
//! When every handler accepting the command's type matches by type alone, the
//! outcome of the scan can only depend on the type, so it is memoized as
//! `TypeId -> handler`. A predicate handler for that type disables the cache
//! for it, because the next instance may route elsewhere.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::domain::Envelope;
use crate::error::CourierError;
use crate::typed::ErasedCommandHandler;

pub struct Router {
    handlers: Vec<Arc<dyn ErasedCommandHandler>>,
    cache: Option<RwLock<HashMap<TypeId, Arc<dyn ErasedCommandHandler>>>>,
}

impl Router {
    pub fn new(handlers: Vec<Arc<dyn ErasedCommandHandler>>) -> Self {
        Self {
            handlers,
            cache: Some(RwLock::new(HashMap::new())),
        }
    }

    /// A router that scans the handler list on every `route`.
    pub fn without_cache(handlers: Vec<Arc<dyn ErasedCommandHandler>>) -> Self {
        Self {
            handlers,
            cache: None,
        }
    }

    pub fn route(
        &self,
        command: &Envelope<'_>,
    ) -> Result<Arc<dyn ErasedCommandHandler>, CourierError> {
        if let Some(handler) = self.cached(command.type_id()) {
            trace!(command = command.type_name(), handler = handler.handler_name(), "route cache hit");
            return Ok(handler);
        }

        let mut cacheable = true;
        let mut matching: Vec<&Arc<dyn ErasedCommandHandler>> = Vec::new();
        for handler in &self.handlers {
            if handler.accepted_type() == command.type_id() && !handler.is_cacheable() {
                cacheable = false;
            }
            if handler.matches(command) {
                matching.push(handler);
            }
        }

        match matching.as_slice() {
            [] => Err(CourierError::HandlerNotFound {
                command: command.short_name(),
            }),
            [handler] => {
                let handler = Arc::clone(handler);
                debug!(
                    command = command.type_name(),
                    handler = handler.handler_name(),
                    cacheable,
                    "routed command"
                );
                if cacheable {
                    self.remember(command.type_id(), &handler);
                }
                Ok(handler)
            }
            many => Err(CourierError::MultipleHandlersMatched {
                command: command.short_name(),
                handlers: many.iter().map(|h| h.handler_name().to_string()).collect(),
            }),
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Number of memoized routes (0 when the cache is disabled).
    pub fn cached_routes(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.read().len())
    }

    fn cached(&self, type_id: TypeId) -> Option<Arc<dyn ErasedCommandHandler>> {
        self.cache.as_ref()?.read().get(&type_id).cloned()
    }

    fn remember(&self, type_id: TypeId, handler: &Arc<dyn ErasedCommandHandler>) {
        if let Some(cache) = &self.cache {
            cache.write().insert(type_id, Arc::clone(handler));
        }
    }
}
