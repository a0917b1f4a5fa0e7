use super::EventHandler;
use crate::events::events::EngineEvent;
use std::sync::{Arc, Mutex};

type Subscriber = Arc<Mutex<dyn EventHandler>>;

/// Fans engine events out to subscribed handlers.
///
/// The bus is cloned into every slice task, so delivery is synchronous on the
/// publishing thread; handlers are serialized through their own mutex.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            handlers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl EventHandler + 'static) {
        self.handlers.push(Arc::new(Mutex::new(handler)));
    }

    pub fn publish(&self, event: EngineEvent) {
        for handler in self.handlers.iter() {
            if let Ok(mut guard) = handler.lock() {
                guard.handle(&event);
            }
        }
    }
}
