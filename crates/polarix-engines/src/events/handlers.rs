use crate::events::events::EngineEvent;

pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &EngineEvent);
}

impl<F> EventHandler for F
where
    F: Fn(&EngineEvent) + Send + Sync,
{
    fn handle(&mut self, event: &EngineEvent) {
        (self)(event)
    }
}
