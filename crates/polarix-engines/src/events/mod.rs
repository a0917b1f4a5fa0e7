mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::EngineEvent;
pub use handlers::EventHandler;
