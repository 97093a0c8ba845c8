//! Configuration sections

mod app;
mod dispatch;
mod event_bus;
mod logging;
mod providers;
mod scheduler;

pub use app::AppConfig;
pub use dispatch::DispatchConfig;
pub use event_bus::{EventBusConfig, EventBusKind};
pub use logging::LoggingConfig;
pub use providers::ProviderConfig;
pub use scheduler::SchedulerConfig;
