pub mod app_config;
pub mod flaky;
pub mod memory;

pub use app_config::Config;
pub use flaky::FaultInjector;
pub use memory::MemoryStore;
