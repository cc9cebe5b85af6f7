//! Core application primitives (orchestrator, scheduler, HTTP surface)

pub mod bootstrap;
pub mod http;
pub mod orchestrator;
pub mod scheduler;

pub use bootstrap::Services;
pub use http::*;
pub use orchestrator::*;
pub use scheduler::*;
