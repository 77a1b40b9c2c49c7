//! System context configuration and loading

mod context;
mod loader;

pub use context::SystemContext;
pub use loader::ContextLoader;
