//! Retrieval handlers for the EMI support assistant
//!
//! Every intent is bound to a handler by name. Handlers take the raw user
//! text and return structured JSON that is embedded in the grounded prompt.

pub mod registry;
pub mod loan;

pub use registry::{HandlerRegistry, StaticHandler};
pub use loan::{create_default_registry, handler_names, payload};
