//! Intent catalog

mod defaults;
mod registry;

pub use defaults::default_catalog;
pub use registry::{ConfirmationRole, IntentDefinition, IntentRegistry, RegisteredIntent};
