//! Kernel for the qwat storefront: layered settings plus the module
//! lifecycle the application and HTTP layer are built around.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
