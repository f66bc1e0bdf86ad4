pub mod loader;
pub mod settings;
pub mod types;
pub mod validator;

pub use types::{ServiceConfig, SupplierConfig};
