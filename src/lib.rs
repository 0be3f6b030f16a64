pub mod browser;
pub mod config;
pub mod console;
pub mod env_file;
pub mod error;
pub mod provision;

pub use config::{Config, Options};
pub use error::{Error, Result};
pub use provision::{instagres, Outcome, Provisioner};
