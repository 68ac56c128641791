pub mod catalog;
pub mod cli;
pub mod error;
pub mod io;

pub use catalog::{Installer, Registry};
pub use error::{ActionflowError, Result};
