pub mod inspect;
pub mod install;
pub mod list;

use crate::catalog::Registry;
use crate::Result;

/// Common trait for all command handlers
pub trait CommandHandler {
    /// Execute the command against a loaded catalog
    fn execute(&self, registry: &Registry) -> Result<()>;

    /// Get command name for logging
    fn name(&self) -> &'static str;
}
