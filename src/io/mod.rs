pub mod paths;

pub use paths::{WorkflowRoots, WORKFLOWS_DIR_ENV, WORKFLOWS_DIR_NAME};
