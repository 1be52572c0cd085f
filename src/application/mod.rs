pub mod file_saver;
pub mod submit_workflow;

pub use file_saver::{DialogFileSaver, DirectoryFileSaver, FileSaver};
pub use submit_workflow::SubmitWorkflow;
