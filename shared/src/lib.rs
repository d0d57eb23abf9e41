pub mod error;
pub mod language;
pub mod models;
pub mod types;

pub use error::JudgeError;
pub use types::SubmissionStatus;
