use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a `Submission`. `Pending` is the only non-terminal value;
/// every other variant is written exactly once, by the verdict aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    WrongAnswer,
    RuntimeError,
    TimeLimitExceeded,
    CompilationError,
    SystemError,
}

impl SubmissionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Accepted => "Accepted",
            SubmissionStatus::WrongAnswer => "WrongAnswer",
            SubmissionStatus::RuntimeError => "RuntimeError",
            SubmissionStatus::TimeLimitExceeded => "TimeLimitExceeded",
            SubmissionStatus::CompilationError => "CompilationError",
            SubmissionStatus::SystemError => "SystemError",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(SubmissionStatus::Pending),
            "Accepted" => Ok(SubmissionStatus::Accepted),
            "WrongAnswer" => Ok(SubmissionStatus::WrongAnswer),
            "RuntimeError" => Ok(SubmissionStatus::RuntimeError),
            "TimeLimitExceeded" => Ok(SubmissionStatus::TimeLimitExceeded),
            "CompilationError" => Ok(SubmissionStatus::CompilationError),
            "SystemError" => Ok(SubmissionStatus::SystemError),
            other => Err(format!("unknown submission status '{other}'")),
        }
    }
}
