use shared::models::{Problem, TestCase};
use shared::SubmissionStatus;

use crate::database::Database;
use crate::executor::{Executor, ExecutionOutcome};

/// Runs every test case for a submission against its already-prepared
/// container, stopping at the first non-`Accepted` result. Persists one
/// `SubmissionDetail` row per test case actually executed, then the terminal
/// submission status.
pub async fn judge(
    db: &Database,
    executor: &Executor,
    submission_id: uuid::Uuid,
    problem: &Problem,
    test_cases: &[TestCase],
    language: &str,
    source_code: &str,
) -> anyhow::Result<SubmissionStatus> {
    if test_cases.is_empty() {
        db.finalize_submission(submission_id, SubmissionStatus::SystemError.as_str(), "0")
            .await?;
        return Ok(SubmissionStatus::SystemError);
    }

    let (prepared, compile_outcome) = executor
        .prepare(language, source_code, problem.memory_limit_mib as i64)
        .await?;

    if let Some(ExecutionOutcome::CompileFailed { .. }) = compile_outcome {
        prepared.cleanup().await;
        db.append_detail(
            submission_id,
            test_cases[0].id,
            SubmissionStatus::CompilationError.as_str(),
            "0",
            test_cases[0].is_sample,
        )
        .await?;
        db.finalize_submission(submission_id, SubmissionStatus::CompilationError.as_str(), "0")
            .await?;
        return Ok(SubmissionStatus::CompilationError);
    }

    let mut final_status = SubmissionStatus::Accepted;
    let mut last_duration = String::new();

    for test_case in test_cases {
        let outcome = prepared.run(&test_case.input_data, problem.time_limit_s).await?;
        let status = classify(&outcome, &test_case.expected_output);
        let duration = duration_of(&outcome);

        db.append_detail(
            submission_id,
            test_case.id,
            status.as_str(),
            &duration,
            test_case.is_sample,
        )
        .await?;

        last_duration = duration;

        if status != SubmissionStatus::Accepted {
            final_status = status;
            break;
        }
    }

    prepared.cleanup().await;

    db.finalize_submission(submission_id, final_status.as_str(), &last_duration)
        .await?;

    Ok(final_status)
}

fn duration_of(outcome: &ExecutionOutcome) -> String {
    match outcome {
        ExecutionOutcome::Ran { duration, .. } => duration.clone(),
        ExecutionOutcome::CompileFailed { .. } => "0".to_string(),
    }
}

/// Precedence: timeout beats a runtime failure, a runtime failure beats a
/// wrong answer. A program that printed nothing but wrote to stderr is a
/// `RuntimeError`, never `Accepted`.
fn classify(outcome: &ExecutionOutcome, expected_output: &str) -> SubmissionStatus {
    match outcome {
        ExecutionOutcome::CompileFailed { .. } => SubmissionStatus::CompilationError,
        ExecutionOutcome::Ran { timed_out: true, .. } => SubmissionStatus::TimeLimitExceeded,
        ExecutionOutcome::Ran { stderr, .. } if !stderr.is_empty() => SubmissionStatus::RuntimeError,
        ExecutionOutcome::Ran { stdout, .. } if stdout.trim() == expected_output.trim() => {
            SubmissionStatus::Accepted
        }
        ExecutionOutcome::Ran { .. } => SubmissionStatus::WrongAnswer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ran(stdout: &str, stderr: &str, timed_out: bool) -> ExecutionOutcome {
        ExecutionOutcome::Ran {
            exit_code: if stderr.is_empty() { 0 } else { 1 },
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            timed_out,
            duration: "0.010".to_string(),
        }
    }

    #[test]
    fn classifies_timeout_before_wrong_answer() {
        let outcome = ran("wrong", "", true);
        assert_eq!(classify(&outcome, "expected"), SubmissionStatus::TimeLimitExceeded);
    }

    #[test]
    fn nonempty_stderr_is_runtime_error_even_with_matching_stdout() {
        let outcome = ran("42", "boom", false);
        assert_eq!(classify(&outcome, "42"), SubmissionStatus::RuntimeError);
    }

    #[test]
    fn trims_whitespace_when_comparing_output() {
        let outcome = ran("42\n", "", false);
        assert_eq!(classify(&outcome, "42"), SubmissionStatus::Accepted);
    }

    #[test]
    fn mismatched_output_is_wrong_answer() {
        let outcome = ran("41", "", false);
        assert_eq!(classify(&outcome, "42"), SubmissionStatus::WrongAnswer);
    }

    #[test]
    fn empty_expected_matches_empty_actual() {
        let outcome = ran("", "", false);
        assert_eq!(classify(&outcome, ""), SubmissionStatus::Accepted);
    }
}
