use shared::language;
use shared::models::{AuthenticatedUser, Job, Submission, SubmissionRequest};
use shared::JudgeError;

use crate::database::Database;
use crate::queue::JobQueue;
use crate::rate_limiter::RateLimiter;
use crate::security;

/// Entry point for a new submission. Validates the request, enforces the
/// per-user cooldown, persists a `Pending` row, and hands a `Job` to the
/// queue. Everything downstream (compiling, running, judging) happens off
/// this call's return path.
pub struct Intake {
    db: Database,
    rate_limiter: RateLimiter,
    queue: JobQueue,
}

impl Intake {
    pub fn new(db: Database, rate_limiter: RateLimiter, queue: JobQueue) -> Self {
        Intake { db, rate_limiter, queue }
    }

    pub async fn submit(
        &self,
        user: &AuthenticatedUser,
        request: SubmissionRequest,
    ) -> Result<Submission, JudgeError> {
        if request.source_code.trim().is_empty() {
            return Err(JudgeError::InvalidInput("source_code must not be empty".to_string()));
        }

        let spec = language::lookup(&request.language)
            .ok_or_else(|| JudgeError::UnsupportedLanguage(request.language.clone()))?;

        security::check(spec.name, &request.source_code)?;

        self.rate_limiter.check_and_record(user.id).await?;

        let problem = self
            .db
            .get_problem(request.problem_id)
            .await?
            .ok_or_else(|| JudgeError::NotFound(format!("problem {}", request.problem_id)))?;

        let test_cases = self.db.get_test_cases(problem.id).await?;
        if test_cases.is_empty() {
            return Err(JudgeError::SystemError(format!(
                "problem {} has no test cases",
                problem.id
            )));
        }

        if let Some(contest_id) = request.contest_id {
            self.check_contest(contest_id, user.id, problem.id).await?;
        }

        let submission_id = uuid::Uuid::new_v4();
        let submission = self
            .db
            .create_submission(
                submission_id,
                user.id,
                &user.name,
                problem.id,
                &problem.title,
                request.contest_id,
                spec.name,
                &request.source_code,
            )
            .await?;

        let job = Job {
            submission_id,
            problem,
            test_cases,
            source_code: request.source_code,
            language: spec.name.to_string(),
        };

        if let Err(e) = self.queue.try_enqueue(job) {
            // Roll the submission's visible state forward so a saturated
            // queue doesn't leave a `Pending` row with no worker ever
            // picking it up.
            let _ = self
                .db
                .finalize_submission(submission_id, shared::SubmissionStatus::SystemError.as_str(), "0")
                .await;
            return Err(e);
        }

        Ok(submission)
    }

    /// Validates a submission against a contest it claims to belong to: the
    /// contest must exist, be currently running, the user must be a
    /// registered participant, and the problem must be one of the contest's.
    async fn check_contest(
        &self,
        contest_id: uuid::Uuid,
        user_id: uuid::Uuid,
        problem_id: uuid::Uuid,
    ) -> Result<(), JudgeError> {
        let contest = self
            .db
            .get_contest(contest_id)
            .await?
            .ok_or_else(|| JudgeError::NotFound(format!("contest {contest_id}")))?;

        let now = chrono::Utc::now();
        if now < contest.start_time {
            return Err(JudgeError::Forbidden("contest has not started yet".to_string()));
        }
        if now > contest.end_time {
            return Err(JudgeError::Forbidden("contest has ended".to_string()));
        }

        if !self.db.is_contest_participant(contest_id, user_id).await? {
            return Err(JudgeError::Forbidden(
                "you are not registered for this contest".to_string(),
            ));
        }

        if !self.db.is_problem_in_contest(contest_id, problem_id).await? {
            return Err(JudgeError::BadRequest(
                "problem does not belong to this contest".to_string(),
            ));
        }

        Ok(())
    }
}
