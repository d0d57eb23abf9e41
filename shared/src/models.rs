use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::SubmissionStatus;

/// A validated, authenticated caller. Identity and OAuth are external
/// collaborators (see spec §1); the core only needs the denormalised
/// fields it stamps onto a `Submission` at intake time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
}

/// Read-only input to the core. Authored/moderated elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Problem {
    pub id: Uuid,
    pub title: String,
    pub time_limit_s: f64,
    pub memory_limit_mib: i32,
}

/// One input/expected-output pair belonging to a `Problem`. Test cases have a
/// stable order (`order_index`, ascending) and unique `input_data` within a problem.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TestCase {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub input_data: String,
    pub expected_output: String,
    pub is_sample: bool,
    pub order_index: i32,
}

/// One attempt by a user against a problem. Created by intake in `Pending`;
/// mutated exactly once, by the verdict aggregator, to a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub problem_id: Uuid,
    pub problem_title: String,
    pub contest_id: Option<Uuid>,
    pub language: String,
    pub source_code: String,
    pub status: String, // SubmissionStatus::as_str()
    pub execution_time: String,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn parsed_status(&self) -> Result<SubmissionStatus, String> {
        self.status.parse()
    }
}

/// One row per test case actually executed for a submission. Append-only;
/// absence of a row for a test case means short-circuit stopped before it ran.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SubmissionDetail {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub test_case_id: Uuid,
    pub status: String, // SubmissionStatus::as_str(), always a terminal variant
    pub execution_time: String,
    pub is_sample: bool,
}

/// A contest a submission may optionally be attached to. Contest
/// organisation itself (creation, problem lists, rosters) lives outside the
/// judging core; this is just enough to validate a submission against one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contest {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Inbound request consumed by the intake component (§4.1).
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRequest {
    pub problem_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub language: String,
    pub source_code: String,
}

/// A unit of work placed on the job queue by intake and claimed by a worker.
/// Carries a snapshot of the problem so workers never need to race intake's
/// own read of problem limits.
#[derive(Debug, Clone)]
pub struct Job {
    pub submission_id: Uuid,
    pub problem: Problem,
    pub test_cases: Vec<TestCase>,
    pub source_code: String,
    pub language: String,
}
