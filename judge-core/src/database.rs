use shared::models::{Contest, Problem, Submission, SubmissionDetail, TestCase};
use shared::JudgeError;
use sqlx::PgPool;
use uuid::Uuid;

/// Thin wrapper over a connection pool. Holds no judging logic of its own;
/// every method is a single typed query.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, JudgeError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Database { pool })
    }

    pub async fn get_problem(&self, problem_id: Uuid) -> Result<Option<Problem>, JudgeError> {
        let problem = sqlx::query_as::<_, Problem>(
            "SELECT id, title, time_limit_s, memory_limit_mib FROM problems WHERE id = $1",
        )
        .bind(problem_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(problem)
    }

    pub async fn get_test_cases(&self, problem_id: Uuid) -> Result<Vec<TestCase>, JudgeError> {
        let cases = sqlx::query_as::<_, TestCase>(
            "SELECT id, problem_id, input_data, expected_output, is_sample, order_index
             FROM test_cases WHERE problem_id = $1 ORDER BY order_index ASC",
        )
        .bind(problem_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cases)
    }

    pub async fn get_contest(&self, contest_id: Uuid) -> Result<Option<Contest>, JudgeError> {
        let contest = sqlx::query_as::<_, Contest>(
            "SELECT id, start_time, end_time FROM contests WHERE id = $1",
        )
        .bind(contest_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contest)
    }

    pub async fn is_contest_participant(
        &self,
        contest_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, JudgeError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contest_participants WHERE contest_id = $1 AND user_id = $2",
        )
        .bind(contest_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn is_problem_in_contest(
        &self,
        contest_id: Uuid,
        problem_id: Uuid,
    ) -> Result<bool, JudgeError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contest_problems WHERE contest_id = $1 AND problem_id = $2",
        )
        .bind(contest_id)
        .bind(problem_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_submission(
        &self,
        id: Uuid,
        user_id: Uuid,
        user_name: &str,
        problem_id: Uuid,
        problem_title: &str,
        contest_id: Option<Uuid>,
        language: &str,
        source_code: &str,
    ) -> Result<Submission, JudgeError> {
        let submission = sqlx::query_as::<_, Submission>(
            "INSERT INTO submissions
                (id, user_id, user_name, problem_id, problem_title, contest_id,
                 language, source_code, status, execution_time, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'Pending', '', now())
             RETURNING id, user_id, user_name, problem_id, problem_title, contest_id,
                       language, source_code, status, execution_time, created_at",
        )
        .bind(id)
        .bind(user_id)
        .bind(user_name)
        .bind(problem_id)
        .bind(problem_title)
        .bind(contest_id)
        .bind(language)
        .bind(source_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(submission)
    }

    pub async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>, JudgeError> {
        let submission = sqlx::query_as::<_, Submission>(
            "SELECT id, user_id, user_name, problem_id, problem_title, contest_id,
                    language, source_code, status, execution_time, created_at
             FROM submissions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    pub async fn update_submission_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<(), JudgeError> {
        sqlx::query("UPDATE submissions SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn finalize_submission(
        &self,
        id: Uuid,
        status: &str,
        execution_time: &str,
    ) -> Result<(), JudgeError> {
        sqlx::query(
            "UPDATE submissions SET status = $2, execution_time = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .bind(execution_time)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn append_detail(
        &self,
        submission_id: Uuid,
        test_case_id: Uuid,
        status: &str,
        execution_time: &str,
        is_sample: bool,
    ) -> Result<SubmissionDetail, JudgeError> {
        let detail = sqlx::query_as::<_, SubmissionDetail>(
            "INSERT INTO submission_details
                (id, submission_id, test_case_id, status, execution_time, is_sample)
             VALUES (gen_random_uuid(), $1, $2, $3, $4, $5)
             RETURNING id, submission_id, test_case_id, status, execution_time, is_sample",
        )
        .bind(submission_id)
        .bind(test_case_id)
        .bind(status)
        .bind(execution_time)
        .bind(is_sample)
        .fetch_one(&self.pool)
        .await?;

        Ok(detail)
    }
}
