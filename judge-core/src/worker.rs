use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::aggregator;
use crate::database::Database;
use crate::executor::Executor;
use crate::queue::JobReceiver;

/// Claims jobs off the shared queue and judges them one at a time, forever.
/// Several of these run concurrently against the same receiver (a bounded
/// mpsc channel has a single consumer side, so it's shared behind a mutex);
/// each judged submission is wrapped in `tokio::spawn` so a panic inside one
/// can't take the worker loop down with it.
pub async fn run(worker_id: usize, db: Database, executor: Arc<Executor>, jobs: Arc<Mutex<JobReceiver>>) {
    loop {
        let job = {
            let mut guard = jobs.lock().await;
            guard.recv().await
        };
        let Some(job) = job else {
            break;
        };

        let submission_id = job.submission_id;
        let task_db = db.clone();
        let task_executor = executor.clone();

        let handle = tokio::spawn(async move {
            aggregator::judge(
                &task_db,
                &task_executor,
                job.submission_id,
                &job.problem,
                &job.test_cases,
                &job.language,
                &job.source_code,
            )
            .await
        });

        match handle.await {
            Ok(Ok(status)) => {
                tracing::info!(worker_id, %submission_id, %status, "submission judged");
            }
            Ok(Err(e)) => {
                tracing::error!(worker_id, %submission_id, error = %e, "judging failed");
                mark_system_error(&db, submission_id).await;
            }
            Err(join_err) => {
                if join_err.is_panic() {
                    tracing::error!(worker_id, %submission_id, "worker task panicked");
                } else {
                    tracing::error!(worker_id, %submission_id, "worker task cancelled");
                }
                mark_system_error(&db, submission_id).await;
            }
        }
    }

    tracing::info!(worker_id, "job queue closed, worker exiting");
}

async fn mark_system_error(db: &Database, submission_id: Uuid) {
    let _ = db
        .finalize_submission(submission_id, shared::SubmissionStatus::SystemError.as_str(), "0")
        .await;
}
