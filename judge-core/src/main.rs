use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use judge_core::{config::Config, database::Database, executor::Executor, queue, rate_limiter::RateLimiter, selftest, worker, Intake};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "judge_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let db = Database::new(&config.database_url).await?;
    let executor = Arc::new(Executor::new()?);

    tracing::info!("running self-test across all supported languages...");
    if !selftest::run(&executor).await {
        tracing::error!("self-test failed, refusing to start");
        anyhow::bail!("self-test failed");
    }

    let rate_limiter = RateLimiter::new(config.rate_limit_cooldown_secs);
    let (job_queue, receiver) = queue::bounded(config.job_queue_capacity);
    let _intake = Intake::new(db.clone(), rate_limiter, job_queue);
    let receiver = Arc::new(Mutex::new(receiver));

    let mut worker_handles = Vec::new();
    for worker_id in 0..config.worker_count {
        let db = db.clone();
        let executor = executor.clone();
        let receiver = receiver.clone();
        worker_handles.push(tokio::spawn(worker::run(worker_id, db, executor, receiver)));
    }

    tracing::info!(worker_count = config.worker_count, "judging core started");

    // `_intake` is the entry point an out-of-scope HTTP layer would call
    // into; this binary only needs to keep the workers alive to drain jobs
    // placed there in-process (see self-test and tests for exercised paths).
    for handle in worker_handles {
        let _ = handle.await;
    }

    Ok(())
}
