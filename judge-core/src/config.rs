use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    pub worker_count: usize,
    pub job_queue_capacity: usize,
    pub rate_limit_cooldown_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/judicia".to_string());

        let worker_count = std::env::var("WORKER_COUNT")
            .unwrap_or_else(|_| "4".to_string())
            .parse()
            .unwrap_or(4);

        let job_queue_capacity = std::env::var("JOB_QUEUE_CAPACITY")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .unwrap_or(100);

        let rate_limit_cooldown_secs = std::env::var("RATE_LIMIT_COOLDOWN_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Config {
            database_url,
            worker_count,
            job_queue_capacity,
            rate_limit_cooldown_secs,
        })
    }
}
