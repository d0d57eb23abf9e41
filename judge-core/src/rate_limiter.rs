use chrono::{DateTime, Utc};
use shared::JudgeError;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Per-user submission cooldown. One instance is owned by the intake
/// component for the lifetime of the process; it is not a process global.
pub struct RateLimiter {
    cooldown: chrono::Duration,
    last_submission: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new(cooldown_secs: u64) -> Self {
        RateLimiter {
            cooldown: chrono::Duration::seconds(cooldown_secs as i64),
            last_submission: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether `user_id` may submit right now, and if so records the
    /// attempt. Read-check-update happens under a single lock so two
    /// concurrent submissions from the same user can't both pass.
    pub async fn check_and_record(&self, user_id: Uuid) -> Result<(), JudgeError> {
        let now = Utc::now();
        let mut guard = self.last_submission.lock().await;

        if let Some(last) = guard.get(&user_id) {
            let elapsed = now - *last;
            if elapsed < self.cooldown {
                let seconds_left = (self.cooldown - elapsed).num_seconds().max(0) as u64;
                return Err(JudgeError::RateLimited { seconds_left });
            }
        }

        guard.insert(user_id, now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_submission_always_allowed() {
        let limiter = RateLimiter::new(5);
        assert!(limiter.check_and_record(Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn second_submission_within_cooldown_is_rejected() {
        let limiter = RateLimiter::new(5);
        let user = Uuid::new_v4();
        limiter.check_and_record(user).await.unwrap();

        let err = limiter.check_and_record(user).await.unwrap_err();
        match err {
            JudgeError::RateLimited { seconds_left } => assert!(seconds_left > 0 && seconds_left <= 5),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn different_users_do_not_share_cooldown() {
        let limiter = RateLimiter::new(5);
        limiter.check_and_record(Uuid::new_v4()).await.unwrap();
        assert!(limiter.check_and_record(Uuid::new_v4()).await.is_ok());
    }
}
