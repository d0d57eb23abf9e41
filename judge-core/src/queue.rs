use shared::models::Job;
use shared::JudgeError;
use tokio::sync::mpsc;

/// Bounded in-memory job queue. Enqueue never blocks: a full queue is
/// reported to the caller as `ServiceUnavailable` instead of applying
/// backpressure to the submitting request.
pub struct JobQueue {
    sender: mpsc::Sender<Job>,
}

pub struct JobReceiver {
    receiver: mpsc::Receiver<Job>,
}

pub fn bounded(capacity: usize) -> (JobQueue, JobReceiver) {
    let (sender, receiver) = mpsc::channel(capacity);
    (JobQueue { sender }, JobReceiver { receiver })
}

impl JobQueue {
    pub fn try_enqueue(&self, job: Job) -> Result<(), JudgeError> {
        self.sender.try_send(job).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => {
                JudgeError::ServiceUnavailable("job queue is full".to_string())
            }
            mpsc::error::TrySendError::Closed(_) => {
                JudgeError::ServiceUnavailable("job queue is shut down".to_string())
            }
        })
    }
}

impl JobReceiver {
    pub async fn recv(&mut self) -> Option<Job> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Problem;
    use uuid::Uuid;

    fn dummy_job() -> Job {
        Job {
            submission_id: Uuid::new_v4(),
            problem: Problem {
                id: Uuid::new_v4(),
                title: "A+B".to_string(),
                time_limit_s: 1.0,
                memory_limit_mib: 256,
            },
            test_cases: Vec::new(),
            source_code: "print(1)".to_string(),
            language: "python".to_string(),
        }
    }

    #[tokio::test]
    async fn enqueue_then_receive_round_trips() {
        let (queue, mut rx) = bounded(2);
        let job = dummy_job();
        let id = job.submission_id;
        queue.try_enqueue(job).unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received.submission_id, id);
    }

    #[tokio::test]
    async fn full_queue_is_rejected_without_blocking() {
        let (queue, _rx) = bounded(1);
        queue.try_enqueue(dummy_job()).unwrap();
        let err = queue.try_enqueue(dummy_job()).unwrap_err();
        assert!(matches!(err, JudgeError::ServiceUnavailable(_)));
    }
}
