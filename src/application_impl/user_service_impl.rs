use crate::application_port::{LookupError, UserService};
use crate::domain_model::UserId;
use crate::domain_port::UserRepo;
use crate::logger::*;
use std::sync::Arc;
use std::time::Duration;

pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
    query_timeout: Option<Duration>,
}

impl RealUserService {
    pub fn new(user_repo: Arc<dyn UserRepo>) -> RealUserService {
        RealUserService {
            user_repo,
            query_timeout: None,
        }
    }

    /// A zero duration disables the deadline.
    pub fn with_query_timeout(mut self, timeout: Duration) -> RealUserService {
        self.query_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    async fn query(&self, user_id: UserId) -> Result<Option<String>, LookupError> {
        let find = self.user_repo.find_by_id(user_id);
        let record = match self.query_timeout {
            Some(timeout) => tokio::time::timeout(timeout, find)
                .await
                .map_err(|_| LookupError::TimedOut(timeout))??,
            None => find.await?,
        };

        Ok(record.map(|r| r.username.unwrap_or_default()))
    }
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn lookup_username(&self, user_id: UserId) -> Result<String, LookupError> {
        match self.query(user_id).await {
            Ok(Some(username)) => Ok(username),
            Ok(None) => {
                debug!(%user_id, "no user with user_id");
                Ok(String::new())
            }
            Err(e) => {
                error!(%user_id, error = %e, "failed to resolve username");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::InMemoryUserRepo;
    use std::io;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    fn seeded() -> Arc<InMemoryUserRepo> {
        let repo = InMemoryUserRepo::new();
        repo.insert(UserId(1), Some("alice".to_string()));
        repo.insert(UserId(4), None);
        repo.fail_on(UserId(3), "driver fault: connection refused");
        Arc::new(repo)
    }

    #[tokio::test]
    async fn found_row_returns_username() {
        let service = RealUserService::new(seeded());
        assert_eq!(service.lookup_username(UserId(1)).await.unwrap(), "alice");
    }

    #[tokio::test]
    async fn missing_row_is_empty_not_error() {
        let service = RealUserService::new(seeded());
        assert_eq!(service.lookup_username(UserId(2)).await.unwrap(), "");
    }

    #[tokio::test]
    async fn null_username_is_empty() {
        let service = RealUserService::new(seeded());
        assert_eq!(service.lookup_username(UserId(4)).await.unwrap(), "");
    }

    #[tokio::test]
    async fn driver_fault_is_surfaced_with_cause() {
        let service = RealUserService::new(seeded());

        let err = service.lookup_username(UserId(3)).await.unwrap_err();
        assert!(err.is_data_access());
        assert!(matches!(err, LookupError::Store(_)));

        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("driver fault: connection refused"));
    }

    #[tokio::test]
    async fn repeated_lookups_agree() {
        let service = RealUserService::new(seeded());
        for id in [1, 2, 4] {
            let first = service.lookup_username(UserId(id)).await.unwrap();
            let second = service.lookup_username(UserId(id)).await.unwrap();
            assert_eq!(first, second);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_store_hits_query_timeout() {
        let repo = InMemoryUserRepo::new().with_latency(Duration::from_secs(5));
        repo.insert(UserId(1), Some("alice".to_string()));
        let service =
            RealUserService::new(Arc::new(repo)).with_query_timeout(Duration::from_millis(200));

        let err = service.lookup_username(UserId(1)).await.unwrap_err();
        assert!(matches!(err, LookupError::TimedOut(d) if d == Duration::from_millis(200)));
        assert!(err.is_data_access());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_timeout_means_no_deadline() {
        let repo = InMemoryUserRepo::new().with_latency(Duration::from_secs(5));
        repo.insert(UserId(1), Some("alice".to_string()));
        let service = RealUserService::new(Arc::new(repo)).with_query_timeout(Duration::ZERO);

        assert_eq!(service.lookup_username(UserId(1)).await.unwrap(), "alice");
    }

    #[tokio::test]
    async fn cancelled_token_stops_lookup() {
        let repo = InMemoryUserRepo::new().with_latency(Duration::from_secs(60));
        let service = RealUserService::new(Arc::new(repo));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service
            .lookup_username_cancellable(UserId(1), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Cancelled));
        assert!(!err.is_data_access());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_query_drops_it() {
        let repo = InMemoryUserRepo::new().with_latency(Duration::from_secs(60));
        repo.insert(UserId(1), Some("alice".to_string()));
        let service = RealUserService::new(Arc::new(repo));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let started = tokio::time::Instant::now();
        let err = service
            .lookup_username_cancellable(UserId(1), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn live_token_lets_lookup_finish() {
        let service = RealUserService::new(seeded());
        let cancel = CancellationToken::new();

        let username = service
            .lookup_username_cancellable(UserId(1), &cancel)
            .await
            .unwrap();
        assert_eq!(username, "alice");
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failure_logs_error_and_missing_row_logs_debug() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let service = RealUserService::new(seeded());
        assert!(service.lookup_username(UserId(3)).await.is_err());
        assert_eq!(service.lookup_username(UserId(2)).await.unwrap(), "");

        let lines = log.lines();
        assert!(lines.iter().any(|l| l.contains("ERROR")
            && l.contains("user_id=3")
            && l.contains("driver fault: connection refused")));
        assert!(
            lines
                .iter()
                .any(|l| l.contains("DEBUG") && l.contains("user_id=2"))
        );
        assert!(
            !lines
                .iter()
                .any(|l| l.contains("ERROR") && l.contains("user_id=2"))
        );
    }
}
