use crate::domain_model::UserId;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("store error: {0}")]
    Store(#[source] anyhow::Error),
    #[error("query timed out after {0:?}")]
    TimedOut(Duration),
    #[error("lookup cancelled")]
    Cancelled,
}

impl LookupError {
    pub fn store<E>(error: E) -> LookupError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LookupError::Store(anyhow::Error::new(error))
    }

    /// True for failures of the storage layer itself, as opposed to the
    /// caller giving up.
    pub fn is_data_access(&self) -> bool {
        matches!(self, LookupError::Store(_) | LookupError::TimedOut(_))
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Returns the username for `user_id`.
    ///
    /// A missing row, or a row whose username is `NULL`, yields an empty
    /// string rather than an error. Only storage failures are errors.
    async fn lookup_username(&self, user_id: UserId) -> Result<String, LookupError>;

    /// Same as [`UserService::lookup_username`], but gives up with
    /// [`LookupError::Cancelled`] as soon as `cancel` fires.
    async fn lookup_username_cancellable(
        &self,
        user_id: UserId,
        cancel: &CancellationToken,
    ) -> Result<String, LookupError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LookupError::Cancelled),
            result = self.lookup_username(user_id) => result,
        }
    }
}
