use crate::application_port::LookupError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// `Ok(None)` when no row matches `user_id`.
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, LookupError>;
}
