use crate::application_port::LookupError;
use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, Option<String>>,
    faults: HashMap<UserId, String>,
}

/// `users` table kept in process memory.
///
/// Backs the `fake` user backend and lets tests script driver faults per id
/// with [`InMemoryUserRepo::fail_on`].
#[derive(Debug, Default)]
pub struct InMemoryUserRepo {
    tables: RwLock<Tables>,
    latency: Option<Duration>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query sleeps for `latency` before touching the table.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert(&self, user_id: UserId, username: Option<String>) {
        self.write().users.insert(user_id, username);
    }

    /// Queries for `user_id` fail with a store error carrying `message`.
    pub fn fail_on(&self, user_id: UserId, message: impl Into<String>) {
        self.write().faults.insert(user_id, message.into());
    }

    pub fn clear_fault(&self, user_id: UserId) {
        self.write().faults.remove(&user_id);
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl FromIterator<(UserId, Option<String>)> for InMemoryUserRepo {
    fn from_iter<I: IntoIterator<Item = (UserId, Option<String>)>>(iter: I) -> Self {
        let repo = InMemoryUserRepo::new();
        for (user_id, username) in iter {
            repo.insert(user_id, username);
        }
        repo
    }
}

#[async_trait::async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, LookupError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let tables = self.read();
        if let Some(message) = tables.faults.get(&user_id) {
            return Err(LookupError::Store(anyhow::anyhow!("{message}")));
        }

        Ok(tables.users.get(&user_id).map(|username| UserRecord {
            user_id,
            username: username.clone(),
        }))
    }
}
