use crate::application_port::LookupError;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::{MySqlPool, Row};

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, LookupError> {
        let Some(row) = sqlx::query("SELECT id, username FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(LookupError::store)?
        else {
            return Ok(None);
        };

        let record = UserRecord {
            user_id: row.try_get::<UserId, _>("id").map_err(LookupError::store)?,
            username: row
                .try_get::<Option<String>, _>("username")
                .map_err(LookupError::store)?,
        };

        Ok(Some(record))
    }
}
