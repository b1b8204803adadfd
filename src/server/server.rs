use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::UserId;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::MySqlPool;
use std::sync::Arc;

pub struct Server {
    pub user_service: Arc<dyn UserService>,
    pool: Option<MySqlPool>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let (user_repo, pool): (Arc<dyn UserRepo>, Option<MySqlPool>) =
            match settings.user.backend.as_str() {
                "fake" => {
                    let repo: InMemoryUserRepo = settings
                        .user
                        .seed
                        .iter()
                        .map(|u| (UserId(u.id), u.username.clone()))
                        .collect();
                    debug!(rows = settings.user.seed.len(), "seeded in-memory users");
                    (Arc::new(repo), None)
                }
                "real" => {
                    let database = settings
                        .database
                        .as_ref()
                        .ok_or_else(|| anyhow::anyhow!("user backend \"real\" needs [database]"))?;
                    let pool = connect_lazy(database)?;
                    (Arc::new(MySqlUserRepo::new(pool.clone())), Some(pool))
                }
                other => return Err(anyhow::anyhow!("Unknown user backend: {}", other)),
            };

        let user_service: Arc<dyn UserService> = Arc::new(
            RealUserService::new(user_repo).with_query_timeout(settings.user.query_timeout()),
        );

        Ok(Server { user_service, pool })
    }

    pub async fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("database pool closed");
        }
    }
}
