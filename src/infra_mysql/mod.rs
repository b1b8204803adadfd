mod pool;
mod user_repo_mysql;

pub use pool::*;
pub use user_repo_mysql::*;
