use std::sync::Arc;

use sqlx::MySqlPool;

use crate::{
    config::Config,
    repository::{EmployeeRepository, MySqlEmployeeRepository, MySqlUserRepository, UserRepository},
    services::{AuthService, EmployeeService, UserService},
    storage::{BlobStore, ImageStore, LocalBlobStore},
};

/// Everything the routes need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub employees: EmployeeService,
    pub auth: AuthService,
    pub users: UserService,
}

impl AppState {
    pub fn new(
        config: Config,
        employee_repo: Arc<dyn EmployeeRepository>,
        user_repo: Arc<dyn UserRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let images = ImageStore::new(blobs, config.upload.clone());

        Self {
            employees: EmployeeService::new(employee_repo, images),
            auth: AuthService::new(
                user_repo.clone(),
                config.jwt_secret.clone(),
                config.access_token_ttl,
            ),
            users: UserService::new(user_repo),
            config,
        }
    }

    /// MySQL repositories and a local upload directory.
    pub fn from_pool(config: Config, pool: MySqlPool) -> Self {
        let blobs = Arc::new(LocalBlobStore::new(config.upload.dir.clone()));

        Self::new(
            config,
            Arc::new(MySqlEmployeeRepository::new(pool.clone())),
            Arc::new(MySqlUserRepository::new(pool)),
            blobs,
        )
    }
}
