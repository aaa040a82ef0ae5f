use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    error::{AppError, AppResult},
    model::user::User,
    models::ProfileUpdateReq,
    repository::UserRepository,
    utils::validation::FieldErrors,
};
use validator::Validate;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

fn not_found(id: u64) -> AppError {
    AppError::NotFound(format!("User with ID {id} not found"))
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<User>> {
        self.users.list(skip, limit).await
    }

    pub async fn get(&self, id: u64) -> AppResult<User> {
        self.users.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    #[instrument(name = "user_delete", skip(self))]
    pub async fn delete(&self, id: u64, actor: u64) -> AppResult<()> {
        if id == actor {
            return Err(AppError::Forbidden("You cannot delete your own account".to_string()));
        }
        if !self.users.delete(id).await? {
            return Err(not_found(id));
        }
        info!(user_id = id, "User deleted");
        Ok(())
    }

    #[instrument(name = "user_profile_update", skip(self, req))]
    pub async fn update_profile(&self, actor: u64, req: &ProfileUpdateReq) -> AppResult<User> {
        let normalized = ProfileUpdateReq {
            full_name: req
                .full_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };
        let Some(full_name) = normalized.full_name.as_deref() else {
            return Err(AppError::BadRequest("No update data provided".to_string()));
        };

        let mut errors = FieldErrors::default();
        if let Err(e) = normalized.validate() {
            errors.extend_from(e);
        }
        errors.into_result()?;

        self.users
            .update_full_name(actor, full_name)
            .await?
            .ok_or_else(|| not_found(actor))
    }
}
