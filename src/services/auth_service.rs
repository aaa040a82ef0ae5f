use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, verify_token},
        password::{hash_password, verify_password},
    },
    error::{AppError, AppResult},
    model::user::{NewUser, User},
    models::{LoginReqDto, RegisterReq, TokenResponse},
    repository::UserRepository,
    utils::validation::FieldErrors,
};
use validator::Validate;

const BAD_CREDENTIALS: &str = "Incorrect username or password";

/// Registration, login and bearer-token resolution.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
    token_ttl: usize,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_secret: impl Into<String>, token_ttl: usize) -> Self {
        Self {
            users,
            jwt_secret: jwt_secret.into(),
            token_ttl,
        }
    }

    #[instrument(name = "auth_register", skip(self, req), fields(username = %req.username))]
    pub async fn register(&self, req: &RegisterReq) -> AppResult<User> {
        let normalized = RegisterReq {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            password: req.password.clone(),
            full_name: req
                .full_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };

        let mut errors = FieldErrors::default();
        if let Err(e) = normalized.validate() {
            errors.extend_from(e);
        }
        errors.into_result()?;

        let RegisterReq {
            username,
            email,
            password,
            full_name,
        } = normalized;

        if self.users.get_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("Username already registered".to_string()));
        }
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let hashed_password = hash_password(&password)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;

        let user = self
            .users
            .create(&NewUser {
                username,
                email,
                hashed_password,
                full_name,
            })
            .await?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Unknown user, wrong password and inactive account are indistinguishable.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .users
            .get_by_username(username.trim())
            .await?
            .ok_or_else(|| {
                debug!("Invalid credentials: user not found");
                AppError::Unauthorized(BAD_CREDENTIALS.to_string())
            })?;

        if let Err(e) = verify_password(password, &user.hashed_password) {
            debug!(error = %e, "Invalid credentials: password mismatch");
            return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            debug!(user_id = user.id, "Login refused for inactive user");
            return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        Ok(user)
    }

    #[instrument(name = "auth_login", skip(self, req), fields(username = %req.username))]
    pub async fn login(&self, req: &LoginReqDto) -> AppResult<TokenResponse> {
        let user = self.authenticate(&req.username, &req.password).await?;

        let access_token =
            generate_access_token(user.id, user.username.clone(), &self.jwt_secret, self.token_ttl)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("token signing failed: {e}")))?;

        info!(user_id = user.id, "Login successful");
        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    /// Maps a bearer token to the live user it was issued for.
    pub async fn current_user(&self, token: &str) -> AppResult<AuthUser> {
        let claims = verify_token(token, &self.jwt_secret).map_err(|e| {
            debug!(error = %e, "Token rejected");
            AppError::Unauthorized("Could not validate credentials".to_string())
        })?;

        let user = self
            .users
            .get_by_username(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_string()))?;

        if !user.is_active {
            return Err(AppError::Forbidden("Inactive user".to_string()));
        }

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
        })
    }
}
