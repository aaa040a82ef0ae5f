use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    web::Data,
};
use tracing::debug;

use crate::{error::AppError, services::AuthService};

fn bearer_token(req: &ServiceRequest) -> Result<String, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("Authorization header must start with Bearer".to_string())
        })
}

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let auth = req
        .app_data::<Data<AuthService>>()
        .cloned()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("AuthService missing from app data")))?;

    let resolved = match bearer_token(&req) {
        Ok(token) => auth.current_user(&token).await,
        Err(e) => Err(e),
    };

    match resolved {
        Ok(user) => {
            debug!(user_id = user.user_id, "Request authenticated");
            req.extensions_mut().insert(user);
            next.call(req).await
        }
        Err(e) => Ok(req.into_response(e.error_response())),
    }
}
