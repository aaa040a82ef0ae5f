use actix_web::{HttpResponse, http::StatusCode, web};
use tracing::info;

use crate::{
    error::AppResult,
    model::user::UserResponse,
    models::{LoginReqDto, RegisterReq, TokenResponse},
    services::AuthService,
    utils::response::success,
};

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Username or email already registered"),
        (status = 422, description = "Invalid registration data"),
        (status = 429, description = "Too many requests")
    ),
    tag = "Auth"
)]
pub async fn register(
    body: web::Json<RegisterReq>,
    auth: web::Data<AuthService>,
) -> AppResult<HttpResponse> {
    let user = auth.register(&body).await?;

    Ok(success(
        StatusCode::CREATED,
        "User created",
        UserResponse::from(user),
    ))
}

/// Exchange username and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Incorrect username or password"),
        (status = 429, description = "Too many requests")
    ),
    tag = "Auth"
)]
pub async fn login(
    body: web::Json<LoginReqDto>,
    auth: web::Data<AuthService>,
) -> AppResult<HttpResponse> {
    info!("Login request received");
    let token = auth.login(&body).await?;

    Ok(success(StatusCode::OK, "Login successful", token))
}
