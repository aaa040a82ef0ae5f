use actix_web::{HttpResponse, http::StatusCode, web};

use crate::{
    auth::AuthUser,
    error::AppResult,
    model::user::UserResponse,
    models::{Pagination, ProfileUpdateReq},
    services::UserService,
    utils::response::success,
};

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(Pagination),
    responses(
        (status = 200, description = "Users ordered by id", body = [UserResponse]),
        (status = 400, description = "Limit must be between 1 and 100")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    _auth: AuthUser,
    service: web::Data<UserService>,
    query: web::Query<Pagination>,
) -> AppResult<HttpResponse> {
    let (skip, limit) = query.bounds()?;
    let users: Vec<UserResponse> = service
        .list(skip, limit)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(success(StatusCode::OK, "Users retrieved", users))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    _auth: AuthUser,
    service: web::Data<UserService>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    let user = service.get(path.into_inner()).await?;
    Ok(success(StatusCode::OK, "User retrieved", UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "You cannot delete your own account"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    auth: AuthUser,
    service: web::Data<UserService>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    service.delete(id, auth.user_id).await?;
    Ok(success(StatusCode::OK, format!("User {id} deleted"), ()))
}

/// Update the caller's own profile
#[utoipa::path(
    put,
    path = "/api/v1/users/profile",
    request_body = ProfileUpdateReq,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "No update data provided")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    auth: AuthUser,
    service: web::Data<UserService>,
    body: web::Json<ProfileUpdateReq>,
) -> AppResult<HttpResponse> {
    let user = service.update_profile(auth.user_id, &body).await?;
    Ok(success(StatusCode::OK, "Profile updated", UserResponse::from(user)))
}
