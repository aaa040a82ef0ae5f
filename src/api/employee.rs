use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, http::StatusCode, web};
use futures_util::TryStreamExt;
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    model::employee::Employee,
    models::Pagination,
    services::EmployeeService,
    storage::UploadedImage,
    utils::{response::success, validation::RawEmployeeForm},
};

/// Multipart part carrying the profile image.
pub const IMAGE_FIELD: &str = "image";
/// Longest text part accepted in an employee form.
const MAX_TEXT_FIELD_BYTES: usize = 4 * 1024;

/// Multipart form schema for the OpenAPI docs only. Handlers read the parts
/// through [`read_employee_form`]; on update any subset may be sent.
#[derive(ToSchema)]
#[schema(rename_all = "PascalCase")]
pub struct EmployeeForm {
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    #[schema(example = 1)]
    pub campus_id: u64,
    #[schema(example = 3)]
    pub designation_id: u64,
    #[schema(example = "6f1c2a8e-1d4b-4f0e-9a55-0c7d3b2e9f10", nullable = true)]
    pub user_id: Option<String>,
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "Richard Doe")]
    pub father_name: String,
    #[schema(example = "Male")]
    pub gender: String,
    #[schema(example = "1990-05-17")]
    pub date_of_birth: String,
    #[schema(rename = "CNIC", example = "35202-1234567-1")]
    pub cnic: String,
    #[schema(example = "+923001234567")]
    pub phone_no: String,
    #[schema(nullable = true)]
    pub mobile_no: Option<String>,
    #[schema(example = "O+", nullable = true)]
    pub blood_group: Option<String>,
    #[schema(example = "2020-01-15", nullable = true)]
    pub hire_date: Option<String>,
    #[schema(example = 85000.0, nullable = true)]
    pub salary: Option<f64>,
    #[schema(example = "false", nullable = true)]
    pub is_hourly_salary: Option<String>,
    #[schema(example = 4, nullable = true)]
    pub experience: Option<i32>,
    /// jpg, jpeg, png, gif or webp, at most 5MB
    #[schema(rename = "image", value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub items: Vec<Employee>,
    #[schema(example = 0)]
    pub skip: u64,
    #[schema(example = 100)]
    pub limit: u64,
    /// Live employees in total
    #[schema(example = 42)]
    pub total: i64,
}

fn multipart_error(err: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed multipart body: {err}"))
}

async fn read_text(field: &mut Field, name: &str) -> AppResult<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::BadRequest(format!("Field {name} is too long")));
        }
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf).map_err(|_| AppError::BadRequest(format!("Field {name} is not valid UTF-8")))
}

/// Splits a multipart employee form into its text fields and optional image.
///
/// Image bytes beyond `image_cap` are counted but not kept. An image part
/// without a filename is treated as "no image".
pub async fn read_employee_form(
    mut payload: Multipart,
    image_cap: usize,
) -> AppResult<(RawEmployeeForm, Option<UploadedImage>)> {
    let mut form = RawEmployeeForm::default();
    let mut image = None;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(str::to_string);

        if name == IMAGE_FIELD {
            let content_type = field.content_type().map(|m| m.essence_str().to_string());
            let mut upload = UploadedImage::new(file_name.clone().unwrap_or_default(), content_type);
            while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
                upload.append(&chunk, image_cap);
            }
            if file_name.is_some_and(|f| !f.is_empty()) {
                debug!(file = %upload.file_name, size = upload.size, "Image part received");
                image = Some(upload);
            }
            continue;
        }

        if name.is_empty() {
            continue;
        }
        let value = read_text(&mut field, &name).await?;
        form.insert(name, value);
    }

    Ok((form, image))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/Employees",
    request_body(content = EmployeeForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Invalid image upload"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "CNIC, Email or UserId already in use"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    service: web::Data<EmployeeService>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let (form, image) = read_employee_form(payload, service.images().buffer_cap()).await?;
    let employee = service.create(&form, image.as_ref(), auth.user_id).await?;

    Ok(success(StatusCode::CREATED, "Employee created", employee))
}

#[utoipa::path(
    get,
    path = "/api/v1/Employees",
    params(Pagination),
    responses(
        (status = 200, description = "Live employees ordered by id", body = EmployeeListResponse),
        (status = 400, description = "Limit must be between 1 and 100")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    _auth: AuthUser,
    service: web::Data<EmployeeService>,
    query: web::Query<Pagination>,
) -> AppResult<HttpResponse> {
    let (skip, limit) = query.bounds()?;
    let items = service.list(skip, limit).await?;
    let total = service.count().await?;

    let message = format!("{} employee(s) retrieved", items.len());
    Ok(success(
        StatusCode::OK,
        message,
        EmployeeListResponse {
            items,
            skip,
            limit,
            total,
        },
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/Employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    _auth: AuthUser,
    service: web::Data<EmployeeService>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    let employee = service.get(path.into_inner()).await?;
    Ok(success(StatusCode::OK, "Employee retrieved", employee))
}

/// Update Employee
///
/// Only the supplied fields change. A new image replaces the old one.
#[utoipa::path(
    put,
    path = "/api/v1/Employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    request_body(content = EmployeeForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Nothing to update or invalid image"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "CNIC, Email or UserId used by another employee"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    service: web::Data<EmployeeService>,
    path: web::Path<u64>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let (form, image) = read_employee_form(payload, service.images().buffer_cap()).await?;
    let employee = service
        .update(path.into_inner(), &form, image.as_ref(), auth.user_id)
        .await?;

    Ok(success(StatusCode::OK, "Employee updated", employee))
}

#[utoipa::path(
    delete,
    path = "/api/v1/Employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    responses(
        (status = 204, description = "Employee soft-deleted"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    service: web::Data<EmployeeService>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    service.soft_delete(path.into_inner(), auth.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
